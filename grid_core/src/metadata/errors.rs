use std::fmt::{self, Display};

/// Why a profile could not be resolved.
#[derive(Debug)]
pub enum MetadataError {
    Http(reqwest::Error),
    Status(u16),
    Decode(serde_json::Error),
}

impl From<reqwest::Error> for MetadataError {
    fn from(err: reqwest::Error) -> MetadataError {
        MetadataError::Http(err)
    }
}

impl From<serde_json::Error> for MetadataError {
    fn from(err: serde_json::Error) -> MetadataError {
        MetadataError::Decode(err)
    }
}

impl Display for MetadataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataError::Http(e) => write!(f, "HTTP error: {}", e),
            MetadataError::Status(code) => write!(f, "Registry answered with status {}", code),
            MetadataError::Decode(e) => write!(f, "Malformed profile metadata: {}", e),
        }
    }
}

impl std::error::Error for MetadataError {}
