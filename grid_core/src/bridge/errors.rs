use std::fmt::{self, Display};

/// A central error enum for provider-bridge failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// The provider answered with a JSON-RPC style error.
    Rpc { code: i64, message: String },
    /// The user or the wallet refused the request.
    Rejected(String),
    Other(String),
}

impl Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::Rpc { code, message } => write!(f, "RPC error {}: {}", code, message),
            BridgeError::Rejected(msg) => write!(f, "Request rejected: {}", msg),
            BridgeError::Other(msg) => write!(f, "Other error: {}", msg),
        }
    }
}

impl std::error::Error for BridgeError {}
