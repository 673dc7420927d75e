use super::errors::MetadataError;
use super::profile::ProfileDocument;
use crate::core::state::Address;
use async_trait::async_trait;
use log::debug;

/// Resolves the profile document published for an address.
#[async_trait]
pub trait MetadataRegistry: Send + Sync {
    async fn fetch_profile(&self, address: &Address) -> Result<ProfileDocument, MetadataError>;
}

/// Registry reached over HTTP: `GET {base_url}/{address}` returning the
/// document as JSON.
#[derive(Debug, Clone)]
pub struct HttpMetadataRegistry {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMetadataRegistry {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url_for(&self, address: &Address) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), address)
    }
}

#[async_trait]
impl MetadataRegistry for HttpMetadataRegistry {
    async fn fetch_profile(&self, address: &Address) -> Result<ProfileDocument, MetadataError> {
        let url = self.url_for(address);
        debug!("Fetching profile metadata from {}", url);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MetadataError::Status(status.as_u16()));
        }
        // Decode separately so malformed JSON surfaces as `Decode`, not `Http`.
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
