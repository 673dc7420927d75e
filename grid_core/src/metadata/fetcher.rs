use super::profile::{ProfileDefaults, ProfileRecord};
use super::registry::MetadataRegistry;
use crate::core::state::Address;
use log::{debug, info, warn};

/// Turns address changes into profile records.
///
/// One registry call per distinct address; repeating the last address or
/// passing `None` does nothing. A failed lookup is logged and the previous
/// record stays in place.
pub struct MetadataFetcher<R: MetadataRegistry> {
    registry: R,
    gateway: String,
    defaults: ProfileDefaults,
    last_address: Option<Address>,
    record: ProfileRecord,
}

impl<R: MetadataRegistry> MetadataFetcher<R> {
    pub fn new(registry: R, gateway: impl Into<String>, defaults: ProfileDefaults) -> Self {
        let record = ProfileRecord::from(&defaults);
        Self {
            registry,
            gateway: gateway.into(),
            defaults,
            last_address: None,
            record,
        }
    }

    pub fn record(&self) -> &ProfileRecord {
        &self.record
    }

    pub async fn on_address_change(&mut self, address: Option<&Address>) -> &ProfileRecord {
        let Some(address) = address else {
            return &self.record;
        };
        if self.last_address.as_ref() == Some(address) {
            debug!("Profile for {} already requested", address);
            return &self.record;
        }
        self.last_address = Some(*address);

        match self.registry.fetch_profile(address).await {
            Ok(doc) => {
                self.record = ProfileRecord::from_document(&doc, &self.gateway, &self.defaults);
                info!("Loaded profile '{}' for {}", self.record.display_name, address);
            }
            Err(e) => warn!("Could not load profile for {}: {}", address, e),
        }
        &self.record
    }
}
