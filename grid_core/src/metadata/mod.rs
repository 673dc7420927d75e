pub mod errors;
pub mod fetcher;
pub mod profile;
pub mod registry;

pub use errors::MetadataError;
pub use fetcher::MetadataFetcher;
pub use profile::{resolve_ipfs_url, ProfileDefaults, ProfileDocument, ProfileRecord};
pub use registry::{HttpMetadataRegistry, MetadataRegistry};
