pub mod bridge;
pub mod config;
pub mod core;
pub mod metadata;
pub mod transfer;
pub mod utils;

// re‑export ergonomic entry points
pub use bridge::{Client, MemoryBridge, ProviderBridge, ProviderEvent};
pub use config::GridConfig;
pub use crate::core::{Address, ConnectionState, ConnectionStore, GridContext, GridError, GridHandle};
