pub mod connection_store;
pub mod context;
pub mod state;

// Re-export the modules here for easy import elsewhere.
pub use connection_store::ConnectionStore;
pub use context::*;
pub use state::*;
