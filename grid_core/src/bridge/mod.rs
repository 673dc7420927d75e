pub mod errors;
pub mod memory;
pub mod provider;

// Re-export the modules here for easy import elsewhere.
pub use errors::*;
pub use memory::MemoryBridge;
pub use provider::*;
