pub mod gated_bridge;

use grid_core::Address;
use log::LevelFilter;

/// Logs will appear only when you run with `-- --nocapture`
/// or when the test fails.
pub fn init_test_logging() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

pub fn addr(byte: u8) -> Address {
    Address::from_bytes([byte; 20])
}
