use log::LevelFilter;

/// Initialize logging using env_logger.
/// Debug by default; `RUST_LOG` overrides, e.g.
/// `RUST_LOG=grid_core=info grid simulate session.json`.
pub fn init_logging() {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Debug)
        .parse_default_env()
        .init();
}
