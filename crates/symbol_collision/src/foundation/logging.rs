//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    init_with_level("warn");
}

/// Initialize the logging system with a default filter
///
/// `RUST_LOG` still takes precedence when set. Calling this more than once
/// keeps the first logger.
pub fn init_with_level(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    if let Err(err) = env_logger::Builder::from_env(env).try_init() {
        log::debug!("Logger already initialized: {}", err);
    }
}
