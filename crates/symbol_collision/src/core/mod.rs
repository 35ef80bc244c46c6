//! # Core Module
//!
//! Shared configuration used by the collision index and its consumers.

pub mod config;

// Re-export commonly used config types
pub use config::{
    ApplicationConfig,
    CollisionConfig,
    LoggingConfig,
    Config,
    ConfigError,
};
