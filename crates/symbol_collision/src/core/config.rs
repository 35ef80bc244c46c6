//! # Unified Configuration System
//!
//! Configuration for the collision index and the ambient services around it.
//!
//! ## Configuration Categories
//!
//! - **Collision Config**: viewport padding, grid resolution, circle sizing
//! - **Logging Config**: default log filter
//! - **Application Config**: both of the above, loadable from TOML or RON

use serde::{Deserialize, Serialize};

pub use crate::config::{Config, ConfigError};

/// Margin added around the viewport on every side, in pixels
pub const DEFAULT_VIEWPORT_PADDING: f32 = 100.0;

/// Spatial grid cell size in pixels
pub const DEFAULT_GRID_CELL_SIZE: f32 = 25.0;

/// Font size that glyph offsets are expressed in (one em)
pub const DEFAULT_REFERENCE_FONT_SIZE: f32 = 24.0;

/// # Collision Configuration
///
/// Tunables of the per-frame collision index. All values are in screen
/// pixels unless noted otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Margin around the visible viewport that still participates in collision
    pub viewport_padding: f32,
    /// Cell size of both spatial grids
    pub grid_cell_size: f32,
    /// Diameter of a line-label collision circle at perspective ratio 1
    pub circle_pixel_diameter: f32,
    /// Font size that glyph offsets are measured at
    pub reference_font_size: f32,
    /// Threshold below which segment lengths and directions count as zero
    pub clip_epsilon: f32,
    /// Whether symbols from different sources occlude each other
    pub cross_source_collisions: bool,
    /// Keep scanning colliding circle chains to produce debug geometry
    pub show_collision_circles: bool,
}

impl CollisionConfig {
    /// Create a new collision configuration with defaults
    pub fn new() -> Self {
        Self {
            viewport_padding: DEFAULT_VIEWPORT_PADDING,
            grid_cell_size: DEFAULT_GRID_CELL_SIZE,
            circle_pixel_diameter: 20.0,
            reference_font_size: DEFAULT_REFERENCE_FONT_SIZE,
            clip_epsilon: 1e-6,
            cross_source_collisions: true,
            show_collision_circles: false,
        }
    }

    /// Set the viewport padding
    pub fn with_viewport_padding(mut self, padding: f32) -> Self {
        self.viewport_padding = padding;
        self
    }

    /// Set the grid cell size
    pub fn with_grid_cell_size(mut self, cell_size: f32) -> Self {
        self.grid_cell_size = cell_size;
        self
    }

    /// Set the collision circle diameter
    pub fn with_circle_pixel_diameter(mut self, diameter: f32) -> Self {
        self.circle_pixel_diameter = diameter;
        self
    }

    /// Enable or disable collisions between sources
    pub fn with_cross_source_collisions(mut self, enabled: bool) -> Self {
        self.cross_source_collisions = enabled;
        self
    }

    /// Enable or disable collision circle debug geometry
    pub fn with_collision_circles(mut self, enabled: bool) -> Self {
        self.show_collision_circles = enabled;
        self
    }

    /// Grid dimensions for a viewport of the given size
    pub fn grid_size(&self, viewport_width: f32, viewport_height: f32) -> (f32, f32) {
        (
            viewport_width + 2.0 * self.viewport_padding,
            viewport_height + 2.0 * self.viewport_padding,
        )
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.viewport_padding.is_nan() || self.viewport_padding < 0.0 {
            return Err(ConfigError::Invalid("viewport_padding must be >= 0".to_string()));
        }
        if !is_positive(self.grid_cell_size) {
            return Err(ConfigError::Invalid("grid_cell_size must be > 0".to_string()));
        }
        if !is_positive(self.circle_pixel_diameter) {
            return Err(ConfigError::Invalid("circle_pixel_diameter must be > 0".to_string()));
        }
        if !is_positive(self.reference_font_size) {
            return Err(ConfigError::Invalid("reference_font_size must be > 0".to_string()));
        }
        if !is_positive(self.clip_epsilon) {
            return Err(ConfigError::Invalid("clip_epsilon must be > 0".to_string()));
        }
        Ok(())
    }
}

fn is_positive(value: f32) -> bool {
    value > 0.0
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Logging Configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log filter, overridden by `RUST_LOG`
    pub log_level: String,
}

impl LoggingConfig {
    /// Create a new logging configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Complete Application Configuration
///
/// Top-level configuration that encompasses all subsystems.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Collision index configuration
    pub collision: CollisionConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl ApplicationConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.collision.validate()
    }
}

impl Config for ApplicationConfig {}
