//! Scene files for the placement demo

use serde::{Deserialize, Serialize};
use symbol_collision::config::{Config, ConfigError};
use symbol_collision::core::{CollisionConfig, LoggingConfig};
use symbol_collision::foundation::math::Point2;

use crate::camera::CameraConfig;

/// Viewport size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportConfig {
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// Label geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LabelShape {
    /// Box centered on an anchor
    Point {
        /// Anchor in map units
        anchor: [f32; 2],
        /// Box width and height in pixels at perspective ratio 1
        size: [f32; 2],
        /// Text pixel ratio applied to the box
        #[serde(default = "default_text_scale")]
        text_scale: f32,
    },
    /// Text following a polyline
    Line {
        /// Polyline in map units
        line: Vec<[f32; 2]>,
        /// Anchor in map units, on segment `segment`
        anchor: [f32; 2],
        /// Segment of `line` holding the anchor
        segment: usize,
        /// Offset of the first glyph from the anchor, in pixels at the reference font size
        first_glyph_offset: f32,
        /// Offset of the last glyph from the anchor, in pixels at the reference font size
        last_glyph_offset: f32,
        /// Rendered font size in pixels
        font_size: f32,
    },
}

fn default_text_scale() -> f32 {
    1.0
}

/// One placement candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelConfig {
    /// Name used in logs
    pub name: String,
    /// Data source, selects the collision group
    pub source: String,
    /// Bucket instance id
    pub bucket: u32,
    /// Feature index inside the bucket
    pub feature: u32,
    /// Place even when overlapping earlier labels
    #[serde(default)]
    pub allow_overlap: bool,
    /// Do not block later labels
    #[serde(default)]
    pub ignore_placement: bool,
    /// Geometry
    pub shape: LabelShape,
}

/// Feature-picking query in viewport pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Name used in logs
    pub name: String,
    /// Polygon ring, or a single point
    pub polygon: Vec<[f32; 2]>,
}

impl QueryConfig {
    /// Polygon as points
    pub fn points(&self) -> Vec<Point2> {
        self.polygon.iter().map(|p| Point2::new(p[0], p[1])).collect()
    }
}

/// A complete demo scene
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scene {
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Collision index configuration
    pub collision: CollisionConfig,
    /// Camera
    pub camera: CameraConfig,
    /// Viewport size
    pub viewport: ViewportConfig,
    /// Candidates in placement priority order
    pub labels: Vec<LabelConfig>,
    /// Feature-picking queries run after placement
    pub queries: Vec<QueryConfig>,
}

impl Config for Scene {}

impl Scene {
    /// Check the scene for values the placement pass cannot use
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.collision.validate()?;
        if self.viewport.width <= 0.0 || self.viewport.height <= 0.0 {
            return Err(ConfigError::Invalid("viewport must have a positive size".to_string()));
        }
        for label in &self.labels {
            if let LabelShape::Line { line, segment, .. } = &label.shape {
                if segment + 1 >= line.len() {
                    return Err(ConfigError::Invalid(format!(
                        "label '{}' anchors on segment {} of a {}-point line",
                        label.name,
                        segment,
                        line.len()
                    )));
                }
            }
        }
        Ok(())
    }
}
