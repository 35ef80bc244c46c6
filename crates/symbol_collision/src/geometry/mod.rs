//! Screen-space geometry primitives
//!
//! - [`clip`] - segment clipping against the padded viewport
//! - [`polygon`] - polygon intersection tests for feature picking

pub mod clip;
pub mod polygon;

pub use clip::{clip_line, OutCode, CLIP_EPSILON};
pub use polygon::{polygon_contains_point, polygon_intersects_box, polygon_intersects_polygon};
