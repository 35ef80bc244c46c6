//! Spatial partitioning data structures
//!
//! Provides the uniform grid used to index placed label geometry for
//! overlap tests and feature picking in screen space.

mod grid_index;

pub use grid_index::{GridBox, GridCircle, GridEntry, GridIndex};
