//! # Symbol Collision
//!
//! Collision detection for map label placement.
//!
//! ## Features
//!
//! - **Collision Index**: greedy per-frame placement of label boxes and
//!   circle chains, with collision groups and ignored placements
//! - **Projection**: tile-to-screen projection with perspective scaling
//! - **Line Clipping**: segment clipping against the padded viewport
//! - **Feature Picking**: reverse lookup of placed labels from viewport polygons
//! - **Configuration**: TOML/RON configuration with validation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use symbol_collision::prelude::*;
//!
//! let config = CollisionConfig::default();
//! let transform = FrameTransform::new(800.0, 600.0, 1.0);
//! let mut index = CollisionIndex::new(transform, &config);
//!
//! let pos_matrix = Mat4::identity();
//! let label = CollisionBox {
//!     anchor: Point2::new(0.0, 0.0),
//!     x1: -20.0,
//!     y1: -8.0,
//!     x2: 20.0,
//!     y2: 8.0,
//! };
//!
//! let placed = index.place_collision_box(&label, false, 1.0, &pos_matrix, |_| true);
//! if let Some(rect) = placed.rect {
//!     index.insert_collision_box(&rect, false, 1, 0, 0);
//! }
//!
//! let picked = index.query_rendered_symbols(&[Point2::new(400.0, 300.0)]);
//! println!("{:?}", picked);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Configuration
pub mod config;
pub mod core;

// Shared utilities
pub mod foundation;
pub mod geometry;
pub mod spatial;

// Placement
pub mod collision;
pub mod layout;
pub mod projection;

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        collision::{
            CirclePlacement, CollisionBox, CollisionGroup, CollisionGroups, CollisionIndex, FeatureKey,
            PlacedBox, PlacedCircle, PlacedCircles,
        },
        config::{Config, ConfigError, ConfigFormat},
        core::{ApplicationConfig, CollisionConfig, LoggingConfig},
        foundation::math::{Mat4, Mat4Ext, Point2, Vec2, Vec3},
        geometry::clip_line,
        layout::{AlongLineLayout, LineLabel, LineLayout},
        projection::{viewport_label_plane_matrix, FrameTransform, Projector},
        spatial::{GridBox, GridCircle, GridIndex},
    };
}
