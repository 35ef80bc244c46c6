//! Label collision detection
//!
//! - [`feature`] - feature keys and collision groups
//! - [`index`] - the per-frame collision index (placement and insertion)
//! - `query` - feature picking against placed labels

pub mod feature;
pub mod index;
mod query;

#[cfg(test)]
mod tests;

pub use feature::{CollisionGroup, CollisionGroups, FeatureKey};
pub use index::{CirclePlacement, CollisionBox, CollisionIndex, PlacedBox, PlacedCircle, PlacedCircles};
