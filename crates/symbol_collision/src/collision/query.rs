//! Reverse lookup from viewport geometry to placed features

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::foundation::math::{Point2, Vec2};
use crate::geometry::polygon_intersects_box;
use crate::spatial::GridBox;

use super::index::CollisionIndex;

impl CollisionIndex {
    /// Features whose placed geometry overlaps a viewport polygon
    ///
    /// `viewport_query` is in viewport pixels (a single point for a click, a
    /// ring for box selection). Both grids are searched. The result maps each
    /// bucket instance to its feature indices in first-hit order, without
    /// duplicates. Circles are tested by their bounding squares.
    pub fn query_rendered_symbols(&self, viewport_query: &[Point2]) -> BTreeMap<u32, Vec<u32>> {
        let mut result = BTreeMap::new();
        if viewport_query.is_empty() || (self.grid.is_empty() && self.ignored_grid.is_empty()) {
            return result;
        }

        let padding = self.config.viewport_padding;
        let shift = Vec2::new(padding, padding);
        let query: Vec<Point2> = viewport_query.iter().map(|point| *point + shift).collect();

        let mut bounds = GridBox::new(f32::INFINITY, f32::INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY);
        for point in &query {
            bounds.x1 = bounds.x1.min(point.x);
            bounds.y1 = bounds.y1.min(point.y);
            bounds.x2 = bounds.x2.max(point.x);
            bounds.y2 = bounds.y2.max(point.y);
        }

        let mut candidates = self.grid.query(&bounds);
        candidates.extend(self.ignored_grid.query(&bounds));

        let mut seen_features: HashMap<u32, HashSet<u32>> = HashMap::new();
        for entry in candidates {
            let key = entry.key;
            let seen = seen_features.entry(key.bucket_instance_id).or_default();
            if seen.contains(&key.feature_index) {
                continue;
            }

            let rect = entry.bounds;
            if !polygon_intersects_box(&query, rect.x1, rect.y1, rect.x2, rect.y2) {
                continue;
            }

            seen.insert(key.feature_index);
            result
                .entry(key.bucket_instance_id)
                .or_insert_with(Vec::new)
                .push(key.feature_index);
        }

        log::debug!(
            "Query of {} points matched {} buckets",
            viewport_query.len(),
            result.len()
        );
        result
    }
}
