//! Feature keys and collision groups

use std::collections::HashMap;

/// Identifies the symbol instance that owns an inserted box or circle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureKey {
    /// Symbol bucket the feature belongs to
    pub bucket_instance_id: u32,
    /// Index of the feature inside its bucket
    pub feature_index: u32,
    /// Collision group the feature was placed in
    pub collision_group_id: u16,
}

impl FeatureKey {
    /// Create a feature key
    pub const fn new(bucket_instance_id: u32, feature_index: u32, collision_group_id: u16) -> Self {
        Self {
            bucket_instance_id,
            feature_index,
            collision_group_id,
        }
    }
}

/// A set of symbols that only collide among themselves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionGroup {
    /// Group id stored in the feature keys of its symbols
    pub id: u16,
    exclusive: bool,
}

impl CollisionGroup {
    /// The group shared by every source; its predicate admits every key
    pub const SHARED: CollisionGroup = CollisionGroup { id: 0, exclusive: false };

    /// Whether an existing entry keyed by `key` can block this group's symbols
    pub fn admits(&self, key: &FeatureKey) -> bool {
        !self.exclusive || key.collision_group_id == self.id
    }
}

/// Hands out collision groups per data source
#[derive(Debug, Clone, Default)]
pub struct CollisionGroups {
    cross_source_collisions: bool,
    max_group_id: u16,
    groups: HashMap<String, CollisionGroup>,
}

impl CollisionGroups {
    /// Create a registry
    ///
    /// With `cross_source_collisions` every source shares [`CollisionGroup::SHARED`];
    /// otherwise each source gets its own group.
    pub fn new(cross_source_collisions: bool) -> Self {
        Self {
            cross_source_collisions,
            max_group_id: 0,
            groups: HashMap::new(),
        }
    }

    /// Group for a source, allocating the next id on first use
    pub fn get(&mut self, source_id: &str) -> CollisionGroup {
        if self.cross_source_collisions {
            return CollisionGroup::SHARED;
        }
        if let Some(group) = self.groups.get(source_id) {
            return *group;
        }

        // Past u16::MAX sources the last group is shared
        self.max_group_id = self.max_group_id.saturating_add(1);
        let group = CollisionGroup {
            id: self.max_group_id,
            exclusive: true,
        };
        log::debug!("Source '{}' assigned collision group {}", source_id, group.id);
        self.groups.insert(source_id.to_string(), group);
        group
    }
}
