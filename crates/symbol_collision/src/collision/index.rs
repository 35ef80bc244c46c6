//! Per-frame collision index for label placement
//!
//! The index owns two spatial grids over the padded viewport: one holding
//! placements that block later candidates, and one holding placements that
//! were exempted from blocking but must still be found by feature picking.
//! Placement is greedy. A candidate is tested against everything inserted
//! before it in the same frame, so the caller's candidate order decides
//! which labels win.

use crate::core::config::CollisionConfig;
use crate::foundation::math::{Mat4, Mat4Ext, Point2};
use crate::geometry::clip_line;
use crate::layout::{LineLabel, LineLayout};
use crate::projection::{project_to_plane, FrameTransform, Projector};
use crate::spatial::{GridBox, GridCircle, GridIndex};

use super::feature::FeatureKey;

/// Label box in tile units, relative to its anchor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionBox {
    /// Anchor in tile units
    pub anchor: Point2,
    /// Left offset from the anchor
    pub x1: f32,
    /// Top offset from the anchor
    pub y1: f32,
    /// Right offset from the anchor
    pub x2: f32,
    /// Bottom offset from the anchor
    pub y2: f32,
}

/// Result of [`CollisionIndex::place_collision_box`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedBox {
    /// Box in padded-grid pixels, `None` when rejected
    pub rect: Option<GridBox>,
    /// Box lies entirely outside the visible viewport
    pub offscreen: bool,
}

impl PlacedBox {
    const REJECTED: PlacedBox = PlacedBox {
        rect: None,
        offscreen: false,
    };
}

/// One circle of a line label's circle chain, in padded-grid pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedCircle {
    /// Center X
    pub x: f32,
    /// Center Y
    pub y: f32,
    /// Radius
    pub radius: f32,
    /// Set by the caller once the circle has been used; placement writes `false`
    pub used: bool,
}

impl PlacedCircle {
    fn grid_circle(&self) -> GridCircle {
        GridCircle::new(self.x, self.y, self.radius)
    }

    fn bounds(&self) -> GridBox {
        self.grid_circle().bounds()
    }
}

/// Result of [`CollisionIndex::place_collision_circles`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacedCircles {
    /// Accepted circle chain, empty when rejected
    pub circles: Vec<PlacedCircle>,
    /// Every circle lies outside the visible viewport
    pub offscreen: bool,
    /// Some circle hit an existing placement
    pub collision_detected: bool,
    /// Full scanned chain for debug drawing, only kept with `show_collision_circles`
    pub debug_circles: Vec<PlacedCircle>,
}

/// Inputs for placing one line label as a circle chain
#[derive(Debug, Clone, Copy)]
pub struct CirclePlacement<'a> {
    /// Line geometry and glyph extent
    pub label: LineLabel<'a>,
    /// Skip the overlap test
    pub allow_overlap: bool,
    /// Rendered font size in pixels
    pub font_size: f32,
    /// Tile to clip space
    pub pos_matrix: &'a Mat4,
    /// Tile to label plane
    pub label_plane_matrix: &'a Mat4,
    /// Label plane to screen, for labels pitched with the map
    pub label_to_screen_matrix: Option<&'a Mat4>,
}

/// Collision state of one frame
#[derive(Debug, Clone)]
pub struct CollisionIndex {
    pub(super) projector: Projector,
    pub(super) config: CollisionConfig,
    pub(super) grid: GridIndex<FeatureKey>,
    pub(super) ignored_grid: GridIndex<FeatureKey>,
    screen_right_boundary: f32,
    screen_bottom_boundary: f32,
    grid_right_boundary: f32,
    grid_bottom_boundary: f32,
}

impl CollisionIndex {
    /// Create an empty index for a frame
    ///
    /// `config` is expected to have passed [`CollisionConfig::validate`].
    pub fn new(transform: FrameTransform, config: &CollisionConfig) -> Self {
        let (grid_width, grid_height) = config.grid_size(transform.width, transform.height);
        let cell_size = config.grid_cell_size;
        Self::with_grids(
            transform,
            config,
            GridIndex::new(grid_width, grid_height, cell_size),
            GridIndex::new(grid_width, grid_height, cell_size),
        )
    }

    /// Create an index over existing grids
    pub fn with_grids(
        transform: FrameTransform,
        config: &CollisionConfig,
        grid: GridIndex<FeatureKey>,
        ignored_grid: GridIndex<FeatureKey>,
    ) -> Self {
        let padding = config.viewport_padding;
        log::debug!(
            "CollisionIndex for {}x{} viewport, padding {}",
            transform.width,
            transform.height,
            padding
        );
        Self {
            projector: Projector::new(transform, padding),
            config: config.clone(),
            grid,
            ignored_grid,
            screen_right_boundary: transform.width + padding,
            screen_bottom_boundary: transform.height + padding,
            grid_right_boundary: transform.width + 2.0 * padding,
            grid_bottom_boundary: transform.height + 2.0 * padding,
        }
    }

    /// Projection helper for this frame
    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    /// Grid of placements that block later candidates
    pub fn grid(&self) -> &GridIndex<FeatureKey> {
        &self.grid
    }

    /// Grid of placements exempted from blocking
    pub fn ignored_grid(&self) -> &GridIndex<FeatureKey> {
        &self.ignored_grid
    }

    /// Try to place a label box
    ///
    /// `predicate` selects which existing entries may block the box.
    pub fn place_collision_box<P>(
        &self,
        collision_box: &CollisionBox,
        allow_overlap: bool,
        text_pixel_ratio: f32,
        pos_matrix: &Mat4,
        predicate: P,
    ) -> PlacedBox
    where
        P: Fn(&FeatureKey) -> bool,
    {
        let projected = self.projector.project_and_get_perspective_ratio(
            pos_matrix,
            collision_box.anchor.x,
            collision_box.anchor.y,
        );
        let scale = text_pixel_ratio * projected.perspective_ratio;
        let rect = GridBox::new(
            collision_box.x1 * scale + projected.point.x,
            collision_box.y1 * scale + projected.point.y,
            collision_box.x2 * scale + projected.point.x,
            collision_box.y2 * scale + projected.point.y,
        );

        if !self.is_inside_grid(&rect) {
            log::trace!("Box {:?} outside the grid", rect);
            return PlacedBox::REJECTED;
        }
        if !allow_overlap && self.grid.hit_test(&rect, predicate) {
            log::trace!("Box {:?} collides", rect);
            return PlacedBox::REJECTED;
        }

        PlacedBox {
            rect: Some(rect),
            offscreen: self.is_offscreen(&rect),
        }
    }

    /// Try to place a line label as a chain of circles
    pub fn place_collision_circles<L, P>(
        &self,
        placement: &CirclePlacement<'_>,
        layout: &L,
        predicate: P,
    ) -> PlacedCircles
    where
        L: LineLayout + ?Sized,
        P: Fn(&FeatureKey) -> bool,
    {
        let label = &placement.label;
        let anchor = self
            .projector
            .project_anchor(placement.pos_matrix, label.anchor.x, label.anchor.y);
        if anchor.camera_distance <= 0.0 {
            log::debug!("Line label anchor at {:?} is behind the camera", label.anchor);
            return PlacedCircles::default();
        }
        let perspective_ratio = anchor.perspective_ratio;

        let reference = self.config.reference_font_size;
        let font_scale = match placement.label_to_screen_matrix {
            Some(_) => placement.font_size / perspective_ratio / reference,
            None => placement.font_size * perspective_ratio / reference,
        };
        let radius = self.config.circle_pixel_diameter / 2.0 * perspective_ratio;
        if !radius.is_finite() || radius <= 0.0 {
            log::debug!("Line label at {:?} has no usable circle radius", label.anchor);
            return PlacedCircles::default();
        }

        let label_plane_anchor = project_to_plane(label.anchor, placement.label_plane_matrix).point;
        let Some(glyphs) = layout.place_first_and_last_glyph(
            label,
            font_scale,
            label_plane_anchor,
            placement.label_plane_matrix,
        ) else {
            log::trace!("Line label at {:?} does not fit its line", label.anchor);
            return PlacedCircles::default();
        };

        // The anchor is shared by both paths and dropped from each
        let mut path: Vec<Point2> = glyphs.first.path.iter().skip(1).rev().copied().collect();
        path.extend(glyphs.last.path.iter().skip(1).copied());

        if let Some(label_to_screen) = placement.label_to_screen_matrix {
            let projected: Vec<_> = path
                .iter()
                .map(|point| project_to_plane(*point, label_to_screen))
                .collect();
            path = if projected.iter().any(|p| p.signed_distance_from_camera <= 0.0) {
                Vec::new()
            } else {
                projected.into_iter().map(|p| p.point).collect()
            };
        }

        let chain = self.circle_chain(&path, radius);

        let show_debug = self.config.show_collision_circles;
        let mut circles = Vec::with_capacity(chain.len());
        let mut entirely_offscreen = true;
        let mut in_grid = false;
        let mut collision_detected = false;

        for center in chain {
            let circle = PlacedCircle {
                x: center.x + self.config.viewport_padding,
                y: center.y + self.config.viewport_padding,
                radius,
                used: false,
            };
            circles.push(circle);

            let bounds = circle.bounds();
            entirely_offscreen = entirely_offscreen && self.is_offscreen(&bounds);
            in_grid = in_grid || self.is_inside_grid(&bounds);

            if !placement.allow_overlap && self.grid.hit_test_circle(&circle.grid_circle(), &predicate) {
                collision_detected = true;
                if !show_debug {
                    log::trace!("Circle chain collides at ({}, {})", circle.x, circle.y);
                    return PlacedCircles {
                        collision_detected,
                        ..PlacedCircles::default()
                    };
                }
            }
        }

        let debug_circles = if show_debug { circles.clone() } else { Vec::new() };
        if collision_detected || !in_grid {
            circles.clear();
        }

        PlacedCircles {
            circles,
            offscreen: entirely_offscreen,
            collision_detected,
            debug_circles,
        }
    }

    /// Circle centers covering a label-plane path, clipped to the padded viewport
    fn circle_chain(&self, path: &[Point2], radius: f32) -> Vec<Point2> {
        let padding = self.config.viewport_padding;
        let clip_min = Point2::new(-padding, -padding);
        let clip_max = Point2::new(self.screen_right_boundary, self.screen_bottom_boundary);
        let spacing = 2.0 * radius;

        let mut centers: Vec<Point2> = Vec::new();
        for pair in path.windows(2) {
            let Some((start, end)) =
                clip_line(pair[0], pair[1], clip_min, clip_max, self.config.clip_epsilon)
            else {
                continue;
            };

            let near_previous = centers
                .last()
                .is_some_and(|previous| (start - *previous).norm() <= spacing);
            if !near_previous {
                centers.push(start);
            }

            let length = (end - start).norm();
            let interior = ((length / spacing).ceil() as usize).saturating_sub(1);
            let step = (end - start) / (interior + 1) as f32;
            centers.extend((1..=interior).map(|i| start + step * i as f32));

            centers.push(end);
        }
        centers
    }

    /// Record an accepted box
    pub fn insert_collision_box(
        &mut self,
        rect: &GridBox,
        ignore_placement: bool,
        bucket_instance_id: u32,
        feature_index: u32,
        collision_group_id: u16,
    ) {
        let key = FeatureKey::new(bucket_instance_id, feature_index, collision_group_id);
        self.target_grid(ignore_placement).insert(key, *rect);
    }

    /// Record an accepted circle chain, one grid entry per circle
    pub fn insert_collision_circles(
        &mut self,
        circles: &[PlacedCircle],
        ignore_placement: bool,
        bucket_instance_id: u32,
        feature_index: u32,
        collision_group_id: u16,
    ) {
        let key = FeatureKey::new(bucket_instance_id, feature_index, collision_group_id);
        let grid = self.target_grid(ignore_placement);
        for circle in circles {
            grid.insert_circle(key, circle.grid_circle());
        }
    }

    fn target_grid(&mut self, ignore_placement: bool) -> &mut GridIndex<FeatureKey> {
        if ignore_placement {
            &mut self.ignored_grid
        } else {
            &mut self.grid
        }
    }

    /// Matrix from padded-grid pixels back to viewport pixels
    pub fn viewport_matrix(&self) -> Mat4 {
        let padding = self.config.viewport_padding;
        Mat4::translation_2d(-padding, -padding)
    }

    /// Rectangle lies entirely outside the visible viewport
    pub fn is_offscreen(&self, rect: &GridBox) -> bool {
        let padding = self.config.viewport_padding;
        rect.x2 < padding
            || rect.x1 >= self.screen_right_boundary
            || rect.y2 < padding
            || rect.y1 >= self.screen_bottom_boundary
    }

    /// Rectangle overlaps the padded grid
    pub fn is_inside_grid(&self, rect: &GridBox) -> bool {
        rect.x2 >= 0.0
            && rect.x1 < self.grid_right_boundary
            && rect.y2 >= 0.0
            && rect.y1 < self.grid_bottom_boundary
    }
}
