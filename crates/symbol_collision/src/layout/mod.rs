//! Glyph layout along line geometry
//!
//! Line labels are laid out by walking glyph offsets along the projected
//! line. Collision placement only needs the first and last glyph of a label,
//! together with the path from the anchor to each of them.

use crate::foundation::math::{Mat4, Point2};
use crate::projection::project_to_plane;

/// Tile-space geometry of one line label
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineLabel<'a> {
    /// Label anchor in tile units
    pub anchor: Point2,
    /// Index of the line segment the anchor lies on
    pub segment: usize,
    /// Line vertices in tile units
    pub line: &'a [Point2],
    /// Horizontal offset of the first glyph from the anchor, at the reference font size
    pub first_glyph_offset: f32,
    /// Horizontal offset of the last glyph from the anchor, at the reference font size
    pub last_glyph_offset: f32,
}

/// One glyph placed on the label plane
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphPlacement {
    /// Glyph position
    pub point: Point2,
    /// Direction of the line segment under the glyph, in radians
    pub angle: f32,
    /// Anchor, every vertex passed, then the glyph position
    pub path: Vec<Point2>,
}

/// Outermost glyphs of a line label
#[derive(Debug, Clone, PartialEq)]
pub struct FirstAndLastGlyph {
    /// First glyph
    pub first: GlyphPlacement,
    /// Last glyph
    pub last: GlyphPlacement,
}

/// Places the outermost glyphs of a line label on the label plane
pub trait LineLayout {
    /// Place the first and last glyph of `label`
    ///
    /// Returns `None` when the label does not fit on its line.
    fn place_first_and_last_glyph(
        &self,
        label: &LineLabel<'_>,
        font_scale: f32,
        label_plane_anchor: Point2,
        label_plane_matrix: &Mat4,
    ) -> Option<FirstAndLastGlyph>;
}

/// Walks the projected line vertex by vertex
#[derive(Debug, Default, Clone, Copy)]
pub struct AlongLineLayout;

impl AlongLineLayout {
    fn place_glyph(
        offset: f32,
        label: &LineLabel<'_>,
        anchor: Point2,
        label_plane_matrix: &Mat4,
    ) -> Option<GlyphPlacement> {
        let forward = offset > 0.0;
        let base_angle = if forward { 0.0 } else { std::f32::consts::PI };
        let target = offset.abs();

        // Index of the vertex before the first step
        let mut index = if forward { label.segment } else { label.segment + 1 };

        let mut current = anchor;
        let mut previous = anchor;
        let mut distance_to_previous = 0.0;
        let mut segment_distance = 0.0;
        let mut path = Vec::new();

        while distance_to_previous + segment_distance <= target {
            index = if forward { index + 1 } else { index.checked_sub(1)? };
            let vertex = label.line.get(index)?;

            previous = current;
            path.push(current);

            let projected = project_to_plane(*vertex, label_plane_matrix);
            if projected.signed_distance_from_camera <= 0.0 {
                log::trace!("Line vertex {} is behind the camera", index);
                return None;
            }
            current = projected.point;

            distance_to_previous += segment_distance;
            segment_distance = (current - previous).norm();
        }

        let remaining = target - distance_to_previous;
        let step = current - previous;
        let point = if segment_distance > 0.0 {
            previous + step * (remaining / segment_distance)
        } else {
            current
        };
        path.push(point);

        Some(GlyphPlacement {
            point,
            angle: base_angle + step.y.atan2(step.x),
            path,
        })
    }
}

impl LineLayout for AlongLineLayout {
    fn place_first_and_last_glyph(
        &self,
        label: &LineLabel<'_>,
        font_scale: f32,
        label_plane_anchor: Point2,
        label_plane_matrix: &Mat4,
    ) -> Option<FirstAndLastGlyph> {
        let first = Self::place_glyph(
            font_scale * label.first_glyph_offset,
            label,
            label_plane_anchor,
            label_plane_matrix,
        )?;
        let last = Self::place_glyph(
            font_scale * label.last_glyph_offset,
            label,
            label_plane_anchor,
            label_plane_matrix,
        )?;
        Some(FirstAndLastGlyph { first, last })
    }
}
