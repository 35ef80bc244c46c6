//! Tile-to-screen projection for label placement
//!
//! Maps points in a tile's local coordinate space through a
//! model-view-projection matrix into padded-grid pixels, and computes the
//! perspective ratio that scales label footprints with camera distance.

use crate::foundation::math::{utils, Mat4, Point2};

/// Camera snapshot for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTransform {
    /// Viewport width in pixels
    pub width: f32,
    /// Viewport height in pixels
    pub height: f32,
    /// Distance from the camera to the map center, in clip-space `w` units
    pub camera_to_center_distance: f32,
}

impl FrameTransform {
    /// Create a transform snapshot
    pub fn new(width: f32, height: f32, camera_to_center_distance: f32) -> Self {
        Self {
            width,
            height,
            camera_to_center_distance,
        }
    }

    /// Matrix from clip space to unpadded viewport pixels (y down)
    ///
    /// The result still needs the perspective divide.
    pub fn label_plane_matrix(&self) -> Mat4 {
        let half_width = self.width / 2.0;
        let half_height = self.height / 2.0;
        #[rustfmt::skip]
        let matrix = Mat4::new(
            half_width, 0.0,          0.0, half_width,
            0.0,        -half_height, 0.0, half_height,
            0.0,        0.0,          1.0, 0.0,
            0.0,        0.0,          0.0, 1.0,
        );
        matrix
    }
}

/// Label plane for labels that stay aligned with the viewport
pub fn viewport_label_plane_matrix(pos_matrix: &Mat4, transform: &FrameTransform) -> Mat4 {
    transform.label_plane_matrix() * pos_matrix
}

/// Project a tile point onto a label plane (perspective divide, no padding)
pub fn project_to_plane(point: Point2, matrix: &Mat4) -> PlanePoint {
    let clip = utils::transform_tile_point(matrix, point.x, point.y);
    PlanePoint {
        point: Point2::new(clip.x / clip.w, clip.y / clip.w),
        signed_distance_from_camera: clip.w,
    }
}

/// Depth information for a projected anchor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorProjection {
    /// Footprint scale factor, 1 at the map center
    pub perspective_ratio: f32,
    /// Clip-space `w` of the anchor
    pub camera_distance: f32,
}

/// Screen position together with its perspective ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    /// Position in padded-grid pixels
    pub point: Point2,
    /// Footprint scale factor
    pub perspective_ratio: f32,
}

/// Result of a plain perspective projection onto a label plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanePoint {
    /// Position after the perspective divide
    pub point: Point2,
    /// Clip-space `w`; zero or negative means behind the camera
    pub signed_distance_from_camera: f32,
}

/// Projects tile points for one frame
///
/// A `w` of zero produces non-finite results. Callers are expected to cull
/// anchors behind the camera before placing them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    /// Camera snapshot
    pub transform: FrameTransform,
    /// Margin added on every side of the viewport
    pub viewport_padding: f32,
}

impl Projector {
    /// Create a projector for a frame
    pub fn new(transform: FrameTransform, viewport_padding: f32) -> Self {
        Self {
            transform,
            viewport_padding,
        }
    }

    fn perspective_ratio(&self, w: f32) -> f32 {
        0.5 + 0.5 * (self.transform.camera_to_center_distance / w)
    }

    /// Perspective ratio and camera distance of a tile point
    pub fn project_anchor(&self, pos_matrix: &Mat4, x: f32, y: f32) -> AnchorProjection {
        let clip = utils::transform_tile_point(pos_matrix, x, y);
        AnchorProjection {
            perspective_ratio: self.perspective_ratio(clip.w),
            camera_distance: clip.w,
        }
    }

    /// Position of a tile point in padded-grid pixels
    pub fn project_point(&self, pos_matrix: &Mat4, x: f32, y: f32) -> Point2 {
        let clip = utils::transform_tile_point(pos_matrix, x, y);
        self.clip_to_grid(clip.x, clip.y, clip.w)
    }

    /// Position and perspective ratio from a single matrix multiply
    pub fn project_and_get_perspective_ratio(&self, pos_matrix: &Mat4, x: f32, y: f32) -> ProjectedPoint {
        let clip = utils::transform_tile_point(pos_matrix, x, y);
        ProjectedPoint {
            point: self.clip_to_grid(clip.x, clip.y, clip.w),
            perspective_ratio: self.perspective_ratio(clip.w),
        }
    }

    /// Project a point through `matrix` with a perspective divide and no padding
    pub fn project(&self, point: Point2, matrix: &Mat4) -> PlanePoint {
        project_to_plane(point, matrix)
    }

    fn clip_to_grid(&self, x: f32, y: f32, w: f32) -> Point2 {
        let padding = self.viewport_padding;
        Point2::new(
            (x / w + 1.0) / 2.0 * self.transform.width + padding,
            (-y / w + 1.0) / 2.0 * self.transform.height + padding,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Mat4Ext, Vec3};
    use approx::assert_relative_eq;

    /// Orthographic tile-pixel-to-clip matrix for an 800x600 viewport
    fn screen_matrix() -> Mat4 {
        #[rustfmt::skip]
        let matrix = Mat4::new(
            2.0 / 800.0, 0.0,          0.0, -1.0,
            0.0,         -2.0 / 600.0, 0.0, 1.0,
            0.0,         0.0,          1.0, 0.0,
            0.0,         0.0,          0.0, 1.0,
        );
        matrix
    }

    fn projector() -> Projector {
        Projector::new(FrameTransform::new(800.0, 600.0, 1.0), 100.0)
    }

    #[test]
    fn test_project_point_adds_padding() {
        let p = projector().project_point(&screen_matrix(), 0.0, 0.0);
        assert_relative_eq!(p.x, 100.0, epsilon = 1e-3);
        assert_relative_eq!(p.y, 100.0, epsilon = 1e-3);

        let p = projector().project_point(&screen_matrix(), 400.0, 300.0);
        assert_relative_eq!(p.x, 500.0, epsilon = 1e-3);
        assert_relative_eq!(p.y, 400.0, epsilon = 1e-3);
    }

    #[test]
    fn test_ratio_is_one_at_center_distance() {
        let projected = projector().project_and_get_perspective_ratio(&screen_matrix(), 10.0, 20.0);
        assert_relative_eq!(projected.perspective_ratio, 1.0);
        assert_relative_eq!(projected.point.x, 110.0, epsilon = 1e-3);
        assert_relative_eq!(projected.point.y, 120.0, epsilon = 1e-3);
    }

    #[test]
    fn test_far_anchor_shrinks() {
        let transform = FrameTransform::new(800.0, 600.0, 10.0);
        let projector = Projector::new(transform, 100.0);
        let view = Mat4::look_at(
            Vec3::new(0.0, -10.0, 10.0),
            Vec3::zeros(),
            Vec3::new(0.0, 0.0, 1.0),
        );
        let proj = Mat4::perspective(utils::deg_to_rad(45.0), 800.0 / 600.0, 0.1, 1000.0);
        let pos_matrix = proj * view;

        let center = projector.project_anchor(&pos_matrix, 0.0, 0.0);
        let far = projector.project_anchor(&pos_matrix, 0.0, 20.0);
        assert!(far.camera_distance > center.camera_distance);
        assert!(far.perspective_ratio < center.perspective_ratio);
        assert!(far.perspective_ratio > 0.5);
    }

    #[test]
    fn test_zero_w_is_not_finite() {
        let mut degenerate = screen_matrix();
        degenerate[(3, 3)] = 0.0;
        let projected = projector().project_and_get_perspective_ratio(&degenerate, 1.0, 1.0);
        assert!(!projected.perspective_ratio.is_finite());
        assert!(!projected.point.x.is_finite());
    }

    #[test]
    fn test_label_plane_matches_unpadded_projection() {
        let transform = FrameTransform::new(800.0, 600.0, 1.0);
        let label_plane = viewport_label_plane_matrix(&screen_matrix(), &transform);
        let plane = projector().project(Point2::new(250.0, 75.0), &label_plane);
        assert_relative_eq!(plane.point.x, 250.0, epsilon = 1e-3);
        assert_relative_eq!(plane.point.y, 75.0, epsilon = 1e-3);
        assert_relative_eq!(plane.signed_distance_from_camera, 1.0);
    }
}
