//! Math utilities and types
//!
//! Provides the fundamental math types used for label projection and
//! screen-space collision geometry.

pub use nalgebra::{Matrix4, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type (homogeneous coordinates)
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 2D point type
pub type Point2 = nalgebra::Point2<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Mat4, Vec4};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Multiply a tile-plane point `(x, y, 0, 1)` by a matrix, returning the
    /// homogeneous clip-space result.
    pub fn transform_tile_point(matrix: &Mat4, x: f32, y: f32) -> Vec4 {
        matrix * Vec4::new(x, y, 0.0, 1.0)
    }
}

/// Extension trait for Mat4 with additional convenience methods
pub trait Mat4Ext {
    /// Create a perspective projection matrix (GL clip conventions: y up, w = -z_eye)
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Create a right-handed look-at view matrix
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;

    /// Create a translation in the xy plane
    fn translation_2d(x: f32, y: f32) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        Mat4::new_perspective(aspect, fov_y, near, far)
    }

    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        Mat4::look_at_rh(&Point3::from(eye), &Point3::from(target), &up)
    }

    fn translation_2d(x: f32, y: f32) -> Mat4 {
        Mat4::new_translation(&Vec3::new(x, y, 0.0))
    }
}
