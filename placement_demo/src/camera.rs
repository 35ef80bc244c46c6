//! Perspective camera over the map plane
//!
//! The map lies in the world z = 0 plane, so tile coordinates are world x/y
//! and the model matrix is the identity.

use serde::{Deserialize, Serialize};
use symbol_collision::foundation::math::{utils, Mat4, Mat4Ext, Vec3};
use symbol_collision::projection::FrameTransform;

/// Camera section of a scene file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Camera position in world space
    pub eye: [f32; 3],
    /// Point the camera looks at, normally on the map plane
    pub target: [f32; 3],
    /// Up direction
    pub up: [f32; 3],
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: [0.0, -600.0, 800.0],
            target: [0.0, 0.0, 0.0],
            up: [0.0, 0.0, 1.0],
            fov_degrees: 45.0,
            near: 1.0,
            far: 10_000.0,
        }
    }
}

/// 3D camera for a pitched map view
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,
    /// Point the camera is looking at in world space
    pub target: Vec3,
    /// Up vector for camera orientation
    pub up: Vec3,
    /// Field of view angle in radians
    pub fov: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,
    /// Distance to near clipping plane
    pub near: f32,
    /// Distance to far clipping plane
    pub far: f32,
}

impl Camera {
    /// Create a camera from its scene description
    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        Self {
            position: Vec3::from(config.eye),
            target: Vec3::from(config.target),
            up: Vec3::from(config.up),
            fov: utils::deg_to_rad(config.fov_degrees),
            aspect,
            near: config.near,
            far: config.far,
        }
    }

    /// World-to-camera transform
    pub fn get_view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.target, self.up)
    }

    /// Camera-to-clip transform
    pub fn get_projection_matrix(&self) -> Mat4 {
        Mat4::perspective(self.fov, self.aspect, self.near, self.far)
    }

    /// Tile-to-clip transform for the map plane
    pub fn pos_matrix(&self) -> Mat4 {
        self.get_projection_matrix() * self.get_view_matrix()
    }

    /// Distance from the camera to the point it looks at
    ///
    /// The target lies on the view axis, so this equals its clip-space `w`.
    pub fn distance_to_target(&self) -> f32 {
        (self.target - self.position).norm()
    }

    /// Per-frame transform snapshot for a viewport
    pub fn frame_transform(&self, width: f32, height: f32) -> FrameTransform {
        FrameTransform::new(width, height, self.distance_to_target())
    }
}
