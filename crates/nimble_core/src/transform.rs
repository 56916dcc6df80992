//! Position, rotation (Euler radians) and scale.
//!
//! `Transform` is `Copy` and `Default`.  Every matrix in the crate is built
//! through [`Transform::matrix`] so the rotation order stays the same
//! everywhere: `T(position) · R(rotation) · S(scale)` with
//! `R = from_euler(EulerRot::XYZ, x, y, z)`.
//!
//! # Example
//! ```rust,ignore
//! use nimble_core::Transform;
//! use glam::Vec3;
//!
//! let t = Transform::from_position(Vec3::new(1.0, 0.0, 0.0));
//! let m = t.matrix();
//! ```

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Axis order used for every Euler rotation in the scene.
pub const EULER_ORDER: EulerRot = EulerRot::XYZ;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles in radians, applied in [`EULER_ORDER`].
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    pub fn new(position: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Rotation as a quaternion.
    pub fn quat(&self) -> Quat {
        euler_to_quat(self.rotation)
    }

    /// Build the TRS model matrix (`T * R * S`).
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_euler(EULER_ORDER, self.rotation.x, self.rotation.y, self.rotation.z)
            * Mat4::from_scale(self.scale)
    }
}

pub fn euler_to_quat(rotation: Vec3) -> Quat {
    Quat::from_euler(EULER_ORDER, rotation.x, rotation.y, rotation.z)
}

pub fn quat_to_euler(q: Quat) -> Vec3 {
    let (x, y, z) = q.to_euler(EULER_ORDER);
    Vec3::new(x, y, z)
}
