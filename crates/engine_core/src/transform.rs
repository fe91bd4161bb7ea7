//! Transform component and utilities for spatial positioning.

use glam::{Quat, Vec3};

/// A 3D transform representing position, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a new transform with position and rotation.
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Get the forward direction (negative Z in right-handed coordinates).
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    /// Get the up direction (positive Y).
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Blend from `self` (previous tick) towards `next` (current tick).
    ///
    /// Position and scale are lerped, rotation is slerped. `alpha` is the
    /// tick driver's leftover fraction.
    pub fn interpolate(&self, next: &Transform, alpha: f32) -> Transform {
        let alpha = alpha.clamp(0.0, 1.0);
        Transform {
            position: self.position.lerp(next.position, alpha),
            rotation: self.rotation.slerp(next.rotation, alpha).normalize(),
            scale: self.scale.lerp(next.scale, alpha),
        }
    }

    /// Rotation that points `forward()` along `direction`.
    pub fn rotation_towards(direction: Vec3) -> Quat {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO {
            return Quat::IDENTITY;
        }
        Quat::from_rotation_arc(-Vec3::Z, dir)
    }
}
