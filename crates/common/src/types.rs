use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an entity in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Build an id from raw bits, e.g. drawn from a seeded stream so that a
    /// scattered scene is reproducible.
    pub fn from_bits(bits: u128) -> Self {
        Self(Uuid::from_u128(bits))
    }

    /// First eight hex digits, for log lines and panels.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to a loaded model in the asset store.
///
/// Several scene objects may share one handle (every trash item clones the
/// same template).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModelHandle(pub u64);

/// The two player-driven vessels in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Boat,
    Character,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Boat, Role::Character];

    pub fn label(&self) -> &'static str {
        match self {
            Role::Boat => "boat",
            Role::Character => "character",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Linear and angular velocity applied once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Speed {
    /// Distance travelled along the vessel's forward axis per frame.
    pub vel: f32,
    /// Yaw change in radians per frame.
    pub rot: f32,
}

impl Speed {
    pub fn stop(&mut self) {
        self.vel = 0.0;
        self.rot = 0.0;
    }

    pub fn is_still(&self) -> bool {
        self.vel == 0.0 && self.rot == 0.0
    }
}

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
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
    /// Transform at `position` with a uniform scale and a rotation about +Y.
    pub fn from_pose(position: Vec3, yaw: f32, scale: f32) -> Self {
        Self {
            position,
            rotation: Quat::from_rotation_y(yaw),
            scale: Vec3::splat(scale),
        }
    }

    /// Rotate about the world Y axis by `angle` radians.
    pub fn rotate_y(&mut self, angle: f32) {
        self.rotation = (Quat::from_rotation_y(angle) * self.rotation).normalize();
    }

    /// Move `distance` along one of the transform's local axes.
    pub fn translate_local(&mut self, axis: Vec3, distance: f32) {
        self.position += self.rotation * axis * distance;
    }

    /// Yaw angle in radians, in (-pi, pi].
    pub fn yaw(&self) -> f32 {
        let (yaw, _, _) = self.rotation.to_euler(glam::EulerRot::YXZ);
        yaw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn entity_id_uniqueness() {
        let a = EntityId::new();
        let b = EntityId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn entity_id_from_bits_is_stable() {
        assert_eq!(EntityId::from_bits(42), EntityId::from_bits(42));
        assert_eq!(EntityId::from_bits(0xabcd_ef01 << 96).short(), "abcdef01");
    }

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
    }

    #[test]
    fn translate_local_follows_yaw() {
        let mut t = Transform::from_pose(Vec3::ZERO, FRAC_PI_2, 1.0);
        t.translate_local(Vec3::X, 1.0);
        // +X rotated a quarter turn about +Y points down -Z.
        assert!((t.position - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);

        let mut t = Transform::from_pose(Vec3::ZERO, FRAC_PI_2, 1.0);
        t.translate_local(Vec3::Z, 2.0);
        assert!((t.position - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn rotate_y_accumulates() {
        let mut t = Transform::default();
        t.rotate_y(0.1);
        t.rotate_y(0.1);
        assert!((t.yaw() - 0.2).abs() < 1e-5);
    }

    #[test]
    fn speed_stop_zeroes_both_components() {
        let mut s = Speed { vel: -1.0, rot: 0.1 };
        s.stop();
        assert!(s.is_still());
    }
}
