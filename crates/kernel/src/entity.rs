use glam::Vec3;
use serde::{Deserialize, Serialize};
use tidewater_common::{EntityId, ModelHandle, Role, Speed, Transform};

use crate::config::SpawnPose;

/// A player-driven object: the boat or the character.
///
/// The model is absent until its asynchronous load completes. Until then the
/// vessel keeps its speed but does not move or take part in contact scans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vessel {
    id: EntityId,
    role: Role,
    model: Option<ModelHandle>,
    pub transform: Transform,
    pub speed: Speed,
}

impl Vessel {
    pub fn new(role: Role) -> Self {
        Self {
            id: EntityId::new(),
            role,
            model: None,
            transform: Transform::default(),
            speed: Speed::default(),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn model(&self) -> Option<ModelHandle> {
        self.model
    }

    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    /// Position of the vessel, or `None` while no model is attached.
    pub fn position(&self) -> Option<Vec3> {
        self.model.map(|_| self.transform.position)
    }

    /// Attach `model` and reset the pose. Returns the model it replaced.
    pub fn attach(&mut self, model: ModelHandle, pose: &SpawnPose) -> Option<ModelHandle> {
        self.transform = Transform::from_pose(pose.position, pose.yaw, pose.scale);
        self.model.replace(model)
    }

    /// Local axis the vessel travels along: the boat's hull points down +X,
    /// the character swims along +Z.
    pub fn forward_axis(&self) -> Vec3 {
        match self.role {
            Role::Boat => Vec3::X,
            Role::Character => Vec3::Z,
        }
    }

    /// Apply one frame of motion: turn by `speed.rot`, then move `speed.vel`
    /// along the forward axis. Returns whether anything moved.
    pub fn update(&mut self) -> bool {
        if self.model.is_none() || self.speed.is_still() {
            return false;
        }
        self.transform.rotate_y(self.speed.rot);
        let axis = self.forward_axis();
        self.transform.translate_local(axis, self.speed.vel);
        true
    }
}

/// A scattered collectible. Every item shares the template's model handle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrashItem {
    pub id: EntityId,
    pub model: ModelHandle,
    pub transform: Transform,
}

impl TrashItem {
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unloaded_vessel_ignores_speed() {
        let mut v = Vessel::new(Role::Boat);
        v.speed = Speed { vel: 1.0, rot: 0.1 };
        assert!(!v.update());
        assert_eq!(v.transform, Transform::default());
        assert!(v.position().is_none());
    }

    #[test]
    fn attach_sets_spawn_pose() {
        let mut v = Vessel::new(Role::Boat);
        let previous = v.attach(ModelHandle(1), &SpawnPose::boat());
        assert!(previous.is_none());
        assert_eq!(v.position(), Some(Vec3::new(5.0, 13.0, 50.0)));
        assert_eq!(v.transform.scale, Vec3::splat(3.0));
        assert!((v.transform.yaw() - 1.5).abs() < 1e-5);
    }

    #[test]
    fn reattach_replaces_model_and_resets_pose() {
        let mut v = Vessel::new(Role::Character);
        v.attach(ModelHandle(1), &SpawnPose::character());
        v.speed.vel = 1.0;
        v.update();
        let previous = v.attach(ModelHandle(2), &SpawnPose::character());
        assert_eq!(previous, Some(ModelHandle(1)));
        assert_eq!(v.model(), Some(ModelHandle(2)));
        assert_eq!(v.position(), Some(Vec3::new(10.0, -8.0, 53.0)));
    }

    #[test]
    fn character_moves_along_local_z() {
        let mut v = Vessel::new(Role::Character);
        v.attach(ModelHandle(1), &SpawnPose::character());
        v.speed.vel = 1.0;
        assert!(v.update());
        assert!((v.transform.position - Vec3::new(10.0, -8.0, 54.0)).length() < 1e-5);
    }

    #[test]
    fn boat_moves_along_rotated_x() {
        let mut v = Vessel::new(Role::Boat);
        v.attach(ModelHandle(1), &SpawnPose::boat());
        v.speed.vel = 1.0;
        v.update();
        // Local +X at yaw 1.5 rad is (cos 1.5, 0, -sin 1.5).
        let expected = Vec3::new(5.0 + 1.5f32.cos(), 13.0, 50.0 - 1.5f32.sin());
        assert!((v.transform.position - expected).length() < 1e-4);
    }

    #[test]
    fn turn_applies_before_translation() {
        let mut v = Vessel::new(Role::Character);
        v.attach(ModelHandle(1), &SpawnPose::character());
        v.speed = Speed {
            vel: 1.0,
            rot: std::f32::consts::FRAC_PI_2,
        };
        v.update();
        // After a quarter turn the local +Z axis points along world +X.
        assert!((v.transform.position - Vec3::new(11.0, -8.0, 53.0)).length() < 1e-4);
    }
}
