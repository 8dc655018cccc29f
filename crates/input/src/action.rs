use tidewater_common::Role;
use tidewater_kernel::World;

/// A drive command produced by the input layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Set the vessel's per-frame forward distance.
    SetVelocity(Role, f32),
    /// Set the vessel's per-frame yaw change.
    SetAngularVelocity(Role, f32),
    /// Zero both speed components.
    Stop(Role),
}

impl Action {
    pub fn role(&self) -> Role {
        match *self {
            Action::SetVelocity(role, _)
            | Action::SetAngularVelocity(role, _)
            | Action::Stop(role) => role,
        }
    }
}

/// Apply an action to the world.
pub fn apply_action(world: &mut World, action: Action) {
    tracing::debug!(?action, "apply action");
    match action {
        Action::SetVelocity(role, vel) => world.set_velocity(role, vel),
        Action::SetAngularVelocity(role, rot) => world.set_angular_velocity(role, rot),
        Action::Stop(role) => world.stop(role),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_role() {
        assert_eq!(Action::SetVelocity(Role::Boat, 1.0).role(), Role::Boat);
        assert_eq!(Action::Stop(Role::Character).role(), Role::Character);
    }

    #[test]
    fn apply_sets_and_stops() {
        let mut world = World::default();
        apply_action(&mut world, Action::SetVelocity(Role::Boat, -1.0));
        apply_action(&mut world, Action::SetAngularVelocity(Role::Boat, 0.1));
        assert_eq!(world.boat().speed.vel, -1.0);
        assert_eq!(world.boat().speed.rot, 0.1);
        assert!(world.character().speed.is_still());

        apply_action(&mut world, Action::Stop(Role::Boat));
        assert!(world.boat().speed.is_still());
    }
}
