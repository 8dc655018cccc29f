use tidewater_common::Role;
use tidewater_kernel::DriveConfig;

use crate::action::Action;

/// Keys the scene reacts to, named by their logical key value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    W,
    S,
    A,
    D,
}

impl Key {
    /// Parse a logical key name. Letters are case sensitive: `"W"` (shifted)
    /// is not bound.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "w" => Key::W,
            "s" => Key::S,
            "a" => Key::A,
            "d" => Key::D,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Key::ArrowUp => "ArrowUp",
            Key::ArrowDown => "ArrowDown",
            Key::ArrowLeft => "ArrowLeft",
            Key::ArrowRight => "ArrowRight",
            Key::W => "w",
            Key::S => "s",
            Key::A => "a",
            Key::D => "d",
        }
    }

    /// The vessel this key drives.
    pub fn role(&self) -> Role {
        match self {
            Key::ArrowUp | Key::ArrowDown | Key::ArrowLeft | Key::ArrowRight => Role::Boat,
            Key::W | Key::S | Key::A | Key::D => Role::Character,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Down,
    Up,
}

/// Maps key transitions to drive actions using fixed magnitudes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputMap {
    speed: f32,
    turn_rate: f32,
}

impl Default for InputMap {
    fn default() -> Self {
        Self::new(&DriveConfig::default())
    }
}

impl InputMap {
    pub fn new(drive: &DriveConfig) -> Self {
        Self {
            speed: drive.speed,
            turn_rate: drive.turn_rate,
        }
    }

    /// Action for a key transition. Key-down writes one speed component;
    /// key-up stops the key's vessel entirely.
    pub fn on_key(&self, key: Key, state: KeyState) -> Action {
        let role = key.role();
        match state {
            KeyState::Up => Action::Stop(role),
            KeyState::Down => match key {
                Key::ArrowUp | Key::W => Action::SetVelocity(role, self.speed),
                Key::ArrowDown | Key::S => Action::SetVelocity(role, -self.speed),
                Key::ArrowLeft | Key::A => Action::SetAngularVelocity(role, self.turn_rate),
                Key::ArrowRight | Key::D => Action::SetAngularVelocity(role, -self.turn_rate),
            },
        }
    }

    /// Convenience for event sources that deliver key names.
    pub fn on_key_name(&self, name: &str, state: KeyState) -> Option<Action> {
        Key::from_name(name).map(|key| self.on_key(key, state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::apply_action;
    use tidewater_kernel::World;

    const ALL_KEYS: [Key; 8] = [
        Key::ArrowUp,
        Key::ArrowDown,
        Key::ArrowLeft,
        Key::ArrowRight,
        Key::W,
        Key::S,
        Key::A,
        Key::D,
    ];

    #[test]
    fn names_round_trip() {
        for key in ALL_KEYS {
            assert_eq!(Key::from_name(key.name()), Some(key));
        }
        assert_eq!(Key::from_name("W"), None);
        assert_eq!(Key::from_name("Enter"), None);
    }

    #[test]
    fn boat_bindings() {
        let map = InputMap::default();
        assert_eq!(
            map.on_key(Key::ArrowUp, KeyState::Down),
            Action::SetVelocity(Role::Boat, 1.0)
        );
        assert_eq!(
            map.on_key(Key::ArrowDown, KeyState::Down),
            Action::SetVelocity(Role::Boat, -1.0)
        );
        assert_eq!(
            map.on_key(Key::ArrowLeft, KeyState::Down),
            Action::SetAngularVelocity(Role::Boat, 0.1)
        );
        assert_eq!(
            map.on_key(Key::ArrowRight, KeyState::Down),
            Action::SetAngularVelocity(Role::Boat, -0.1)
        );
    }

    #[test]
    fn character_bindings() {
        let map = InputMap::default();
        assert_eq!(
            map.on_key(Key::W, KeyState::Down),
            Action::SetVelocity(Role::Character, 1.0)
        );
        assert_eq!(
            map.on_key(Key::S, KeyState::Down),
            Action::SetVelocity(Role::Character, -1.0)
        );
        assert_eq!(
            map.on_key(Key::A, KeyState::Down),
            Action::SetAngularVelocity(Role::Character, 0.1)
        );
        assert_eq!(
            map.on_key(Key::D, KeyState::Down),
            Action::SetAngularVelocity(Role::Character, -0.1)
        );
    }

    #[test]
    fn custom_magnitudes() {
        let map = InputMap::new(&DriveConfig {
            speed: 2.5,
            turn_rate: 0.05,
        });
        assert_eq!(
            map.on_key_name("s", KeyState::Down),
            Some(Action::SetVelocity(Role::Character, -2.5))
        );
        assert_eq!(
            map.on_key_name("ArrowRight", KeyState::Down),
            Some(Action::SetAngularVelocity(Role::Boat, -0.05))
        );
    }

    #[test]
    fn key_up_zeroes_both_components_for_every_key() {
        let map = InputMap::default();
        for release in ALL_KEYS {
            let mut world = World::default();
            // Drive every component of both vessels first.
            for press in [Key::ArrowUp, Key::ArrowLeft, Key::S, Key::D] {
                apply_action(&mut world, map.on_key(press, KeyState::Down));
            }
            apply_action(&mut world, map.on_key(release, KeyState::Up));

            let released = world.vessel(release.role());
            assert!(released.speed.is_still(), "{} left speed", release.name());
            let other = match release.role() {
                Role::Boat => world.character(),
                Role::Character => world.boat(),
            };
            assert!(!other.speed.is_still());
        }
    }
}
