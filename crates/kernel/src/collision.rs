use glam::Vec3;
use serde::{Deserialize, Serialize};

/// What a boat contact does to a trash item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoatContact {
    /// Remove the item from the visible scene but keep tracking it. The
    /// character can still collect it afterwards.
    #[default]
    Detach,
    /// Remove the item from the scene and the tracking list, like the
    /// character does.
    Collect,
}

/// Planar proximity test: both horizontal axes must be closer than
/// `threshold`. The vertical axis is ignored.
pub fn is_colliding(a: Vec3, b: Vec3, threshold: f32) -> bool {
    (a.x - b.x).abs() < threshold && (a.z - b.z).abs() < threshold
}
