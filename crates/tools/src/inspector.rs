use glam::Vec3;
use tidewater_common::{EntityId, Role, Speed};
use tidewater_kernel::World;

/// Read-only queries against the scene for debugging and the GUI.
pub struct SceneInspector;

impl SceneInspector {
    /// Produce a summary of the scene state.
    pub fn summary(world: &World) -> SceneSummary {
        SceneSummary {
            tick: world.tick(),
            seed: world.config().seed,
            boat_loaded: world.boat().is_loaded(),
            character_loaded: world.character().is_loaded(),
            clip: world.animation().clip().map(str::to_string),
            visible_trash: world.visible_count(),
            tracked_trash: world.tracked_count(),
            pending_events: world.events().len(),
        }
    }

    pub fn inspect_vessel(world: &World, role: Role) -> VesselInfo {
        let vessel = world.vessel(role);
        VesselInfo {
            role,
            position: vessel.position(),
            yaw: vessel.transform.yaw(),
            speed: vessel.speed,
        }
    }

    /// Look up a tracked trash item.
    pub fn inspect_trash(world: &World, id: EntityId) -> Option<TrashInfo> {
        world.trash().iter().find(|t| t.id == id).map(|t| TrashInfo {
            id,
            position: t.position(),
            visible: world.is_visible(id),
        })
    }

    /// Tracked items that already left the scene (boat contacts).
    pub fn stale_trash(world: &World) -> Vec<EntityId> {
        world
            .trash()
            .iter()
            .filter(|t| !world.is_visible(t.id))
            .map(|t| t.id)
            .collect()
    }

    /// Visible trash item closest to `role`'s vessel on the horizontal plane.
    pub fn nearest_trash(world: &World, role: Role) -> Option<(EntityId, f32)> {
        let origin = world.vessel(role).position()?;
        world
            .visible_trash()
            .map(|t| {
                let d = t.position() - origin;
                (t.id, (d.x * d.x + d.z * d.z).sqrt())
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

/// Summary of scene state for the inspector.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneSummary {
    pub tick: u64,
    pub seed: u64,
    pub boat_loaded: bool,
    pub character_loaded: bool,
    pub clip: Option<String>,
    pub visible_trash: usize,
    pub tracked_trash: usize,
    pub pending_events: usize,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene: tick={} boat={} character={} clip={} trash={}/{} pending_events={}",
            self.tick,
            loaded(self.boat_loaded),
            loaded(self.character_loaded),
            self.clip.as_deref().unwrap_or("-"),
            self.visible_trash,
            self.tracked_trash,
            self.pending_events
        )
    }
}

fn loaded(flag: bool) -> &'static str {
    if flag { "loaded" } else { "pending" }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VesselInfo {
    pub role: Role,
    pub position: Option<Vec3>,
    pub yaw: f32,
    pub speed: Speed,
}

impl std::fmt::Display for VesselInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.position {
            Some(p) => write!(
                f,
                "{} pos=({:.1}, {:.1}, {:.1}) yaw={:.2} vel={:.1} rot={:.2}",
                self.role, p.x, p.y, p.z, self.yaw, self.speed.vel, self.speed.rot
            ),
            None => write!(f, "{} loading", self.role),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrashInfo {
    pub id: EntityId,
    pub position: Vec3,
    pub visible: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidewater_common::ModelHandle;
    use tidewater_kernel::{BoatContact, SceneConfig};

    #[test]
    fn summary_empty_scene() {
        let world = World::default();
        let summary = SceneInspector::summary(&world);
        assert_eq!(summary.tick, 0);
        assert!(!summary.boat_loaded);
        assert_eq!(summary.tracked_trash, 0);
        assert!(summary.to_string().contains("boat=pending"));
    }

    #[test]
    fn summary_after_scatter() {
        let mut world = World::default();
        world.scatter_trash(ModelHandle(9));
        world.step(1.0 / 60.0);

        let summary = SceneInspector::summary(&world);
        assert_eq!(summary.tick, 1);
        assert_eq!(summary.visible_trash, 500);
        assert_eq!(summary.tracked_trash, 500);
        assert_eq!(summary.pending_events, 500);
    }

    #[test]
    fn vessel_info() {
        let mut world = World::default();
        assert!(SceneInspector::inspect_vessel(&world, Role::Boat).position.is_none());
        world.attach_model(Role::Boat, ModelHandle(1), None);
        let info = SceneInspector::inspect_vessel(&world, Role::Boat);
        assert_eq!(info.position, Some(Vec3::new(5.0, 13.0, 50.0)));
        assert!(info.to_string().starts_with("boat pos=(5.0, 13.0, 50.0)"));
    }

    #[test]
    fn stale_entries_after_boat_contact() {
        let mut config = SceneConfig::default();
        config.contact.boat = BoatContact::Detach;
        let mut world = World::new(config);
        world.attach_model(Role::Boat, ModelHandle(1), None);
        let near = world.spawn_trash_at(ModelHandle(2), Vec3::new(10.0, 0.0, 50.0));
        let far = world.spawn_trash_at(ModelHandle(2), Vec3::new(300.0, 0.0, 50.0));
        world.step(0.016);

        assert_eq!(SceneInspector::stale_trash(&world), vec![near]);
        let info = SceneInspector::inspect_trash(&world, near).unwrap();
        assert!(!info.visible);
        assert!(SceneInspector::inspect_trash(&world, far).unwrap().visible);
        assert!(SceneInspector::inspect_trash(&world, EntityId::new()).is_none());
    }

    #[test]
    fn nearest_visible_trash() {
        let mut world = World::default();
        assert!(SceneInspector::nearest_trash(&world, Role::Character).is_none());
        world.attach_model(Role::Character, ModelHandle(1), None);
        world.spawn_trash_at(ModelHandle(2), Vec3::new(100.0, 0.0, 53.0));
        let close = world.spawn_trash_at(ModelHandle(2), Vec3::new(40.0, 0.0, 53.0));

        let (id, dist) = SceneInspector::nearest_trash(&world, Role::Character).unwrap();
        assert_eq!(id, close);
        assert!((dist - 30.0).abs() < 1e-4);
    }
}
