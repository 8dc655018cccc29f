use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tidewater_common::{EntityId, ModelHandle, Role, Speed, Transform};

use crate::animation::AnimationPlayer;
use crate::collision::{BoatContact, is_colliding};
use crate::config::SceneConfig;
use crate::entity::{TrashItem, Vessel};
use crate::rng::SplitMix64;

/// An event record produced by every mutation of the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldEvent {
    /// A model finished loading and was attached to a vessel.
    ModelAttached {
        role: Role,
        model: ModelHandle,
        replaced: Option<ModelHandle>,
    },
    /// A trash item was added to the scene and the tracking list.
    TrashSpawned { id: EntityId, position: Vec3 },
    /// The boat touched a trash item and it left the visible scene.
    TrashDetached { id: EntityId },
    /// The character touched a trash item; it is gone for good.
    TrashCollected { id: EntityId, was_visible: bool },
    /// A vessel's speed pair changed through input.
    SpeedChanged { role: Role, speed: Speed },
}

/// What happened during one [`World::step`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub tick: u64,
    /// Items removed from the scene by the boat this frame.
    pub detached: Vec<EntityId>,
    /// Items removed from scene and tracking list by the character.
    pub collected: Vec<EntityId>,
}

impl FrameReport {
    pub fn is_quiet(&self) -> bool {
        self.detached.is_empty() && self.collected.is_empty()
    }
}

/// The authoritative scene state.
///
/// Owns both vessels, the trash tracking list and the set of trash items
/// currently in the visible scene. The frame loop, the input layer and the
/// renderers all go through this type; nothing else holds scene state.
#[derive(Debug, Clone)]
pub struct World {
    config: SceneConfig,
    boat: Vessel,
    character: Vessel,
    /// Tracking list in spawn order.
    trash: Vec<TrashItem>,
    /// Trash items attached to the visible scene.
    scene: BTreeSet<EntityId>,
    animation: AnimationPlayer,
    rng: SplitMix64,
    tick: u64,
    event_log: Vec<WorldEvent>,
}

impl Default for World {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}

impl World {
    pub fn new(config: SceneConfig) -> Self {
        let rng = SplitMix64::new(config.seed);
        Self {
            config,
            boat: Vessel::new(Role::Boat),
            character: Vessel::new(Role::Character),
            trash: Vec::new(),
            scene: BTreeSet::new(),
            animation: AnimationPlayer::new(),
            rng,
            tick: 0,
            event_log: Vec::new(),
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Number of completed frames.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn vessel(&self, role: Role) -> &Vessel {
        match role {
            Role::Boat => &self.boat,
            Role::Character => &self.character,
        }
    }

    fn vessel_mut(&mut self, role: Role) -> &mut Vessel {
        match role {
            Role::Boat => &mut self.boat,
            Role::Character => &mut self.character,
        }
    }

    pub fn boat(&self) -> &Vessel {
        &self.boat
    }

    pub fn character(&self) -> &Vessel {
        &self.character
    }

    pub fn animation(&self) -> &AnimationPlayer {
        &self.animation
    }

    /// The tracking list, in spawn order.
    pub fn trash(&self) -> &[TrashItem] {
        &self.trash
    }

    pub fn tracked_count(&self) -> usize {
        self.trash.len()
    }

    /// Trash items currently in the visible scene.
    pub fn visible_trash(&self) -> impl Iterator<Item = &TrashItem> {
        self.trash.iter().filter(|t| self.scene.contains(&t.id))
    }

    pub fn visible_count(&self) -> usize {
        self.scene.len()
    }

    pub fn is_visible(&self, id: EntityId) -> bool {
        self.scene.contains(&id)
    }

    pub fn is_tracked(&self, id: EntityId) -> bool {
        self.trash.iter().any(|t| t.id == id)
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[WorldEvent] {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Attach a loaded model to a vessel, resetting it to its spawn pose.
    ///
    /// For the character, `clip` names the model's first animation; playback
    /// restarts from it, or stops when the model has none.
    pub fn attach_model(&mut self, role: Role, model: ModelHandle, clip: Option<&str>) {
        let pose = match role {
            Role::Boat => self.config.boat,
            Role::Character => self.config.character,
        };
        let replaced = self.vessel_mut(role).attach(model, &pose);
        if role == Role::Character {
            match clip {
                Some(clip) => self.animation.play(clip),
                None => self.animation.stop(),
            }
        }
        tracing::info!(%role, model = model.0, replaced = ?replaced.map(|m| m.0), "model attached");
        self.event_log.push(WorldEvent::ModelAttached {
            role,
            model,
            replaced,
        });
    }

    pub fn set_velocity(&mut self, role: Role, vel: f32) {
        self.vessel_mut(role).speed.vel = vel;
        self.log_speed(role);
    }

    pub fn set_angular_velocity(&mut self, role: Role, rot: f32) {
        self.vessel_mut(role).speed.rot = rot;
        self.log_speed(role);
    }

    /// Zero both speed components of a vessel.
    pub fn stop(&mut self, role: Role) {
        self.vessel_mut(role).speed.stop();
        self.log_speed(role);
    }

    fn log_speed(&mut self, role: Role) {
        let speed = self.vessel(role).speed;
        self.event_log.push(WorldEvent::SpeedChanged { role, speed });
    }

    /// Place one trash item at `position` using `template`'s model.
    pub fn spawn_trash_at(&mut self, template: ModelHandle, position: Vec3) -> EntityId {
        let id = EntityId::from_bits(self.rng.next_u128());
        let transform = Transform {
            position,
            scale: Vec3::splat(self.config.trash.scale),
            ..Transform::default()
        };
        self.trash.push(TrashItem {
            id,
            model: template,
            transform,
        });
        self.scene.insert(id);
        self.event_log.push(WorldEvent::TrashSpawned { id, position });
        id
    }

    /// Scatter the configured number of trash items, all cloned from
    /// `template`, at seeded random positions.
    pub fn scatter_trash(&mut self, template: ModelHandle) -> Vec<EntityId> {
        let cfg = self.config.trash.clone();
        let ids: Vec<EntityId> = (0..cfg.count)
            .map(|_| {
                let x = self.rng.range(cfg.x_range[0], cfg.x_range[1]);
                let z = self.rng.range(cfg.z_range[0], cfg.z_range[1]);
                self.spawn_trash_at(template, Vec3::new(x, cfg.height, z))
            })
            .collect();
        tracing::info!(count = ids.len(), template = template.0, "trash scattered");
        ids
    }

    /// Advance the scene by one frame.
    ///
    /// Order: animation playback, boat update, character update, boat
    /// contact scan, character contact scan. Motion is a fixed per-frame
    /// delta; only animation playback uses `dt` (seconds).
    pub fn step(&mut self, dt: f32) -> FrameReport {
        let _span = tracing::debug_span!("world_step", tick = self.tick).entered();

        self.animation.advance(dt);
        self.boat.update();
        self.character.update();

        let detached = self.scan_boat_contacts();
        let collected = self.scan_character_contacts();

        self.tick += 1;
        FrameReport {
            tick: self.tick,
            detached,
            collected,
        }
    }

    /// Boat contact scan. Under [`BoatContact::Detach`] touched items leave
    /// the scene but stay tracked, and later frames keep testing them.
    fn scan_boat_contacts(&mut self) -> Vec<EntityId> {
        let Some(origin) = self.boat.position() else {
            return Vec::new();
        };
        let threshold = self.config.contact.threshold;
        match self.config.contact.boat {
            BoatContact::Detach => {
                let mut detached = Vec::new();
                for item in &self.trash {
                    if is_colliding(origin, item.position(), threshold)
                        && self.scene.remove(&item.id)
                    {
                        tracing::debug!(id = %item.id.short(), "trash detached by boat");
                        self.event_log
                            .push(WorldEvent::TrashDetached { id: item.id });
                        detached.push(item.id);
                    }
                }
                detached
            }
            BoatContact::Collect => self.collect_near(origin, threshold),
        }
    }

    fn scan_character_contacts(&mut self) -> Vec<EntityId> {
        let Some(origin) = self.character.position() else {
            return Vec::new();
        };
        let threshold = self.config.contact.threshold;
        self.collect_near(origin, threshold)
    }

    /// Remove every tracked item near `origin` from both the scene and the
    /// tracking list.
    fn collect_near(&mut self, origin: Vec3, threshold: f32) -> Vec<EntityId> {
        let mut collected = Vec::new();
        let scene = &mut self.scene;
        let log = &mut self.event_log;
        self.trash.retain(|item| {
            if !is_colliding(origin, item.position(), threshold) {
                return true;
            }
            let was_visible = scene.remove(&item.id);
            tracing::debug!(id = %item.id.short(), was_visible, "trash collected");
            log.push(WorldEvent::TrashCollected {
                id: item.id,
                was_visible,
            });
            collected.push(item.id);
            false
        });
        collected
    }

    /// Deterministic hash of the scene state, for reproducibility checks.
    /// Covers the tick, vessel poses and speeds, and the trash list.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        let mix_transform = |h: &mut u64, t: &Transform| {
            for v in t.position.to_array() {
                mix(h, &v.to_le_bytes());
            }
            for v in t.rotation.to_array() {
                mix(h, &v.to_le_bytes());
            }
        };
        mix(&mut h, &self.tick.to_le_bytes());
        for vessel in [&self.boat, &self.character] {
            mix(&mut h, &[vessel.is_loaded() as u8]);
            mix_transform(&mut h, &vessel.transform);
            mix(&mut h, &vessel.speed.vel.to_le_bytes());
            mix(&mut h, &vessel.speed.rot.to_le_bytes());
        }
        for item in &self.trash {
            mix(&mut h, item.id.0.as_bytes());
            mix(&mut h, &[self.scene.contains(&item.id) as u8]);
            mix_transform(&mut h, &item.transform);
        }
        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOAT_MODEL: ModelHandle = ModelHandle(1);
    const CHARACTER_MODEL: ModelHandle = ModelHandle(2);
    const TRASH_MODEL: ModelHandle = ModelHandle(3);

    fn empty_config() -> SceneConfig {
        let mut config = SceneConfig::default();
        config.trash.count = 0;
        config
    }

    #[test]
    fn world_starts_empty() {
        let w = World::default();
        assert_eq!(w.tick(), 0);
        assert_eq!(w.tracked_count(), 0);
        assert!(!w.boat().is_loaded());
        assert!(!w.character().is_loaded());
    }

    #[test]
    fn step_increments_tick() {
        let mut w = World::default();
        w.step(0.016);
        w.step(0.016);
        let report = w.step(0.016);
        assert_eq!(w.tick(), 3);
        assert_eq!(report.tick, 3);
    }

    #[test]
    fn character_contact_removes_from_scene_and_list() {
        let mut w = World::new(empty_config());
        w.attach_model(Role::Character, CHARACTER_MODEL, None);
        let id = w.spawn_trash_at(TRASH_MODEL, Vec3::new(12.0, 0.0, 53.0));
        let before = w.tracked_count();

        let report = w.step(0.016);

        assert_eq!(report.collected, vec![id]);
        assert!(!w.is_visible(id));
        assert!(!w.is_tracked(id));
        assert_eq!(w.tracked_count(), before - 1);
    }

    #[test]
    fn boat_miss_keeps_item() {
        let mut w = World::new(empty_config());
        w.attach_model(Role::Boat, BOAT_MODEL, None);
        let id = w.spawn_trash_at(TRASH_MODEL, Vec3::new(25.0, 0.0, 50.0));

        let report = w.step(0.016);

        assert!(report.is_quiet());
        assert!(w.is_visible(id));
        assert!(w.is_tracked(id));
    }

    #[test]
    fn boat_detach_keeps_stale_entry() {
        let mut w = World::new(empty_config());
        w.attach_model(Role::Boat, BOAT_MODEL, None);
        let id = w.spawn_trash_at(TRASH_MODEL, Vec3::new(10.0, 0.0, 50.0));

        let report = w.step(0.016);
        assert_eq!(report.detached, vec![id]);
        assert!(!w.is_visible(id));
        assert!(w.is_tracked(id));

        // Still touching, but already detached: reported only once.
        let report = w.step(0.016);
        assert!(report.detached.is_empty());
        assert_eq!(w.tracked_count(), 1);
    }

    #[test]
    fn character_collects_item_the_boat_detached() {
        let mut w = World::new(empty_config());
        w.attach_model(Role::Boat, BOAT_MODEL, None);
        w.attach_model(Role::Character, CHARACTER_MODEL, None);
        // Near both spawn points.
        let id = w.spawn_trash_at(TRASH_MODEL, Vec3::new(8.0, 0.0, 52.0));

        let report = w.step(0.016);
        assert_eq!(report.detached, vec![id]);
        assert_eq!(report.collected, vec![id]);
        assert_eq!(w.tracked_count(), 0);
        assert!(w.events().contains(&WorldEvent::TrashCollected {
            id,
            was_visible: false
        }));
    }

    #[test]
    fn boat_collect_policy_pairs_removals() {
        let mut config = empty_config();
        config.contact.boat = BoatContact::Collect;
        let mut w = World::new(config);
        w.attach_model(Role::Boat, BOAT_MODEL, None);
        let id = w.spawn_trash_at(TRASH_MODEL, Vec3::new(10.0, 0.0, 50.0));

        let report = w.step(0.016);
        assert!(report.detached.is_empty());
        assert_eq!(report.collected, vec![id]);
        assert!(!w.is_tracked(id));
        assert_eq!(w.visible_count(), w.tracked_count());
    }

    #[test]
    fn scans_wait_for_models() {
        let mut w = World::new(empty_config());
        let id = w.spawn_trash_at(TRASH_MODEL, Vec3::new(10.0, 0.0, 53.0));
        // Default transforms sit at the origin; still nothing must happen.
        w.spawn_trash_at(TRASH_MODEL, Vec3::ZERO);
        let report = w.step(0.016);
        assert!(report.is_quiet());
        assert!(w.is_visible(id));
        assert_eq!(w.tracked_count(), 2);
    }

    #[test]
    fn adjacent_contacts_are_all_collected() {
        let mut w = World::new(empty_config());
        w.attach_model(Role::Character, CHARACTER_MODEL, None);
        let near: Vec<EntityId> = (0..4)
            .map(|i| w.spawn_trash_at(TRASH_MODEL, Vec3::new(10.0 + i as f32, 0.0, 53.0)))
            .collect();
        let far = w.spawn_trash_at(TRASH_MODEL, Vec3::new(400.0, 0.0, 53.0));

        let report = w.step(0.016);
        assert_eq!(report.collected, near);
        assert_eq!(w.tracked_count(), 1);
        assert!(w.is_tracked(far));
    }

    #[test]
    fn collected_item_never_returns() {
        let mut w = World::new(empty_config());
        w.attach_model(Role::Character, CHARACTER_MODEL, None);
        let id = w.spawn_trash_at(TRASH_MODEL, Vec3::new(12.0, 0.0, 53.0));
        w.step(0.016);
        for _ in 0..10 {
            let report = w.step(0.016);
            assert!(!report.collected.contains(&id));
            assert!(!w.is_visible(id));
            assert!(!w.is_tracked(id));
        }
    }

    #[test]
    fn list_shrinks_by_one_per_collection() {
        let mut config = empty_config();
        config.trash.count = 200;
        let mut w = World::new(config);
        w.scatter_trash(TRASH_MODEL);
        w.attach_model(Role::Character, CHARACTER_MODEL, None);
        w.set_velocity(Role::Character, 1.0);
        w.set_angular_velocity(Role::Character, 0.01);

        let mut expected = w.tracked_count();
        for _ in 0..2_000 {
            let report = w.step(0.016);
            expected -= report.collected.len();
            assert_eq!(w.tracked_count(), expected);
        }
    }

    #[test]
    fn scatter_respects_config() {
        let mut config = SceneConfig::default();
        config.trash.count = 300;
        let mut w = World::new(config.clone());
        let ids = w.scatter_trash(TRASH_MODEL);
        assert_eq!(ids.len(), 300);
        assert_eq!(w.tracked_count(), 300);
        assert_eq!(w.visible_count(), 300);
        for item in w.trash() {
            let p = item.position();
            assert!(p.x >= config.trash.x_range[0] && p.x <= config.trash.x_range[1]);
            assert!(p.z >= config.trash.z_range[0] && p.z <= config.trash.z_range[1]);
            assert_eq!(p.y, 0.0);
            assert_eq!(item.model, TRASH_MODEL);
            assert_eq!(item.transform.scale, Vec3::splat(1.5));
        }
    }

    #[test]
    fn same_seed_reproduces_scene() {
        let mut a = World::default();
        let mut b = World::default();
        a.scatter_trash(TRASH_MODEL);
        b.scatter_trash(TRASH_MODEL);
        let ids_a: Vec<_> = a.trash().iter().map(|t| t.id).collect();
        let ids_b: Vec<_> = b.trash().iter().map(|t| t.id).collect();
        assert_eq!(ids_a, ids_b);

        a.attach_model(Role::Character, CHARACTER_MODEL, None);
        b.attach_model(Role::Character, CHARACTER_MODEL, None);
        a.set_velocity(Role::Character, 1.0);
        b.set_velocity(Role::Character, 1.0);
        for _ in 0..50 {
            a.step(0.016);
            b.step(0.016);
        }
        assert_eq!(a.state_hash(), b.state_hash());
    }

    #[test]
    fn different_seeds_scatter_differently() {
        let mut c1 = SceneConfig::default();
        c1.seed = 1;
        let mut c2 = SceneConfig::default();
        c2.seed = 2;
        let mut a = World::new(c1);
        let mut b = World::new(c2);
        a.scatter_trash(TRASH_MODEL);
        b.scatter_trash(TRASH_MODEL);
        assert_ne!(a.state_hash(), b.state_hash());
    }

    #[test]
    fn stop_zeroes_speed_regardless_of_prior_values() {
        let mut w = World::default();
        for (vel, rot) in [(1.0, 0.1), (-1.0, -0.1), (0.0, 0.1), (1.0, 0.0)] {
            w.set_velocity(Role::Boat, vel);
            w.set_angular_velocity(Role::Boat, rot);
            w.stop(Role::Boat);
            assert!(w.boat().speed.is_still());
        }
    }

    #[test]
    fn character_attach_drives_animation() {
        let mut w = World::default();
        w.attach_model(Role::Character, CHARACTER_MODEL, Some("Swim"));
        w.step(0.5);
        assert_eq!(w.animation().clip(), Some("Swim"));
        assert!((w.animation().elapsed() - 0.5).abs() < 1e-6);

        w.attach_model(Role::Character, ModelHandle(9), None);
        assert!(!w.animation().is_playing());
    }

    #[test]
    fn events_are_recorded_and_drained() {
        let mut w = World::new(empty_config());
        w.attach_model(Role::Boat, BOAT_MODEL, None);
        w.spawn_trash_at(TRASH_MODEL, Vec3::new(500.0, 0.0, 0.0));
        w.set_velocity(Role::Boat, 1.0);
        assert_eq!(w.events().len(), 3);
        let drained = w.drain_events();
        assert_eq!(drained.len(), 3);
        assert!(w.events().is_empty());
    }
}
