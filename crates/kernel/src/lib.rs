//! Scene kernel: authoritative scene state and per-frame stepping.
//!
//! # Invariants
//! - All state mutations flow through explicit operations on [`World`].
//! - A vessel without a model never moves and never scans for contacts.
//! - Character contact removes a trash item from the scene and from the
//!   tracking list together.

pub mod animation;
pub mod collision;
pub mod config;
pub mod entity;
pub mod rng;
pub mod world;

pub use animation::AnimationPlayer;
pub use collision::{BoatContact, is_colliding};
pub use config::{ConfigError, ContactConfig, DriveConfig, SceneConfig, SpawnPose, TrashConfig};
pub use entity::{TrashItem, Vessel};
pub use rng::SplitMix64;
pub use world::{FrameReport, World, WorldEvent};
