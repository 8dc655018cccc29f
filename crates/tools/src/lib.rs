//! Developer tooling: scene inspector and the frame statistics shown in the
//! stats panel.
//!
//! # Invariants
//! - Tools only read scene state.

mod inspector;
mod stats;

pub use inspector::{SceneInspector, SceneSummary, TrashInfo, VesselInfo};
pub use stats::FrameStats;
