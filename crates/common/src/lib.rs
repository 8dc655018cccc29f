//! Shared types used across the tidewater workspace.

pub mod types;

pub use types::{EntityId, ModelHandle, Role, Speed, Transform};
