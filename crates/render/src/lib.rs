//! Rendering adapter: renderer-agnostic interface plus the lighting and fog
//! parameters the GUI edits.
//!
//! # Invariants
//! - Renderers read the world; they never mutate it.
//! - Environment values always lie inside their slider ranges.

mod environment;
mod renderer;

pub use environment::{Environment, SkyParams, palette, rgb, sun_direction};
pub use renderer::{DebugTextRenderer, RenderView, Renderer};
