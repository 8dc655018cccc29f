//! wgpu render backend for the scene.
//!
//! Draws a water plane and one instanced box per loaded vessel and per
//! visible trash item, lit by a hemisphere light and the sun, with
//! exponential-squared fog. The camera orbits a target point.
//!
//! # Invariants
//! - Renderer never mutates world state.
//! - Camera motion is not part of the scene state.

mod camera;
mod gpu;
mod shaders;

pub use camera::OrbitCamera;
pub use gpu::{ProxyShape, WgpuRenderer, clear_color};
