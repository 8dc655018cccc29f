//! Assets: manifest of scene files, content-addressed registry, importers and
//! a background loader.
//!
//! Assets are identified by a hash of their bytes. The scene consumes models
//! by [`ModelHandle`](tidewater_common::ModelHandle), never by raw file paths.
//!
//! # Invariants
//! - Loads never block the frame loop; completion arrives as a [`LoadEvent`].
//! - A failed load produces an event carrying the error, never a panic.

mod import;
mod loader;
mod manifest;
mod store;

pub use import::{import_fbx, import_gltf, import_texture};
pub use loader::{AssetLoader, AssetRequest, LoadEvent, LoadedAsset, RequestId, load_now};
pub use manifest::{AssetManifest, CHARACTER_CLIPS, DEFAULT_CLIP};
pub use store::{Asset, AssetError, AssetId, AssetStore, Model, ModelFormat, Texture};
