use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::store::AssetError;

/// Character animation clips that ship with the scene, in panel order.
pub const CHARACTER_CLIPS: [&str; 7] = [
    "Samba Dancing",
    "morph_test",
    "Swim",
    "SwimStop",
    "Death",
    "VeryDie",
    "TreadingWater",
];

/// Clip loaded at startup.
pub const DEFAULT_CLIP: &str = "VeryDie";

/// Where every scene asset lives, relative to an asset root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetManifest {
    pub root: PathBuf,
    pub boat: PathBuf,
    pub trash: PathBuf,
    pub water_normals: PathBuf,
    /// Directory holding `<clip>.fbx` character files.
    pub character_dir: PathBuf,
}

impl Default for AssetManifest {
    fn default() -> Self {
        Self::new(".")
    }
}

impl AssetManifest {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            boat: PathBuf::from("assets/boat/scene.gltf"),
            trash: PathBuf::from("assets/trash/scene.gltf"),
            water_normals: PathBuf::from("assets/waternormals.jpg"),
            character_dir: PathBuf::from("models/fbx"),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn boat_path(&self) -> PathBuf {
        self.root.join(&self.boat)
    }

    pub fn trash_path(&self) -> PathBuf {
        self.root.join(&self.trash)
    }

    pub fn water_normals_path(&self) -> PathBuf {
        self.root.join(&self.water_normals)
    }

    pub fn is_known_clip(clip: &str) -> bool {
        CHARACTER_CLIPS.contains(&clip)
    }

    /// Path of the character file for `clip`. Only the shipped clips are
    /// accepted.
    pub fn character_path(&self, clip: &str) -> Result<PathBuf, AssetError> {
        if !Self::is_known_clip(clip) {
            return Err(AssetError::UnknownClip(clip.to_string()));
        }
        Ok(self
            .root
            .join(&self.character_dir)
            .join(format!("{clip}.fbx")))
    }
}
