use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tidewater_common::ModelHandle;

/// Content-addressed asset ID computed from the asset bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(pub u64);

impl AssetId {
    /// Hash raw asset bytes into an id.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let digest = Sha256::digest(bytes);
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        AssetId(u64::from_le_bytes(head))
    }
}

impl From<AssetId> for ModelHandle {
    fn from(id: AssetId) -> Self {
        ModelHandle(id.0)
    }
}

impl From<ModelHandle> for AssetId {
    fn from(handle: ModelHandle) -> Self {
        AssetId(handle.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelFormat {
    Gltf,
    Glb,
    Fbx,
}

/// Metadata of an imported model. Geometry stays with the file; the scene
/// only needs a handle and the clip list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub name: String,
    pub format: ModelFormat,
    pub mesh_count: usize,
    pub material_count: usize,
    /// Animation clip names, in file order.
    pub animations: Vec<String>,
}

impl Model {
    pub fn first_clip(&self) -> Option<&str> {
        self.animations.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Texture {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

/// An asset entry in the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Asset {
    Model(Model),
    Texture(Texture),
}

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("asset not found: {0:?}")]
    NotFound(AssetId),
    #[error("unknown character clip: {0}")]
    UnknownClip(String),
    #[error("glTF parse error: {0}")]
    GltfParse(String),
    #[error("FBX parse error: {0}")]
    FbxParse(String),
    #[error("asset load panicked: {0}")]
    LoadPanicked(String),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Content-addressed asset registry.
///
/// Loading the same file twice yields the same id and a single entry. The
/// registry can be written to disk as JSON for inspection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetStore {
    assets: BTreeMap<AssetId, Asset>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an asset under `id`, replacing any previous entry.
    pub fn insert(&mut self, id: AssetId, asset: Asset) -> AssetId {
        if self.assets.insert(id, asset).is_none() {
            tracing::debug!(id = id.0, "asset registered");
        }
        id
    }

    /// Get an asset by ID.
    pub fn get(&self, id: AssetId) -> Option<&Asset> {
        self.assets.get(&id)
    }

    /// Get a model by ID.
    pub fn get_model(&self, id: AssetId) -> Option<&Model> {
        match self.assets.get(&id) {
            Some(Asset::Model(m)) => Some(m),
            _ => None,
        }
    }

    /// Model behind a scene handle.
    pub fn model(&self, handle: ModelHandle) -> Result<&Model, AssetError> {
        let id = AssetId::from(handle);
        self.get_model(id).ok_or(AssetError::NotFound(id))
    }

    /// Get a texture by ID.
    pub fn get_texture(&self, id: AssetId) -> Option<&Texture> {
        match self.assets.get(&id) {
            Some(Asset::Texture(t)) => Some(t),
            _ => None,
        }
    }

    /// Number of registered assets.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AssetId, &Asset)> {
        self.assets.iter()
    }

    /// Save the asset registry to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), AssetError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load an asset registry from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let file = std::fs::File::open(path)?;
        let store: Self = serde_json::from_reader(file)?;
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boat() -> Asset {
        Asset::Model(Model {
            name: "boat".into(),
            format: ModelFormat::Gltf,
            mesh_count: 3,
            material_count: 2,
            animations: Vec::new(),
        })
    }

    #[test]
    fn content_addressed_ids() {
        assert_eq!(AssetId::of_bytes(b"boat"), AssetId::of_bytes(b"boat"));
        assert_ne!(AssetId::of_bytes(b"boat"), AssetId::of_bytes(b"trash"));
    }

    #[test]
    fn insert_dedups_by_id() {
        let mut store = AssetStore::new();
        let id = AssetId::of_bytes(b"boat");
        store.insert(id, boat());
        store.insert(id, boat());
        assert_eq!(store.len(), 1);
        assert!(store.get_model(id).is_some());
        assert!(store.get_texture(id).is_none());
    }

    #[test]
    fn model_by_handle() {
        let mut store = AssetStore::new();
        let id = store.insert(AssetId(7), boat());
        let handle = ModelHandle::from(id);
        assert_eq!(store.model(handle).unwrap().mesh_count, 3);
        assert!(matches!(
            store.model(ModelHandle(8)),
            Err(AssetError::NotFound(AssetId(8)))
        ));
    }

    #[test]
    fn save_and_load() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let mut store = AssetStore::new();
        store.insert(AssetId(1), boat());
        store.insert(
            AssetId(2),
            Asset::Texture(Texture {
                name: "waternormals".into(),
                width: 512,
                height: 512,
            }),
        );
        store.save(tmp.path()).unwrap();

        let loaded = AssetStore::load(tmp.path()).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get_texture(AssetId(2)).unwrap().width, 512);
    }
}
