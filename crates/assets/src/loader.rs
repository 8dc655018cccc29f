use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use crate::import::{import_fbx, import_gltf, import_texture};
use crate::manifest::AssetManifest;
use crate::store::{Asset, AssetError, AssetId};

/// A scene asset to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetRequest {
    Boat,
    /// Trash template; every trash item shares it.
    Trash,
    /// Character file for the named clip.
    Character(String),
    WaterNormals,
}

impl AssetRequest {
    pub fn label(&self) -> &str {
        match self {
            AssetRequest::Boat => "boat",
            AssetRequest::Trash => "trash",
            AssetRequest::Character(clip) => clip,
            AssetRequest::WaterNormals => "waternormals",
        }
    }

    fn path(&self, manifest: &AssetManifest) -> Result<PathBuf, AssetError> {
        match self {
            AssetRequest::Boat => Ok(manifest.boat_path()),
            AssetRequest::Trash => Ok(manifest.trash_path()),
            AssetRequest::Character(clip) => manifest.character_path(clip),
            AssetRequest::WaterNormals => Ok(manifest.water_normals_path()),
        }
    }
}

/// Ticket for a submitted request, increasing in submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedAsset {
    pub id: AssetId,
    pub asset: Asset,
}

/// Completion of a request.
#[derive(Debug)]
pub struct LoadEvent {
    pub id: RequestId,
    pub request: AssetRequest,
    pub result: Result<LoadedAsset, AssetError>,
}

/// Read and import one asset on the calling thread.
pub fn load_now(manifest: &AssetManifest, request: &AssetRequest) -> Result<LoadedAsset, AssetError> {
    let path = request.path(manifest)?;
    let bytes = read(&path)?;
    let id = AssetId::of_bytes(&bytes);
    let name = request.label();
    let asset = match request {
        AssetRequest::Boat | AssetRequest::Trash => Asset::Model(import_gltf(name, &bytes)?),
        AssetRequest::Character(_) => Asset::Model(import_fbx(name, &bytes)?),
        AssetRequest::WaterNormals => Asset::Texture(import_texture(name, &bytes)?),
    };
    Ok(LoadedAsset { id, asset })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn read(path: &Path) -> Result<Vec<u8>, AssetError> {
    std::fs::read(path).map_err(|source| AssetError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads assets on worker threads and hands results back through a channel.
///
/// [`poll`](Self::poll) never blocks, so the frame loop keeps running while
/// files are read and imported.
pub struct AssetLoader {
    manifest: AssetManifest,
    next_id: u64,
    tx: Sender<LoadEvent>,
    rx: Receiver<LoadEvent>,
    in_flight: usize,
}

impl AssetLoader {
    pub fn new(manifest: AssetManifest) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            manifest,
            next_id: 0,
            tx,
            rx,
            in_flight: 0,
        }
    }

    pub fn manifest(&self) -> &AssetManifest {
        &self.manifest
    }

    /// Submit a request. The returned id identifies its [`LoadEvent`].
    pub fn request(&mut self, request: AssetRequest) -> RequestId {
        self.submit(request, load_now)
    }

    /// Run `load` on a worker thread. A panicking load still reports a
    /// [`LoadEvent`], so `in_flight` always drains.
    fn submit<F>(&mut self, request: AssetRequest, load: F) -> RequestId
    where
        F: FnOnce(&AssetManifest, &AssetRequest) -> Result<LoadedAsset, AssetError>
            + Send
            + 'static,
    {
        self.next_id += 1;
        let id = RequestId(self.next_id);
        let manifest = self.manifest.clone();
        let tx = self.tx.clone();
        tracing::debug!(id = id.0, asset = request.label(), "load requested");

        std::thread::spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(|| load(&manifest, &request)))
                .unwrap_or_else(|payload| {
                    let message = panic_message(payload.as_ref());
                    tracing::error!(asset = request.label(), %message, "asset load panicked");
                    Err(AssetError::LoadPanicked(message))
                });
            // Receiver gone means the loader was dropped; nothing to report to.
            let _ = tx.send(LoadEvent {
                id,
                request,
                result,
            });
        });
        self.in_flight += 1;
        id
    }

    /// Completed loads since the last poll.
    pub fn poll(&mut self) -> Vec<LoadEvent> {
        let events: Vec<LoadEvent> = self.rx.try_iter().collect();
        self.in_flight -= events.len();
        events
    }

    /// Requests submitted but not yet returned by [`poll`](Self::poll) or
    /// [`wait`](Self::wait).
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Block until every in-flight request completes or `timeout` elapses.
    pub fn wait(&mut self, timeout: Duration) -> Vec<LoadEvent> {
        let deadline = Instant::now() + timeout;
        let mut events = Vec::new();
        while self.in_flight > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(event) => {
                    self.in_flight -= 1;
                    events.push(event);
                }
                Err(RecvTimeoutError::Timeout) => {
                    tracing::warn!(pending = self.in_flight, "asset wait timed out");
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        events
    }
}
