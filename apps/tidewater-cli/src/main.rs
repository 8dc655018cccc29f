use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tidewater_assets::{
    Asset, AssetId, AssetManifest, AssetRequest, AssetStore, CHARACTER_CLIPS, DEFAULT_CLIP,
    load_now,
};
use tidewater_common::{ModelHandle, Role};
use tidewater_input::{InputMap, Key, KeyState, apply_action};
use tidewater_kernel::{SceneConfig, World};
use tidewater_render::{DebugTextRenderer, RenderView, Renderer};
use tidewater_tools::SceneInspector;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tidewater-cli", about = "Headless tools for the Tidewater scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene configuration (YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, character clips and the effective scene configuration
    Info,
    /// Run the scene without a window, driving it with scripted key holds
    Simulate {
        /// Number of frames to run
        #[arg(short, long, default_value = "600")]
        frames: u64,
        /// Override the scatter seed
        #[arg(short, long)]
        seed: Option<u64>,
        /// Hold a key from the first frame, e.g. `ArrowUp:120` or `w:30`
        #[arg(long = "hold", value_parser = parse_hold)]
        holds: Vec<(Key, u64)>,
        /// Load real models from this asset root instead of placeholders
        #[arg(long)]
        assets: Option<PathBuf>,
        /// List every visible trash item in the final report
        #[arg(long)]
        list_trash: bool,
    },
    /// Load every scene asset under a root and report what was found
    Assets {
        /// Directory holding `assets/` and `models/`
        #[arg(long, default_value = ".")]
        root: PathBuf,
        /// Write the asset registry as JSON
        #[arg(long)]
        out: Option<PathBuf>,
        /// Compare against a registry written by an earlier run
        #[arg(long)]
        baseline: Option<PathBuf>,
    },
}

fn parse_hold(s: &str) -> Result<(Key, u64), String> {
    let (name, frames) = s
        .rsplit_once(':')
        .ok_or_else(|| format!("expected KEY:FRAMES, got `{s}`"))?;
    let key = Key::from_name(name).ok_or_else(|| format!("unbound key `{name}`"))?;
    let frames = frames
        .parse()
        .map_err(|e| format!("bad frame count `{frames}`: {e}"))?;
    Ok((key, frames))
}

/// Model handles for the three scene models: loaded from `assets` when
/// given, otherwise fixed placeholders.
fn scene_models(assets: Option<&Path>) -> anyhow::Result<[(ModelHandle, Option<String>); 3]> {
    let Some(root) = assets else {
        return Ok([
            (ModelHandle(1), None),
            (ModelHandle(2), Some(DEFAULT_CLIP.to_string())),
            (ModelHandle(3), None),
        ]);
    };
    let manifest = AssetManifest::new(root);
    let load = |request: AssetRequest| -> anyhow::Result<(ModelHandle, Option<String>)> {
        let loaded = load_now(&manifest, &request)
            .with_context(|| format!("load {}", request.label()))?;
        let clip = match &loaded.asset {
            Asset::Model(model) => model.first_clip().map(str::to_string),
            Asset::Texture(_) => None,
        };
        Ok((loaded.id.into(), clip))
    };
    Ok([
        load(AssetRequest::Boat)?,
        load(AssetRequest::Character(DEFAULT_CLIP.to_string()))?,
        load(AssetRequest::Trash)?,
    ])
}

/// Asset ids present only in `current`, and only in `baseline`.
fn registry_changes(baseline: &AssetStore, current: &AssetStore) -> (Vec<AssetId>, Vec<AssetId>) {
    let added = current
        .iter()
        .map(|(id, _)| *id)
        .filter(|id| baseline.get(*id).is_none())
        .collect();
    let removed = baseline
        .iter()
        .map(|(id, _)| *id)
        .filter(|id| current.get(*id).is_none())
        .collect();
    (added, removed)
}

/// Run `frames` frames with the given key holds. Each hold presses its key
/// before the first frame and releases it after `frames` frames.
fn simulate(
    config: SceneConfig,
    frames: u64,
    holds: &[(Key, u64)],
    models: [(ModelHandle, Option<String>); 3],
) -> World {
    let input = InputMap::new(&config.drive);
    let mut world = World::new(config);
    let [(boat, _), (character, clip), (trash, _)] = models;
    world.attach_model(Role::Boat, boat, None);
    world.attach_model(Role::Character, character, clip.as_deref());
    world.scatter_trash(trash);

    for &(key, _) in holds {
        apply_action(&mut world, input.on_key(key, KeyState::Down));
    }

    let (mut detached, mut collected) = (0usize, 0usize);
    for frame in 0..frames {
        for &(key, until) in holds {
            if until == frame {
                apply_action(&mut world, input.on_key(key, KeyState::Up));
            }
        }
        let report = world.step(1.0 / 60.0);
        if !report.is_quiet() {
            tracing::debug!(
                tick = report.tick,
                detached = report.detached.len(),
                collected = report.collected.len(),
                "trash contact"
            );
        }
        detached += report.detached.len();
        collected += report.collected.len();
    }
    tracing::info!(frames, detached, collected, "simulation finished");
    world
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut config = match &cli.config {
        Some(path) => SceneConfig::from_yaml_file(path)
            .with_context(|| format!("load scene config {}", path.display()))?,
        None => SceneConfig::default(),
    };

    match cli.command {
        Commands::Info => {
            println!("tidewater-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("clips: {}", CHARACTER_CLIPS.join(", "));
            println!("default clip: {DEFAULT_CLIP}");
            println!("--- scene config ---");
            print!("{}", serde_yaml::to_string(&config)?);
        }
        Commands::Simulate {
            frames,
            seed,
            holds,
            assets,
            list_trash,
        } => {
            if let Some(seed) = seed {
                config.seed = seed;
            }
            let models = scene_models(assets.as_deref())?;
            let world = simulate(config, frames, &holds, models);

            let renderer = DebugTextRenderer { list_trash };
            print!("{}", renderer.render(&world, &RenderView::default()));
            println!("{}", SceneInspector::summary(&world));
            println!(
                "stale entries: {}",
                SceneInspector::stale_trash(&world).len()
            );
            println!("state hash: {:#018x}", world.state_hash());
        }
        Commands::Assets {
            root,
            out,
            baseline,
        } => {
            let manifest = AssetManifest::new(root);
            println!("asset root: {}", manifest.root().display());
            let mut requests = vec![
                AssetRequest::Boat,
                AssetRequest::Trash,
                AssetRequest::WaterNormals,
            ];
            requests.extend(
                CHARACTER_CLIPS
                    .iter()
                    .map(|clip| AssetRequest::Character(clip.to_string())),
            );

            let mut store = AssetStore::new();
            let mut failed = 0usize;
            for request in &requests {
                match load_now(&manifest, request) {
                    Ok(loaded) => {
                        let detail = match &loaded.asset {
                            Asset::Model(m) => format!(
                                "{:?} meshes={} materials={} clips={}",
                                m.format,
                                m.mesh_count,
                                m.material_count,
                                m.animations.len()
                            ),
                            Asset::Texture(t) => format!("texture {}x{}", t.width, t.height),
                        };
                        println!("ok    {:<16} {:016x} {detail}", request.label(), loaded.id.0);
                        store.insert(loaded.id, loaded.asset);
                    }
                    Err(e) => {
                        failed += 1;
                        println!("FAIL  {:<16} {e}", request.label());
                    }
                }
            }

            if let Some(path) = baseline {
                let previous = AssetStore::load(&path)
                    .with_context(|| format!("read baseline registry {}", path.display()))?;
                let (added, removed) = registry_changes(&previous, &store);
                for id in &added {
                    println!("new   {:016x}", id.0);
                }
                for id in &removed {
                    println!("gone  {:016x}", id.0);
                }
                println!(
                    "baseline: {} new, {} gone, {} unchanged",
                    added.len(),
                    removed.len(),
                    store.len() - added.len()
                );
            }
            if let Some(out) = out {
                store
                    .save(&out)
                    .with_context(|| format!("write registry {}", out.display()))?;
                println!("registry: {} assets -> {}", store.len(), out.display());
            }
            if failed > 0 {
                bail!("{failed} of {} assets failed to load", requests.len());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hold_parsing() {
        assert_eq!(parse_hold("ArrowUp:120"), Ok((Key::ArrowUp, 120)));
        assert_eq!(parse_hold("w:3"), Ok((Key::W, 3)));
        assert!(parse_hold("W:3").is_err());
        assert!(parse_hold("ArrowUp").is_err());
        assert!(parse_hold("d:soon").is_err());
    }

    #[test]
    fn idle_simulation_only_scatters() {
        let world = simulate(
            SceneConfig::default(),
            10,
            &[],
            scene_models(None).unwrap(),
        );
        assert_eq!(world.tick(), 10);
        assert_eq!(world.animation().clip(), Some(DEFAULT_CLIP));
        // Nothing moved, so only items already under a vessel can be gone.
        assert!(world.tracked_count() <= 500);
        assert_eq!(
            world.boat().position(),
            Some(glam::Vec3::new(5.0, 13.0, 50.0))
        );
    }

    #[test]
    fn held_key_moves_then_stops() {
        let holds = [(Key::W, 5)];
        let world = simulate(
            SceneConfig::default(),
            20,
            &holds,
            scene_models(None).unwrap(),
        );
        let p = world.character().position().unwrap();
        assert!((p.z - 58.0).abs() < 1e-3);
        assert!(world.character().speed.is_still());
    }

    #[test]
    fn registry_changes_against_baseline() {
        use tidewater_assets::Texture;
        let texture = |name: &str| {
            Asset::Texture(Texture {
                name: name.to_string(),
                width: 1,
                height: 1,
            })
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.json");
        let mut previous = AssetStore::new();
        previous.insert(AssetId(1), texture("waternormals"));
        previous.insert(AssetId(2), texture("old"));
        previous.save(&path).unwrap();

        let mut current = AssetStore::new();
        current.insert(AssetId(1), texture("waternormals"));
        current.insert(AssetId(3), texture("new"));

        let baseline = AssetStore::load(&path).unwrap();
        let (added, removed) = registry_changes(&baseline, &current);
        assert_eq!(added, vec![AssetId(3)]);
        assert_eq!(removed, vec![AssetId(2)]);
    }

    #[test]
    fn same_seed_same_hash() {
        let run = || {
            simulate(
                SceneConfig::default(),
                50,
                &[(Key::ArrowUp, 50), (Key::A, 20)],
                scene_models(None).unwrap(),
            )
            .state_hash()
        };
        assert_eq!(run(), run());
    }
}
