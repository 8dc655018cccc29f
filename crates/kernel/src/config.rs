//! Scene configuration: spawn poses, trash scatter, contact and drive tuning.
//!
//! Every field has a default matching the stock scene, so an empty YAML
//! document (or no file at all) yields a playable configuration.

use glam::Vec3;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

use crate::collision::BoatContact;

/// Errors from loading or validating a [`SceneConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Pose applied to a vessel each time a model is attached to it.
///
/// In YAML a pose may be partial; omitted fields keep the stock pose of
/// that vessel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPose {
    pub position: Vec3,
    /// Rotation about +Y in radians.
    pub yaw: f32,
    pub scale: f32,
}

impl SpawnPose {
    pub fn boat() -> Self {
        Self {
            position: Vec3::new(5.0, 13.0, 50.0),
            yaw: 1.5,
            scale: 3.0,
        }
    }

    pub fn character() -> Self {
        Self {
            position: Vec3::new(10.0, -8.0, 53.0),
            yaw: 0.0,
            scale: 0.05,
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct PosePatch {
    position: Option<Vec3>,
    yaw: Option<f32>,
    scale: Option<f32>,
}

impl PosePatch {
    fn over(self, base: SpawnPose) -> SpawnPose {
        SpawnPose {
            position: self.position.unwrap_or(base.position),
            yaw: self.yaw.unwrap_or(base.yaw),
            scale: self.scale.unwrap_or(base.scale),
        }
    }
}

fn boat_pose<'de, D: Deserializer<'de>>(d: D) -> Result<SpawnPose, D::Error> {
    PosePatch::deserialize(d).map(|p| p.over(SpawnPose::boat()))
}

fn character_pose<'de, D: Deserializer<'de>>(d: D) -> Result<SpawnPose, D::Error> {
    PosePatch::deserialize(d).map(|p| p.over(SpawnPose::character()))
}

/// How trash is scattered at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrashConfig {
    pub count: usize,
    pub scale: f32,
    /// Half-open `[min, max)` range for the X coordinate.
    pub x_range: [f32; 2],
    /// Half-open `[min, max)` range for the Z coordinate.
    pub z_range: [f32; 2],
    pub height: f32,
}

impl Default for TrashConfig {
    fn default() -> Self {
        Self {
            count: 500,
            scale: 1.5,
            x_range: [-500.0, 500.0],
            z_range: [-1000.0, 1000.0],
            height: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    /// Per-axis distance below which two objects touch.
    pub threshold: f32,
    pub boat: BoatContact,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            threshold: 15.0,
            boat: BoatContact::Detach,
        }
    }
}

/// Magnitudes written into a vessel's speed on key-down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    pub speed: f32,
    pub turn_rate: f32,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            turn_rate: 0.1,
        }
    }
}

/// Full scene configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Seed for the trash scatter stream.
    pub seed: u64,
    pub trash: TrashConfig,
    pub contact: ContactConfig,
    pub drive: DriveConfig,
    #[serde(deserialize_with = "boat_pose")]
    pub boat: SpawnPose,
    #[serde(deserialize_with = "character_pose")]
    pub character: SpawnPose,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            trash: TrashConfig::default(),
            contact: ContactConfig::default(),
            drive: DriveConfig::default(),
            boat: SpawnPose::boat(),
            character: SpawnPose::character(),
        }
    }
}

impl SceneConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = if source.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(source)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_yaml_str(&source)?;
        tracing::debug!(path = %path.as_ref().display(), "scene config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = |v: f32| v.is_finite();
        if !(finite(self.contact.threshold) && self.contact.threshold > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "contact.threshold must be positive, got {}",
                self.contact.threshold
            )));
        }
        for (name, [min, max]) in [("x_range", self.trash.x_range), ("z_range", self.trash.z_range)]
        {
            if !(finite(min) && finite(max) && min <= max) {
                return Err(ConfigError::Invalid(format!(
                    "trash.{name} must be an ordered finite pair, got [{min}, {max}]"
                )));
            }
        }
        if !(finite(self.trash.scale) && self.trash.scale > 0.0) {
            return Err(ConfigError::Invalid("trash.scale must be positive".into()));
        }
        if !finite(self.trash.height) {
            return Err(ConfigError::Invalid(format!(
                "trash.height must be finite, got {}",
                self.trash.height
            )));
        }
        for (name, pose) in [("boat", &self.boat), ("character", &self.character)] {
            if !(pose.position.is_finite() && finite(pose.yaw) && pose.scale > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} pose is not usable")));
            }
        }
        if !(finite(self.drive.speed) && finite(self.drive.turn_rate)) {
            return Err(ConfigError::Invalid("drive values must be finite".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_stock_scene() {
        let c = SceneConfig::default();
        assert_eq!(c.trash.count, 500);
        assert_eq!(c.contact.threshold, 15.0);
        assert_eq!(c.contact.boat, BoatContact::Detach);
        assert_eq!(c.boat.position, Vec3::new(5.0, 13.0, 50.0));
        assert_eq!(c.character.position, Vec3::new(10.0, -8.0, 53.0));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn empty_yaml_is_default() {
        let c = SceneConfig::from_yaml_str("").unwrap();
        assert_eq!(c, SceneConfig::default());
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let c = SceneConfig::from_yaml_str(
            "seed: 7\ntrash:\n  count: 12\ncontact:\n  boat: collect\n",
        )
        .unwrap();
        assert_eq!(c.seed, 7);
        assert_eq!(c.trash.count, 12);
        assert_eq!(c.trash.scale, 1.5);
        assert_eq!(c.contact.boat, BoatContact::Collect);
        assert_eq!(c.contact.threshold, 15.0);
    }

    #[test]
    fn rejects_non_positive_threshold() {
        let err = SceneConfig::from_yaml_str("contact:\n  threshold: 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_reversed_range() {
        let err = SceneConfig::from_yaml_str("trash:\n  x_range: [10.0, -10.0]\n").unwrap_err();
        assert!(err.to_string().contains("x_range"));
    }

    #[test]
    fn partial_pose_keeps_stock_fields() {
        let c = SceneConfig::from_yaml_str("boat:\n  yaw: 2.0\ncharacter:\n  scale: 0.1\n")
            .unwrap();
        assert_eq!(c.boat.yaw, 2.0);
        assert_eq!(c.boat.position, Vec3::new(5.0, 13.0, 50.0));
        assert_eq!(c.boat.scale, 3.0);
        assert_eq!(c.character.scale, 0.1);
        assert_eq!(c.character.position, Vec3::new(10.0, -8.0, 53.0));

        let err = SceneConfig::from_yaml_str("boat:\n  heading: 2.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn rejects_non_finite_trash_height() {
        let err = SceneConfig::from_yaml_str("trash:\n  height: .nan\n").unwrap_err();
        assert!(err.to_string().contains("trash.height"));
        let err = SceneConfig::from_yaml_str("trash:\n  height: .inf\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_unknown_policy() {
        let err = SceneConfig::from_yaml_str("contact:\n  boat: sink\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "drive:\n  speed: 2.5").unwrap();
        let c = SceneConfig::from_yaml_file(tmp.path()).unwrap();
        assert_eq!(c.drive.speed, 2.5);
        assert_eq!(c.drive.turn_rate, 0.1);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SceneConfig::from_yaml_file("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
