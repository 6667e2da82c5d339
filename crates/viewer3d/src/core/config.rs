//! # Viewer Configuration
//!
//! Top-level configuration for a viewer: logging, material resolution,
//! loader behavior and camera framing. Every section has defaults, so a
//! config file only needs the values it changes.
//!
//! ```toml
//! [engine]
//! log_level = "debug"
//!
//! [materials]
//! side = "double"
//! ignore_zero_rgbs = true
//!
//! [loader.geometry_retry]
//! max_retries = 2
//!
//! [camera]
//! initial_position = [0.0, 50.0, 250.0]
//! frame_target = "bounds_center"
//! ```

use serde::{Deserialize, Serialize};

pub use crate::assets::materials::MaterialOptions;
pub use crate::config::{Config, ConfigError};
use crate::foundation::math::Vec3;
use crate::loading::retry::RetryPolicy;

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Core behavior: logging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default log filter, overridden by `RUST_LOG`
    pub log_level: String,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Fetching and decoding behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Read full DDS mip chains instead of only the top level
    pub load_mipmaps: bool,
    /// Retry policy for geometry fetches
    pub geometry_retry: RetryPolicy,
}

impl LoaderConfig {
    /// Create a new loader configuration
    pub fn new() -> Self {
        Self {
            load_mipmaps: true,
            geometry_retry: RetryPolicy::default(),
        }
    }

    /// Enable or disable mip chain loading
    pub fn with_mipmaps(mut self, enabled: bool) -> Self {
        self.load_mipmaps = enabled;
        self
    }

    /// Set the geometry retry policy
    pub fn with_geometry_retry(mut self, policy: RetryPolicy) -> Self {
        self.geometry_retry = policy;
        self
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Point the camera looks at after geometry is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameTarget {
    /// The scene's own center (its origin)
    #[default]
    SceneCenter,
    /// Center of the attached object's bounding box
    BoundsCenter,
}

/// Camera framing applied once geometry is attached
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Position to move to before looking at the target
    pub initial_position: Option<Vec3>,
    /// Euler rotation (radians) to apply before looking at the target
    pub initial_rotation: Option<Vec3>,
    /// What to look at
    pub frame_target: FrameTarget,
}

impl CameraConfig {
    /// Set the initial position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.initial_position = Some(position);
        self
    }

    /// Set the initial rotation
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.initial_rotation = Some(rotation);
        self
    }

    /// Set the framing target
    pub fn with_frame_target(mut self, target: FrameTarget) -> Self {
        self.frame_target = target;
        self
    }
}

/// # Complete Viewer Configuration
///
/// The main configuration structure applications should use.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Engine core configuration
    pub engine: EngineConfig,
    /// Material resolution options
    pub materials: MaterialOptions,
    /// Loader configuration
    pub loader: LoaderConfig,
    /// Camera framing
    pub camera: CameraConfig,
}

impl ViewerConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set engine configuration
    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    /// Set material options
    pub fn with_materials(mut self, materials: MaterialOptions) -> Self {
        self.materials = materials;
        self
    }

    /// Set loader configuration
    pub fn with_loader(mut self, loader: LoaderConfig) -> Self {
        self.loader = loader;
        self
    }

    /// Set camera configuration
    pub fn with_camera(mut self, camera: CameraConfig) -> Self {
        self.camera = camera;
        self
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.engine.log_level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::Invalid(format!("Unknown log level '{}'", self.engine.log_level)));
        }

        let retry = &self.loader.geometry_retry;
        if !(retry.multiplier.is_finite() && retry.multiplier >= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "Retry multiplier must be at least 1.0, got {}",
                retry.multiplier
            )));
        }
        if retry.initial_backoff_ms > retry.max_backoff_ms {
            return Err(ConfigError::Invalid(
                "Initial retry backoff exceeds the maximum backoff".to_string(),
            ));
        }

        let finite = |v: &Option<Vec3>| v.map_or(true, |v| v.iter().all(|c| c.is_finite()));
        if !finite(&self.camera.initial_position) || !finite(&self.camera.initial_rotation) {
            return Err(ConfigError::Invalid("Camera vectors must be finite".to_string()));
        }

        Ok(())
    }
}

impl Config for ViewerConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::materials::Side;

    #[test]
    fn test_defaults_are_valid() {
        let config = ViewerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.engine.log_level, "info");
        assert!(config.loader.load_mipmaps);
        assert_eq!(config.loader.geometry_retry.max_retries, 0);
        assert_eq!(config.camera.frame_target, FrameTarget::SceneCenter);
    }

    #[test]
    fn test_partial_toml() {
        let config = ViewerConfig::from_toml_str(
            r#"
[materials]
side = "double"
ignore_zero_rgbs = true
texture_path = "textures/"

[loader]
load_mipmaps = false

[loader.geometry_retry]
max_retries = 2

[camera]
initial_position = [0.0, 50.0, 250.0]
frame_target = "bounds_center"
"#,
        )
        .unwrap();

        assert_eq!(config.materials.side, Side::Double);
        assert!(config.materials.ignore_zero_rgbs);
        assert!(!config.materials.normalize_rgb);
        assert_eq!(config.materials.texture_path.as_deref(), Some("textures/"));
        assert!(!config.loader.load_mipmaps);
        assert_eq!(config.loader.geometry_retry.max_retries, 2);
        assert_eq!(config.loader.geometry_retry.initial_backoff_ms, 500);
        assert_eq!(config.camera.initial_position, Some(Vec3::new(0.0, 50.0, 250.0)));
        assert_eq!(config.camera.frame_target, FrameTarget::BoundsCenter);
        assert_eq!(config.engine.log_level, "info");
    }

    #[test]
    fn test_ron_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.ron");

        let config = ViewerConfig::new()
            .with_engine(EngineConfig::new().with_log_level("debug"))
            .with_camera(CameraConfig::default().with_rotation(Vec3::new(0.1, 0.2, 0.0)));
        config.save_to_file(&path).unwrap();

        assert_eq!(ViewerConfig::load_from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.json");
        std::fs::write(&path, "{}").unwrap();
        assert!(matches!(ViewerConfig::load_from_file(&path), Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad_level = ViewerConfig::new().with_engine(EngineConfig::new().with_log_level("loud"));
        assert!(matches!(bad_level.validate(), Err(ConfigError::Invalid(_))));

        let mut bad_retry = ViewerConfig::new();
        bad_retry.loader.geometry_retry.multiplier = 0.5;
        assert!(bad_retry.validate().is_err());

        let bad_camera = ViewerConfig::new().with_camera(CameraConfig::default().with_position(Vec3::new(f32::NAN, 0.0, 0.0)));
        assert!(bad_camera.validate().is_err());
    }
}
