//! Gameplay tuning and application configuration.
//!
//! Every gameplay constant lives in [`Tuning`], which the game state receives
//! at construction and never mutates. [`AppConfig`] wraps it with the settings
//! the frame driver needs. Both deserialize from TOML with every key optional.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "FLAPPY_CONFIG";

/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "flappy.toml";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Physics, geometry and timing constants, in playfield units per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub field_width: f64,
    pub field_height: f64,

    pub gravity: f64,
    /// Velocity set by a flap (negative = upward).
    pub jump_velocity: f64,
    /// Rotation snapped to on a flap, in degrees.
    pub jump_rotation: f64,
    pub rotation_step: f64,
    pub rotation_max: f64,
    pub rotation_min: f64,

    pub bird_start_x: f64,
    pub bird_width: f64,
    pub bird_height: f64,
    /// Hitbox inset on every side of the bird sprite.
    pub hitbox_inset: f64,

    /// Leftward scroll per frame.
    pub pipe_speed: f64,
    pub pipe_width: i32,
    pub pipe_texture_height: i32,
    pub gap_half: i32,
    pub gap_center_min: i32,
    pub gap_center_max: i32,
    /// Pipes at or left of this x are dropped.
    pub pipe_despawn_x: f64,
    pub spawn_interval_ms: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: 288.0,
            field_height: 512.0,
            gravity: 0.25,
            jump_velocity: -6.0,
            jump_rotation: 45.0,
            rotation_step: 3.0,
            rotation_max: 30.0,
            rotation_min: -45.0,
            bird_start_x: 50.0,
            bird_width: 34.0,
            bird_height: 24.0,
            hitbox_inset: 5.0,
            pipe_speed: 4.0,
            pipe_width: 80,
            pipe_texture_height: 320,
            gap_half: 100,
            gap_center_min: 150,
            gap_center_max: 350,
            pipe_despawn_x: -52.0,
            spawn_interval_ms: 1500,
        }
    }
}

impl Tuning {
    /// Bird start position: fixed column, vertical middle (whole units).
    pub fn bird_start(&self) -> (f64, f64) {
        (self.bird_start_x, (self.field_height / 2.0).floor())
    }

    /// Lowest y the bird's top edge can take before touching the floor.
    pub fn floor_y(&self) -> f64 {
        self.field_height - self.bird_height
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let floats = [
            ("field_width", self.field_width),
            ("field_height", self.field_height),
            ("gravity", self.gravity),
            ("jump_velocity", self.jump_velocity),
            ("jump_rotation", self.jump_rotation),
            ("rotation_step", self.rotation_step),
            ("rotation_max", self.rotation_max),
            ("rotation_min", self.rotation_min),
            ("bird_start_x", self.bird_start_x),
            ("bird_width", self.bird_width),
            ("bird_height", self.bird_height),
            ("hitbox_inset", self.hitbox_inset),
            ("pipe_speed", self.pipe_speed),
            ("pipe_despawn_x", self.pipe_despawn_x),
        ];
        if let Some((name, value)) = floats.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::Invalid(format!("{name} must be finite, got {value}")));
        }
        if self.field_width <= 0.0 || self.field_height <= 0.0 {
            return Err(ConfigError::Invalid("field size must be positive".into()));
        }
        if self.bird_width <= 0.0 || self.bird_height <= 0.0 {
            return Err(ConfigError::Invalid("bird size must be positive".into()));
        }
        if self.hitbox_inset * 2.0 >= self.bird_width.min(self.bird_height) {
            return Err(ConfigError::Invalid(format!(
                "hitbox inset {} leaves no hitbox",
                self.hitbox_inset
            )));
        }
        if self.pipe_width <= 0 || self.pipe_texture_height <= 0 || self.gap_half <= 0 {
            return Err(ConfigError::Invalid("pipe dimensions must be positive".into()));
        }
        if self.gap_center_min > self.gap_center_max {
            return Err(ConfigError::Invalid(format!(
                "gap center range {}..={} is empty",
                self.gap_center_min, self.gap_center_max
            )));
        }
        // Widened so extreme values are rejected instead of overflowing
        let top = i64::from(self.gap_center_min) - i64::from(self.gap_half);
        let bottom = i64::from(self.gap_center_max) + i64::from(self.gap_half);
        if top < 0 || bottom as f64 > self.field_height {
            return Err(ConfigError::Invalid(format!(
                "gap range {top}..{bottom} does not fit in a field {} tall",
                self.field_height
            )));
        }
        if self.pipe_speed <= 0.0 {
            return Err(ConfigError::Invalid("pipe speed must be positive".into()));
        }
        if self.spawn_interval_ms == 0 {
            return Err(ConfigError::Invalid("spawn interval must be positive".into()));
        }
        Ok(())
    }
}

/// Everything read from the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub fps: u32,
    /// Fixed RNG seed for reproducible pipe layouts.
    pub seed: Option<u64>,
    /// Log destination; an empty path disables logging.
    pub log_file: PathBuf,
    /// `RUST_LOG`-style filter, overridden by the environment when set.
    pub log_level: String,
    pub tuning: Tuning,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            seed: None,
            log_file: PathBuf::from("flappy-tui.log"),
            log_level: "info".to_string(),
            tuning: Tuning::default(),
        }
    }
}

impl AppConfig {
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    /// Resolve the config: `$FLAPPY_CONFIG` if set (must exist), else
    /// `flappy.toml` in the working directory if present, else defaults.
    pub fn discover() -> Result<(Self, Option<PathBuf>), ConfigError> {
        let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        Self::resolve(explicit, Path::new(DEFAULT_CONFIG_FILE))
    }

    fn resolve(
        explicit: Option<PathBuf>,
        fallback: &Path,
    ) -> Result<(Self, Option<PathBuf>), ConfigError> {
        if let Some(path) = explicit {
            let config = Self::load_from_file(&path)?;
            return Ok((config, Some(path)));
        }
        if fallback.is_file() {
            let config = Self::load_from_file(fallback)?;
            return Ok((config, Some(fallback.to_path_buf())));
        }
        Ok((Self::default(), None))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fps == 0 {
            return Err(ConfigError::Invalid("fps must be positive".into()));
        }
        self.tuning.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.fps, 60);
        assert_eq!(config.tuning.spawn_interval_ms, 1500);
        assert_eq!(config.tuning.bird_start(), (50.0, 256.0));
        assert_eq!(config.tuning.floor_y(), 488.0);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            seed = 7

            [tuning]
            gravity = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.tuning.gravity, 0.5);
        assert_eq!(config.tuning.pipe_width, 80);
        assert_eq!(config.fps, 60);
    }

    #[test]
    fn test_empty_gap_range_rejected() {
        let err = AppConfig::from_toml(
            r#"
            [tuning]
            gap_center_min = 300
            gap_center_max = 200
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_gap_outside_field_rejected() {
        let mut tuning = Tuning::default();
        tuning.gap_center_max = 450;
        assert!(matches!(tuning.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_extreme_gap_values_rejected() {
        let err = AppConfig::from_toml(
            r#"
            [tuning]
            gap_center_max = 2147483647
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let mut tuning = Tuning::default();
        tuning.gap_center_min = i32::MIN;
        tuning.gap_half = i32::MAX;
        assert!(matches!(tuning.validate(), Err(ConfigError::Invalid(_))));

        let mut tuning = Tuning::default();
        tuning.gap_center_max = i32::MAX;
        tuning.gap_half = i32::MAX;
        assert!(matches!(tuning.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_non_finite_floats_rejected() {
        for text in [
            "[tuning]\ngravity = nan",
            "[tuning]\njump_velocity = -inf",
            "[tuning]\nfield_height = inf",
            "[tuning]\npipe_despawn_x = nan",
        ] {
            let err = AppConfig::from_toml(text).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "accepted {text:?}");
        }
    }

    #[test]
    fn test_non_positive_pipe_speed_rejected() {
        let mut tuning = Tuning::default();
        tuning.pipe_speed = 0.0;
        assert!(matches!(tuning.validate(), Err(ConfigError::Invalid(_))));
        tuning.pipe_speed = -4.0;
        assert!(matches!(tuning.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = AppConfig {
            seed: Some(11),
            ..AppConfig::default()
        };
        let text = toml::to_string(&config).unwrap();
        assert_eq!(AppConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_zero_fps_rejected() {
        let err = AppConfig::from_toml("fps = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_oversized_inset_rejected() {
        let mut tuning = Tuning::default();
        tuning.hitbox_inset = 12.0;
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let err = AppConfig::from_toml("fps = \"fast\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "fps = 30\nlog_file = \"\"").unwrap();
        let config = AppConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.fps, 30);
        assert_eq!(config.log_file, PathBuf::new());
    }

    #[test]
    fn test_missing_explicit_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = AppConfig::resolve(Some(missing), Path::new("unused.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_resolve_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, path) = AppConfig::resolve(None, &dir.path().join("flappy.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(path.is_none());
    }

    #[test]
    fn test_resolve_uses_fallback_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flappy.toml");
        std::fs::write(&path, "fps = 45").unwrap();
        let (config, used) = AppConfig::resolve(None, &path).unwrap();
        assert_eq!(config.fps, 45);
        assert_eq!(used.as_deref(), Some(path.as_path()));
    }
}
