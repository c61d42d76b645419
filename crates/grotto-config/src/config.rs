//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name of the persisted configuration inside a config directory.
const CONFIG_FILE_NAME: &str = "config.ron";

/// Top-level generator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Cave generation parameters.
    pub generation: GenerationConfig,
    /// Where and how the scene file is written.
    pub output: OutputConfig,
    /// Logging settings.
    pub debug: DebugConfig,
}

/// Parameters that shape the generated cave.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationConfig {
    /// Seed for both the noise permutation table and object placement.
    pub seed: u64,
    /// World-space extent of the cave floor along x (z is stretched).
    pub floor_size: f64,
    /// Number of grid cells per side of the shell. Must be at least 1.
    pub floor_res: u32,
    /// Base crystal count; every other object count is derived from it.
    pub num_crystals: u32,
    /// Sides of each crystal ring. Must be at least 3.
    pub crystal_segments: u32,
    /// Sides of each pillar ring. Must be at least 3.
    pub pillar_segments: u32,
    /// Number of stacked ring intervals per pillar. Must be at least 1.
    pub pillar_slices: u32,
}

/// Scene file output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Destination path of the scene file.
    pub path: PathBuf,
    /// Material library referenced by the `mtllib` line.
    pub material_library: String,
    /// Uniform scale applied to every emitted position.
    pub scale: f64,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log filter (e.g. "debug", "info,grotto_mesh=trace").
    pub log_level: String,
    /// Directory for JSON log files in debug builds. `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            floor_size: 4.0,
            floor_res: 40,
            num_crystals: 40,
            crystal_segments: 6,
            pillar_segments: 12,
            pillar_slices: 10,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("crystal_cave.obj"),
            material_library: "crystal_cave.mtl".to_string(),
            scale: 10.0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: None,
        }
    }
}

/// Platform config directory for Grotto (e.g. `~/.config/grotto` on Linux).
///
/// Returns `None` when the platform exposes no config directory.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("grotto"))
}

// --- Load / Save ---

impl Config {
    /// Load `config.ron` from the given directory, or fall back to defaults if
    /// the file does not exist. Nothing is written to disk.
    pub fn load_or_default(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            log::debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Config::default());
        }

        let contents =
            std::fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
                path: config_path.clone(),
                source,
            })?;
        let config: Config = ron::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: config_path.clone(),
            source,
        })?;
        log::info!("Loaded config from {}", config_path.display());
        Ok(config)
    }

    /// Save the config to the given directory as `config.ron`, creating the
    /// directory if needed. Returns the written path.
    pub fn save(&self, config_dir: &Path) -> Result<PathBuf, ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::Write {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(2)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::Write {
            path: config_path.clone(),
            source,
        })?;
        log::info!("Saved config to {}", config_path.display());
        Ok(config_path)
    }
}
