//! Configuration System
//!
//! Loads run parameters from `rps.toml` so they can be adjusted without
//! recompiling. Every section and field is optional; missing values fall back
//! to the defaults below.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

use crate::population::{PopulationSettings, DEFAULT_SAMPLE_SIZE};
use crate::rules::RewardPolicy;

/// Default config file path
pub const DEFAULT_CONFIG_PATH: &str = "rps.toml";

/// Top-level configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub simulation: SimulationConfig,
    pub rewards: RewardPolicy,
    pub output: OutputConfig,
}

/// Simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Initial participants, rounded down to a multiple of 3
    pub participants: u64,
    pub max_cycles: u64,
    /// Explicit [R, P, S] counts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<Vec<i64>>,
    /// RNG seed; drawn from entropy when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Agents listed per cycle summary
    pub sample_size: usize,
    /// Resolve matches in parallel once a cycle has this many players
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel_threshold: Option<usize>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            participants: 9999,
            max_cycles: 100,
            distribution: None,
            seed: None,
            sample_size: DEFAULT_SAMPLE_SIZE,
            parallel_threshold: None,
        }
    }
}

/// Where and whether to persist snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub write_snapshots: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
            write_snapshots: false,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path`, or use defaults if the file is missing.
    ///
    /// A file that exists but cannot be parsed is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            warn!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let sim = &self.simulation;
        if sim.participants == 0 {
            return Err(ConfigError::Invalid("simulation.participants must be positive".into()));
        }
        if sim.max_cycles == 0 {
            return Err(ConfigError::Invalid("simulation.max_cycles must be positive".into()));
        }
        if sim.sample_size == 0 {
            return Err(ConfigError::Invalid("simulation.sample_size must be positive".into()));
        }
        if sim.parallel_threshold == Some(0) {
            return Err(ConfigError::Invalid(
                "simulation.parallel_threshold must be positive when set".into(),
            ));
        }
        Ok(())
    }

    /// Engine construction parameters described by this config
    pub fn population_settings(&self) -> PopulationSettings {
        let sim = &self.simulation;
        PopulationSettings {
            participants: sim.participants,
            max_cycles: sim.max_cycles,
            distribution: sim.distribution.clone(),
            rewards: self.rewards,
            sample_size: sim.sample_size,
            parallel_threshold: sim.parallel_threshold,
        }
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
