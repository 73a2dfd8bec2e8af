use std::{
    env, fs, io,
    net::{Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::Deserialize;
use sim_runtime::ValidationLimits;
use thiserror::Error;

use crate::packer::PackingConfig;

pub const BUILTIN_SIMULATION_CONFIG: &str = include_str!("data/simulation_config.json");
pub const SIMULATION_CONFIG_ENV: &str = "SIM_CONFIG_PATH";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub command_bind: SocketAddr,
    pub max_width: u32,
    pub max_height: u32,
    pub max_cells: u64,
    /// Most migrations a single `epoch` request may run.
    pub max_epoch_steps: u32,
    pub packing: PackingConfig,
    /// Seed for maps created without one. `None` draws a fresh seed per map.
    pub seed: Option<u64>,
    /// Half-width of the square a player sees around itself.
    pub view_radius: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            command_bind: SocketAddr::from((Ipv4Addr::LOCALHOST, 41010)),
            max_width: 100,
            max_height: 100,
            max_cells: 10_000,
            max_epoch_steps: 1_000,
            packing: PackingConfig::default(),
            seed: None,
            view_radius: 2,
        }
    }
}

impl SimulationConfig {
    pub fn builtin() -> Arc<Self> {
        let config = Self::from_json_str(BUILTIN_SIMULATION_CONFIG).unwrap_or_else(|err| {
            tracing::error!(
                target: "circle_map::config",
                error = %err,
                "simulation_config.builtin_invalid"
            );
            Self::default()
        });
        Arc::new(config)
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_file(path: &Path) -> Result<Self, SimulationConfigError> {
        let contents =
            fs::read_to_string(path).map_err(|source| SimulationConfigError::ReadFailed {
                path: path.to_path_buf(),
                source,
            })?;
        let config = SimulationConfig::from_json_str(&contents)?;
        Ok(config)
    }

    pub fn limits(&self) -> ValidationLimits {
        ValidationLimits {
            max_width: self.max_width,
            max_height: self.max_height,
            max_cells: self.max_cells,
            max_epoch_steps: self.max_epoch_steps,
        }
    }
}

#[derive(Debug, Error)]
pub enum SimulationConfigError {
    #[error("failed to parse simulation config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read simulation config from {path:?}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, Default)]
pub struct SimulationConfigMetadata {
    path: Option<PathBuf>,
}

impl SimulationConfigMetadata {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// File the config came from; `None` for the builtin.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

pub fn load_simulation_config_from_env() -> (Arc<SimulationConfig>, SimulationConfigMetadata) {
    let Some(path) = env::var(SIMULATION_CONFIG_ENV).ok().map(PathBuf::from) else {
        tracing::info!(
            target: "circle_map::config",
            "simulation_config.loaded=builtin"
        );
        return (
            SimulationConfig::builtin(),
            SimulationConfigMetadata::new(None),
        );
    };

    match SimulationConfig::from_file(&path) {
        Ok(config) => {
            tracing::info!(
                target: "circle_map::config",
                path = %path.display(),
                "simulation_config.loaded=file"
            );
            (Arc::new(config), SimulationConfigMetadata::new(Some(path)))
        }
        Err(err) => {
            tracing::warn!(
                target: "circle_map::config",
                path = %path.display(),
                error = %err,
                "simulation_config.load_failed"
            );
            (
                SimulationConfig::builtin(),
                SimulationConfigMetadata::new(None),
            )
        }
    }
}
