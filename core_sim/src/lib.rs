//! Core simulation crate for the circle-map simulator.
//!
//! Packs circular zones onto a grid, seeds the grid with typed tokens and
//! advances the population one epoch at a time. The command service and TCP
//! transport wrap those steps for the server binary.

pub mod ascii;
pub mod config;
pub mod distribution;
pub mod geometry;
pub mod metrics;
pub mod migration;
pub mod network;
pub mod packer;
pub mod players;
pub mod registry;
pub mod service;
pub mod zones;

pub use config::{
    load_simulation_config_from_env, SimulationConfig, SimulationConfigError,
    SimulationConfigMetadata,
};
pub use distribution::distribute;
pub use metrics::{collect_metrics, SimulationMetrics};
pub use migration::{advance, advance_with_stats};
pub use packer::{CirclePacker, PackingConfig, PackingError};
pub use registry::{MapRecord, MapRegistry};
pub use service::{CommandService, ServiceError};
pub use zones::{classify, ZoneGrid};
