//! Shared runtime utilities for the circle-map simulator.
//!
//! This crate re-exports the data contracts from `sim_schema` and adds the
//! request/response protocol on top of them (command parsing, input
//! validation, the response envelope) without depending on `core_sim`.

pub use sim_schema::*;

pub mod command_text;
mod commands;
pub mod response;
pub mod validation;

pub use command_text::{parse_command_line, parse_request_line, CommandParseError};
pub use commands::{CommandDecodeError, CommandPayload};
pub use response::{
    CellView, EpochReport, ErrorKind, MapSummary, PlayerView, Response, ResponseBody, ViewZone,
};
pub use validation::{
    validate_epoch_steps, validate_map_config, validate_probabilities, validate_speeds, ValidationError,
    ValidationLimits,
};
