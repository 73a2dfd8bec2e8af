use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Direction, MapId, PlayerId};

/// Supported command payloads.
///
/// The JSON form is an object tagged by `command`, e.g.
/// `{"command":"epoch","map_id":3,"steps":2}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum CommandPayload {
    CreateMap {
        width: u32,
        height: u32,
        spawns: u32,
        bedrooms: u32,
        spawn_radius: u32,
        bedroom_radius: u32,
        max_gap: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seed: Option<u64>,
    },
    ListMaps,
    Distribute {
        map_id: MapId,
        probabilities: Vec<f64>,
    },
    #[serde(rename = "speeds")]
    SetSpeeds {
        map_id: MapId,
        speeds: Vec<f64>,
    },
    Epoch {
        map_id: MapId,
        #[serde(default = "default_steps")]
        steps: u32,
    },
    Show {
        map_id: MapId,
    },
    SpawnPlayer {
        map_id: MapId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    MovePlayer {
        player_id: PlayerId,
        direction: Direction,
    },
    ViewPlayer {
        player_id: PlayerId,
    },
}

fn default_steps() -> u32 {
    1
}

/// Error returned when decoding a JSON command line fails.
#[derive(Debug, Error)]
pub enum CommandDecodeError {
    #[error("malformed command json: {0}")]
    Json(#[from] serde_json::Error),
}

impl CommandPayload {
    pub fn verb(&self) -> &'static str {
        match self {
            CommandPayload::CreateMap { .. } => "create_map",
            CommandPayload::ListMaps => "list_maps",
            CommandPayload::Distribute { .. } => "distribute",
            CommandPayload::SetSpeeds { .. } => "speeds",
            CommandPayload::Epoch { .. } => "epoch",
            CommandPayload::Show { .. } => "show",
            CommandPayload::SpawnPlayer { .. } => "spawn_player",
            CommandPayload::MovePlayer { .. } => "move_player",
            CommandPayload::ViewPlayer { .. } => "view_player",
        }
    }

    pub fn from_json(line: &str) -> Result<Self, CommandDecodeError> {
        Ok(serde_json::from_str(line)?)
    }

    pub fn to_json(&self) -> Result<String, CommandDecodeError> {
        Ok(serde_json::to_string(self)?)
    }
}
