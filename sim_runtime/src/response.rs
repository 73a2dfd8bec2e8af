//! Response envelope written back for every request line.

use serde::{Deserialize, Serialize};

use crate::{
    Circle, MapConfig, MapId, MigrationStats, Player, Population, SpeedTable, TokenKind,
    ZoneType,
};

/// Wire taxonomy of failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    PackingExhausted,
    UnknownReference,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::PackingExhausted => "packing_exhausted",
            ErrorKind::UnknownReference => "unknown_reference",
            ErrorKind::Internal => "internal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    Ok(ResponseBody),
    Error { kind: ErrorKind, message: String },
}

impl Response {
    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        Response::Error {
            kind,
            message: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Response::Ok(_))
    }

    /// Single-line JSON form. Serialisation of these types cannot realistically
    /// fail, but if it does the client still gets a well-formed error line.
    pub fn to_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|err| {
            format!(
                r#"{{"status":"error","kind":"internal","message":"response encoding failed: {}"}}"#,
                err.to_string().replace('"', "'")
            )
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ResponseBody {
    MapCreated(MapSummary),
    Maps {
        maps: Vec<MapSummary>,
    },
    Distributed {
        map_id: MapId,
        epoch: u64,
        total_tokens: usize,
        fingerprint: u64,
        population: Population,
    },
    SpeedsSet {
        map_id: MapId,
        speeds: SpeedTable,
    },
    Epoch(EpochReport),
    Map {
        summary: MapSummary,
        population: Option<Population>,
        rows: Vec<String>,
        /// Players currently on the map, by id.
        players: Vec<Player>,
    },
    Player {
        player: Player,
    },
    View(PlayerView),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSummary {
    pub id: MapId,
    pub name: String,
    pub config: MapConfig,
    pub circles: Vec<Circle>,
    pub speeds: SpeedTable,
    pub epoch: u64,
    pub seeded: bool,
    pub seed: u64,
    pub created_at_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochReport {
    pub map_id: MapId,
    pub epoch: u64,
    pub steps: u32,
    pub total_tokens: usize,
    pub fingerprint: u64,
    pub stats: MigrationStats,
    pub population: Population,
}

/// Zone of a cell in a player's view; cells past the map edge are `Outside`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewZone {
    Exterior,
    Interior,
    Center,
    Outside,
}

impl From<Option<ZoneType>> for ViewZone {
    fn from(zone: Option<ZoneType>) -> Self {
        match zone {
            Some(ZoneType::Exterior) => ViewZone::Exterior,
            Some(ZoneType::Interior) => ViewZone::Interior,
            Some(ZoneType::Center) => ViewZone::Center,
            None => ViewZone::Outside,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellView {
    pub map_x: i32,
    pub map_y: i32,
    pub view_x: u32,
    pub view_y: u32,
    pub is_player: bool,
    pub zone: ViewZone,
    pub tokens: Vec<TokenKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub player: Player,
    pub radius: u32,
    /// Rows top to bottom, each left to right.
    pub cells: Vec<Vec<CellView>>,
}
