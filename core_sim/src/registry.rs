//! In-memory store of map records and players.

use std::collections::BTreeMap;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use sim_runtime::MapSummary;
use sim_schema::{CircleSet, Coord, MapConfig, MapId, Player, PlayerId, Population, SpeedTable};

const DISTRIBUTE_SALT: u64 = 0xD157_0B17_5EED_0001;
const MIGRATION_SALT: u64 = 0x319A_7E00_E90C_0002;
const PLAYER_SALT: u64 = 0x91A7_E500_5A4A_0003;
const EPOCH_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// Salt for the stream that packs a map's circles.
pub const PACKING_SALT: u64 = 0x9ACC_1A6E_C1C1_0000;

#[derive(Debug, Clone, PartialEq)]
pub struct MapRecord {
    pub id: MapId,
    pub name: String,
    pub config: MapConfig,
    pub circles: CircleSet,
    pub speeds: SpeedTable,
    pub epoch: u64,
    /// `None` until the map has been seeded.
    pub population: Option<Population>,
    pub seed: u64,
    pub created_at_ms: u64,
}

impl MapRecord {
    pub fn summary(&self) -> MapSummary {
        MapSummary {
            id: self.id,
            name: self.name.clone(),
            config: self.config,
            circles: self.circles.clone(),
            speeds: self.speeds.clone(),
            epoch: self.epoch,
            seeded: self.population.is_some(),
            seed: self.seed,
            created_at_ms: self.created_at_ms,
        }
    }

    /// Stream for seeding; a reseed at a later epoch draws differently.
    pub fn distribution_rng(&self) -> SmallRng {
        self.stream(DISTRIBUTE_SALT, self.epoch)
    }

    /// Stream for the migration that produces epoch `self.epoch + 1`.
    pub fn migration_rng(&self) -> SmallRng {
        self.stream(MIGRATION_SALT, self.epoch + 1)
    }

    pub fn player_rng(&self, player: PlayerId) -> SmallRng {
        self.stream(PLAYER_SALT, player.0)
    }

    fn stream(&self, salt: u64, mix: u64) -> SmallRng {
        SmallRng::seed_from_u64(self.seed ^ salt ^ mix.wrapping_mul(EPOCH_MIX))
    }
}

#[derive(Debug, Default)]
pub struct MapRegistry {
    maps: BTreeMap<MapId, MapRecord>,
    players: BTreeMap<PlayerId, Player>,
    next_map: u64,
    next_player: u64,
}

impl MapRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_map(
        &mut self,
        name: String,
        config: MapConfig,
        circles: CircleSet,
        seed: u64,
        created_at_ms: u64,
    ) -> &MapRecord {
        self.next_map += 1;
        let id = MapId(self.next_map);
        tracing::info!(
            target: "circle_map::registry",
            map = %id,
            name = %name,
            circles = circles.len(),
            seed,
            "map.created"
        );
        self.maps.entry(id).or_insert(MapRecord {
            id,
            name,
            config,
            circles,
            speeds: SpeedTable::default(),
            epoch: 0,
            population: None,
            seed,
            created_at_ms,
        })
    }

    pub fn map(&self, id: MapId) -> Option<&MapRecord> {
        self.maps.get(&id)
    }

    pub fn map_mut(&mut self, id: MapId) -> Option<&mut MapRecord> {
        self.maps.get_mut(&id)
    }

    pub fn maps(&self) -> impl Iterator<Item = &MapRecord> {
        self.maps.values()
    }

    pub fn map_count(&self) -> usize {
        self.maps.len()
    }

    pub fn next_player_id(&self) -> PlayerId {
        PlayerId(self.next_player + 1)
    }

    pub fn insert_player(&mut self, map_id: MapId, name: Option<String>, at: Coord) -> &Player {
        self.next_player += 1;
        let id = PlayerId(self.next_player);
        let name = name.unwrap_or_else(|| format!("player_{id}"));
        tracing::info!(
            target: "circle_map::registry",
            player = %id,
            map = %map_id,
            name = %name,
            x = at.x,
            y = at.y,
            "player.spawned"
        );
        self.players.entry(id).or_insert(Player {
            id,
            map_id,
            name,
            x: at.x,
            y: at.y,
        })
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(&id)
    }

    /// Players on `map_id` in id order.
    pub fn players_on(&self, map_id: MapId) -> impl Iterator<Item = &Player> {
        self.players.values().filter(move |p| p.map_id == map_id)
    }
}
