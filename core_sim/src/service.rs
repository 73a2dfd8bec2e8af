//! Dispatch of parsed commands onto the packer, distributor, migration engine
//! and registry.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::SmallRng;
use rand::SeedableRng;
use sim_runtime::{
    parse_request_line, validate_epoch_steps, validate_map_config, validate_probabilities,
    validate_speeds,
    CommandParseError, CommandPayload, EpochReport, ErrorKind, MapSummary, PlayerView, Response,
    ResponseBody, ValidationError,
};
use sim_schema::{
    Direction, MapConfig, MapId, MigrationStats, Player, PlayerId, Population, SpeedTable,
};
use thiserror::Error;

use crate::ascii::{population_rows, zone_rows};
use crate::config::SimulationConfig;
use crate::distribution::distribute;
use crate::metrics::collect_metrics;
use crate::migration::advance_with_stats;
use crate::packer::{CirclePacker, PackingError};
use crate::players::{self, MoveError};
use crate::registry::{MapRecord, MapRegistry, PACKING_SALT};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Parse(#[from] CommandParseError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Packing(#[from] PackingError),
    #[error("map {0} not found")]
    UnknownMap(MapId),
    #[error("player {0} not found")]
    UnknownPlayer(PlayerId),
    #[error("map {0} has no population yet; distribute first")]
    NotSeeded(MapId),
    #[error("map {0} has no spawn circles")]
    NoSpawnCircles(MapId),
    #[error(transparent)]
    Move(#[from] MoveError),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Parse(_)
            | ServiceError::Validation(_)
            | ServiceError::NoSpawnCircles(_)
            | ServiceError::Move(_) => ErrorKind::InvalidInput,
            ServiceError::Packing(PackingError::Exhausted { .. }) => ErrorKind::PackingExhausted,
            ServiceError::Packing(_) => ErrorKind::InvalidInput,
            ServiceError::UnknownMap(_)
            | ServiceError::UnknownPlayer(_)
            | ServiceError::NotSeeded(_) => ErrorKind::UnknownReference,
        }
    }
}

/// Owns the registry and applies one command at a time.
#[derive(Debug)]
pub struct CommandService {
    config: Arc<SimulationConfig>,
    packer: CirclePacker,
    registry: MapRegistry,
}

impl CommandService {
    pub fn new(config: Arc<SimulationConfig>) -> Self {
        let packer = CirclePacker::new(config.packing);
        Self {
            config,
            packer,
            registry: MapRegistry::new(),
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn registry(&self) -> &MapRegistry {
        &self.registry
    }

    /// Parse, execute and wrap one request line.
    pub fn handle_line(&mut self, line: &str) -> Response {
        let result = parse_request_line(line)
            .map_err(ServiceError::from)
            .and_then(|payload| self.execute(payload));
        match result {
            Ok(body) => Response::Ok(body),
            Err(err) => {
                let kind = err.kind();
                tracing::warn!(
                    target: "circle_map::server",
                    kind = kind.as_str(),
                    error = %err,
                    "command.rejected"
                );
                Response::error(kind, err.to_string())
            }
        }
    }

    pub fn execute(&mut self, payload: CommandPayload) -> Result<ResponseBody, ServiceError> {
        tracing::debug!(
            target: "circle_map::server",
            command = payload.verb(),
            "command.received"
        );
        match payload {
            CommandPayload::CreateMap {
                width,
                height,
                spawns,
                bedrooms,
                spawn_radius,
                bedroom_radius,
                max_gap,
                name,
                seed,
            } => {
                let config = MapConfig {
                    width,
                    height,
                    spawn_count: spawns,
                    bedroom_count: bedrooms,
                    spawn_radius,
                    bedroom_radius,
                    max_gap,
                };
                Ok(ResponseBody::MapCreated(self.create_map(config, name, seed)?))
            }
            CommandPayload::ListMaps => Ok(ResponseBody::Maps {
                maps: self.list_maps(),
            }),
            CommandPayload::Distribute {
                map_id,
                probabilities,
            } => {
                let population = self.distribute(map_id, &probabilities)?;
                Ok(ResponseBody::Distributed {
                    map_id,
                    epoch: 0,
                    total_tokens: population.total_tokens(),
                    fingerprint: population.fingerprint(),
                    population,
                })
            }
            CommandPayload::SetSpeeds { map_id, speeds } => {
                let speeds = self.set_speeds(map_id, speeds)?;
                Ok(ResponseBody::SpeedsSet { map_id, speeds })
            }
            CommandPayload::Epoch { map_id, steps } => {
                Ok(ResponseBody::Epoch(self.advance_epoch(map_id, steps)?))
            }
            CommandPayload::Show { map_id } => {
                let record = self.map(map_id)?;
                let bounds = record.config.bounds();
                let rows = match record.population.as_ref() {
                    Some(population) => population_rows(bounds, &record.circles, population),
                    None => zone_rows(bounds, &record.circles),
                };
                Ok(ResponseBody::Map {
                    summary: record.summary(),
                    population: record.population.clone(),
                    rows,
                    players: self.registry.players_on(map_id).cloned().collect(),
                })
            }
            CommandPayload::SpawnPlayer { map_id, name } => Ok(ResponseBody::Player {
                player: self.spawn_player(map_id, name)?,
            }),
            CommandPayload::MovePlayer {
                player_id,
                direction,
            } => Ok(ResponseBody::Player {
                player: self.move_player(player_id, direction)?,
            }),
            CommandPayload::ViewPlayer { player_id } => {
                Ok(ResponseBody::View(self.view_player(player_id)?))
            }
        }
    }

    /// Validate, pack and register a new map.
    pub fn create_map(
        &mut self,
        config: MapConfig,
        name: Option<String>,
        seed: Option<u64>,
    ) -> Result<MapSummary, ServiceError> {
        validate_map_config(&config, &self.config.limits())?;
        let seed = seed.or(self.config.seed).unwrap_or_else(rand::random);
        let mut rng = SmallRng::seed_from_u64(seed ^ PACKING_SALT);
        let circles = self.packer.pack(&config, &mut rng)?;
        let created_at_ms = now_ms();
        let name = name.unwrap_or_else(|| format!("map_{}", created_at_ms / 1000));
        let record = self
            .registry
            .insert_map(name, config, circles, seed, created_at_ms);
        Ok(record.summary())
    }

    pub fn list_maps(&self) -> Vec<MapSummary> {
        self.registry.maps().map(MapRecord::summary).collect()
    }

    /// Seed (or reseed) a map; the map returns to epoch 0.
    pub fn distribute(
        &mut self,
        map_id: MapId,
        probabilities: &[f64],
    ) -> Result<Population, ServiceError> {
        validate_probabilities(probabilities)?;
        let record = self.map_mut(map_id)?;
        let mut rng = record.distribution_rng();
        let population = distribute(
            record.config.bounds(),
            &record.circles,
            probabilities,
            &mut rng,
        );
        record.population = Some(population.clone());
        record.epoch = 0;
        tracing::info!(
            target: "circle_map::registry",
            map = %map_id,
            types = probabilities.len(),
            tokens = population.total_tokens(),
            "map.seeded"
        );
        Ok(population)
    }

    pub fn set_speeds(&mut self, map_id: MapId, speeds: Vec<f64>) -> Result<SpeedTable, ServiceError> {
        validate_speeds(&speeds)?;
        let record = self.map_mut(map_id)?;
        record.speeds = SpeedTable::new(speeds);
        tracing::info!(
            target: "circle_map::registry",
            map = %map_id,
            types = record.speeds.len(),
            "map.speeds_set"
        );
        Ok(record.speeds.clone())
    }

    /// Run `steps` migrations, bumping the epoch once per step.
    pub fn advance_epoch(&mut self, map_id: MapId, steps: u32) -> Result<EpochReport, ServiceError> {
        validate_epoch_steps(steps, &self.config.limits())?;
        let record = self.map_mut(map_id)?;
        let Some(mut population) = record.population.take() else {
            return Err(ServiceError::NotSeeded(map_id));
        };

        let bounds = record.config.bounds();
        let mut stats = MigrationStats::default();
        for _ in 0..steps {
            let mut rng = record.migration_rng();
            let (next, step_stats) =
                advance_with_stats(bounds, &record.circles, &population, &record.speeds, &mut rng);
            population = next;
            stats.accumulate(&step_stats);
            record.epoch += 1;
        }
        record.population = Some(population.clone());

        let metrics = collect_metrics(record);
        tracing::info!(
            target: "circle_map::server",
            map = %map_id,
            epoch = record.epoch,
            steps,
            moved = stats.moved,
            blocked = stats.blocked,
            tokens = metrics.total_tokens,
            saturated = metrics.saturated_cells,
            utilisation = metrics.utilisation,
            "epoch.completed"
        );

        Ok(EpochReport {
            map_id,
            epoch: record.epoch,
            steps,
            total_tokens: population.total_tokens(),
            fingerprint: population.fingerprint(),
            stats,
            population,
        })
    }

    pub fn spawn_player(&mut self, map_id: MapId, name: Option<String>) -> Result<Player, ServiceError> {
        let player_id = self.registry.next_player_id();
        let record = self.map(map_id)?;
        let mut rng = record.player_rng(player_id);
        let at = players::spawn_position(&record.circles, record.config.bounds(), &mut rng)
            .ok_or(ServiceError::NoSpawnCircles(map_id))?;
        Ok(self.registry.insert_player(map_id, name, at).clone())
    }

    pub fn move_player(
        &mut self,
        player_id: PlayerId,
        direction: Direction,
    ) -> Result<Player, ServiceError> {
        let player = self
            .registry
            .player(player_id)
            .ok_or(ServiceError::UnknownPlayer(player_id))?;
        let bounds = self.map(player.map_id)?.config.bounds();
        let to = players::step(player.position(), direction, bounds)?;

        let player = self
            .registry
            .player_mut(player_id)
            .ok_or(ServiceError::UnknownPlayer(player_id))?;
        player.x = to.x;
        player.y = to.y;
        tracing::debug!(
            target: "circle_map::registry",
            player = %player_id,
            %direction,
            x = to.x,
            y = to.y,
            "player.moved"
        );
        Ok(player.clone())
    }

    pub fn view_player(&self, player_id: PlayerId) -> Result<PlayerView, ServiceError> {
        let player = self
            .registry
            .player(player_id)
            .ok_or(ServiceError::UnknownPlayer(player_id))?;
        let record = self.map(player.map_id)?;
        Ok(players::view(
            player,
            record.config.bounds(),
            &record.circles,
            record.population.as_ref(),
            self.config.view_radius,
        ))
    }

    fn map(&self, map_id: MapId) -> Result<&MapRecord, ServiceError> {
        self.registry
            .map(map_id)
            .ok_or(ServiceError::UnknownMap(map_id))
    }

    fn map_mut(&mut self, map_id: MapId) -> Result<&mut MapRecord, ServiceError> {
        self.registry
            .map_mut(map_id)
            .ok_or(ServiceError::UnknownMap(map_id))
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
