use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

use crate::{CommandDecodeError, CommandPayload, Direction, MapId, PlayerId};

#[derive(Debug, Error)]
pub enum CommandParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),
    #[error("invalid integer '{value}' for {context}: {source}")]
    InvalidInteger {
        value: String,
        context: &'static str,
        source: ParseIntError,
    },
    #[error("invalid float '{value}' for {context}: {source}")]
    InvalidFloat {
        value: String,
        context: &'static str,
        source: ParseFloatError,
    },
    #[error("invalid direction '{0}', expected up, down, left or right")]
    InvalidDirection(String),
    #[error("expected key=value option, got '{0}'")]
    MalformedOption(String),
    #[error("unknown option '{0}'")]
    UnknownOption(String),
    #[error("unexpected argument '{0}'")]
    UnexpectedArgument(String),
    #[error(transparent)]
    Json(#[from] CommandDecodeError),
}

/// Parse one request line: JSON objects go through serde, everything else
/// through the whitespace verb grammar.
pub fn parse_request_line(input: &str) -> Result<CommandPayload, CommandParseError> {
    let trimmed = input.trim();
    if trimmed.starts_with('{') {
        return Ok(CommandPayload::from_json(trimmed)?);
    }
    parse_command_line(trimmed)
}

pub fn parse_command_line(input: &str) -> Result<CommandPayload, CommandParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CommandParseError::Empty);
    }

    let mut parts = trimmed.split_whitespace();
    let verb = parts
        .next()
        .map(|v| v.to_ascii_lowercase())
        .ok_or(CommandParseError::Empty)?;

    match verb.as_str() {
        "create_map" | "create" => parse_create_map(parts),
        "maps" | "list_maps" => {
            expect_end(&mut parts)?;
            Ok(CommandPayload::ListMaps)
        }
        "distribute" => {
            let map_id = parse_map_id(parts.next(), "distribute map")?;
            let probabilities = parse_float_list(parts, "probability")?;
            if probabilities.is_empty() {
                return Err(CommandParseError::MissingArgument("probabilities"));
            }
            Ok(CommandPayload::Distribute {
                map_id,
                probabilities,
            })
        }
        "speeds" | "set_speeds" => {
            let map_id = parse_map_id(parts.next(), "speeds map")?;
            let speeds = parse_float_list(parts, "speed")?;
            if speeds.is_empty() {
                return Err(CommandParseError::MissingArgument("speeds"));
            }
            Ok(CommandPayload::SetSpeeds { map_id, speeds })
        }
        "epoch" | "new_epoch" => {
            let map_id = parse_map_id(parts.next(), "epoch map")?;
            let steps_str = parts.next().unwrap_or("1");
            let steps = parse_u32(steps_str, "epoch steps")?;
            expect_end(&mut parts)?;
            Ok(CommandPayload::Epoch { map_id, steps })
        }
        "show" => {
            let map_id = parse_map_id(parts.next(), "show map")?;
            expect_end(&mut parts)?;
            Ok(CommandPayload::Show { map_id })
        }
        "spawn_player" | "spawn" => {
            let map_id = parse_map_id(parts.next(), "spawn map")?;
            let rest: Vec<&str> = parts.collect();
            let name = if rest.is_empty() {
                None
            } else {
                Some(rest.join(" "))
            };
            Ok(CommandPayload::SpawnPlayer { map_id, name })
        }
        "move_player" | "move" => {
            let player_str = parts
                .next()
                .ok_or(CommandParseError::MissingArgument("player"))?;
            let player_id = PlayerId(parse_u64(player_str, "move player")?);
            let direction_str = parts
                .next()
                .ok_or(CommandParseError::MissingArgument("direction"))?;
            let direction = parse_direction(direction_str)?;
            expect_end(&mut parts)?;
            Ok(CommandPayload::MovePlayer {
                player_id,
                direction,
            })
        }
        "view_player" | "view" => {
            let player_str = parts
                .next()
                .ok_or(CommandParseError::MissingArgument("player"))?;
            let player_id = PlayerId(parse_u64(player_str, "view player")?);
            expect_end(&mut parts)?;
            Ok(CommandPayload::ViewPlayer { player_id })
        }
        other => Err(CommandParseError::UnknownCommand(other.to_string())),
    }
}

fn parse_create_map<'a>(
    parts: impl Iterator<Item = &'a str>,
) -> Result<CommandPayload, CommandParseError> {
    let mut width = None;
    let mut height = None;
    let mut spawns = None;
    let mut bedrooms = None;
    let mut spawn_radius = None;
    let mut bedroom_radius = None;
    let mut max_gap = None;
    let mut name = None;
    let mut seed = None;

    for token in parts {
        let (key, value) = token
            .split_once('=')
            .ok_or_else(|| CommandParseError::MalformedOption(token.to_string()))?;
        match key.to_ascii_lowercase().as_str() {
            "width" | "w" => width = Some(parse_u32(value, "map width")?),
            "height" | "h" => height = Some(parse_u32(value, "map height")?),
            "spawns" => spawns = Some(parse_u32(value, "spawn count")?),
            "bedrooms" => bedrooms = Some(parse_u32(value, "bedroom count")?),
            "spawn_radius" => spawn_radius = Some(parse_u32(value, "spawn radius")?),
            "bedroom_radius" => bedroom_radius = Some(parse_u32(value, "bedroom radius")?),
            "max_gap" | "gap" => max_gap = Some(parse_u32(value, "max gap")?),
            "name" => name = Some(value.to_string()),
            "seed" => seed = Some(parse_u64(value, "map seed")?),
            _ => return Err(CommandParseError::UnknownOption(key.to_string())),
        }
    }

    Ok(CommandPayload::CreateMap {
        width: width.ok_or(CommandParseError::MissingArgument("width"))?,
        height: height.ok_or(CommandParseError::MissingArgument("height"))?,
        spawns: spawns.unwrap_or(0),
        bedrooms: bedrooms.unwrap_or(0),
        spawn_radius: spawn_radius.unwrap_or(1),
        bedroom_radius: bedroom_radius.unwrap_or(1),
        max_gap: max_gap.unwrap_or(0),
        name,
        seed,
    })
}

fn expect_end<'a>(parts: &mut impl Iterator<Item = &'a str>) -> Result<(), CommandParseError> {
    match parts.next() {
        Some(extra) => Err(CommandParseError::UnexpectedArgument(extra.to_string())),
        None => Ok(()),
    }
}

fn parse_map_id(value: Option<&str>, context: &'static str) -> Result<MapId, CommandParseError> {
    let value = value.ok_or(CommandParseError::MissingArgument("map"))?;
    Ok(MapId(parse_u64(value, context)?))
}

fn parse_float_list<'a>(
    parts: impl Iterator<Item = &'a str>,
    context: &'static str,
) -> Result<Vec<f64>, CommandParseError> {
    parts.map(|value| parse_f64(value, context)).collect()
}

fn parse_direction(token: &str) -> Result<Direction, CommandParseError> {
    match token.to_ascii_lowercase().as_str() {
        "up" | "u" | "north" => Ok(Direction::Up),
        "down" | "d" | "south" => Ok(Direction::Down),
        "left" | "l" | "west" => Ok(Direction::Left),
        "right" | "r" | "east" => Ok(Direction::Right),
        other => Err(CommandParseError::InvalidDirection(other.to_string())),
    }
}

fn parse_u32(value: &str, context: &'static str) -> Result<u32, CommandParseError> {
    value
        .parse::<u32>()
        .map_err(|source| CommandParseError::InvalidInteger {
            value: value.to_string(),
            context,
            source,
        })
}

fn parse_u64(value: &str, context: &'static str) -> Result<u64, CommandParseError> {
    value
        .parse::<u64>()
        .map_err(|source| CommandParseError::InvalidInteger {
            value: value.to_string(),
            context,
            source,
        })
}

fn parse_f64(value: &str, context: &'static str) -> Result<f64, CommandParseError> {
    value
        .parse::<f64>()
        .map_err(|source| CommandParseError::InvalidFloat {
            value: value.to_string(),
            context,
            source,
        })
}
