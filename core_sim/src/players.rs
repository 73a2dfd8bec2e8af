//! Minimal player bookkeeping: spawn inside a spawn circle, step, look around.

use rand::seq::SliceRandom;
use rand::Rng;
use sim_runtime::{CellView, PlayerView, ViewZone};
use sim_schema::{Bounds, Circle, CircleKind, Coord, Direction, Player, Population};
use thiserror::Error;

use crate::zones::classify;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("moving {direction} from {from} leaves the map")]
    OutOfBounds { from: Coord, direction: Direction },
}

/// Random non-center cell inside a random spawn circle. `None` when the map
/// has no spawn circles.
pub fn spawn_position<R: Rng + ?Sized>(
    circles: &[Circle],
    bounds: Bounds,
    rng: &mut R,
) -> Option<Coord> {
    let spawns: Vec<&Circle> = circles
        .iter()
        .filter(|c| c.kind == CircleKind::Spawn)
        .collect();
    let spawn = spawns.choose(rng)?;
    let center = spawn.center();
    let r = spawn.radius as i32;
    let cells: Vec<Coord> = (-r..=r)
        .flat_map(|dy| (-r..=r).map(move |dx| center.offset(dx, dy)))
        .filter(|c| *c != center && bounds.contains(*c))
        .filter(|c| c.distance_squared(center) <= (r as i64) * (r as i64))
        .collect();
    cells.choose(rng).copied()
}

pub fn step(from: Coord, direction: Direction, bounds: Bounds) -> Result<Coord, MoveError> {
    let (dx, dy) = direction.delta();
    let to = from.offset(dx, dy);
    if bounds.contains(to) {
        Ok(to)
    } else {
        Err(MoveError::OutOfBounds { from, direction })
    }
}

/// Square neighbourhood of side `2 * radius + 1` around the player.
pub fn view(
    player: &Player,
    bounds: Bounds,
    circles: &[Circle],
    population: Option<&Population>,
    radius: u32,
) -> PlayerView {
    let r = radius as i32;
    let origin = player.position();
    let cells: Vec<Vec<CellView>> = (-r..=r)
        .map(|dy| {
            (-r..=r)
                .map(|dx| {
                    let at = origin.offset(dx, dy);
                    let inside = bounds.contains(at);
                    let zone = inside.then(|| classify(at, circles));
                    let tokens = match population {
                        Some(population) if inside => population.get(at).to_vec(),
                        _ => Vec::new(),
                    };
                    CellView {
                        map_x: at.x,
                        map_y: at.y,
                        view_x: (dx + r) as u32,
                        view_y: (dy + r) as u32,
                        is_player: dx == 0 && dy == 0,
                        zone: ViewZone::from(zone),
                        tokens,
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect();
    PlayerView {
        player: player.clone(),
        radius,
        cells,
    }
}
