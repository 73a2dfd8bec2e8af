//! One epoch of capacity-constrained token migration.
//!
//! The old population is read, a fresh accumulator is written, and the
//! accumulator becomes the new population. Nothing is mutated in place.

use rand::seq::SliceRandom;
use rand::Rng;
use sim_schema::{Bounds, Circle, MigrationStats, Population, SpeedTable, TokenKind};

use crate::geometry::neighbours;
use crate::zones::ZoneGrid;

/// Advance `population` by one epoch. See [`advance_with_stats`].
pub fn advance<R: Rng + ?Sized>(
    bounds: Bounds,
    circles: &[Circle],
    population: &Population,
    speeds: &SpeedTable,
    rng: &mut R,
) -> Population {
    advance_with_stats(bounds, circles, population, speeds, rng).0
}

/// Advance `population` by one epoch and report what happened.
///
/// Tokens are visited in row-major cell order, list order within a cell.
/// A token moves when a uniform draw in `[0, 100)` falls below its speed;
/// it then tries its in-bounds neighbours in shuffled order and lands on
/// the first one with headroom. Headroom counts tokens already written to
/// the cell plus residents not yet visited, so no cell ends above its zone
/// capacity. Tokens that do not move stay at their origin. Tokens are
/// never dropped.
///
/// An empty speed table returns the population unchanged.
pub fn advance_with_stats<R: Rng + ?Sized>(
    bounds: Bounds,
    circles: &[Circle],
    population: &Population,
    speeds: &SpeedTable,
    rng: &mut R,
) -> (Population, MigrationStats) {
    let mut stats = MigrationStats::default();
    if speeds.is_empty() {
        stats.stayed = population.total_tokens() as u64;
        return (population.clone(), stats);
    }

    let grid = ZoneGrid::build(bounds, circles);
    let cells = bounds.cell_count();
    let mut next: Vec<Vec<TokenKind>> = vec![Vec::new(); cells];
    let mut pending = vec![0usize; cells];
    for (coord, tokens) in population.iter() {
        if let Some(index) = bounds.index_of(coord) {
            pending[index] = tokens.len();
        }
    }

    let mut stray = Population::new();
    for (coord, tokens) in population.iter() {
        let Some(origin) = bounds.index_of(coord) else {
            tracing::warn!(
                target: "circle_map::migration",
                %coord,
                tokens = tokens.len(),
                "migration.origin_out_of_bounds"
            );
            stray.insert(coord, tokens.to_vec());
            stats.stayed += tokens.len() as u64;
            continue;
        };

        for &token in tokens {
            pending[origin] -= 1;
            let roll: f64 = rng.gen_range(0.0..100.0);
            if roll < speeds.speed_for(token) {
                stats.attempted += 1;
                let mut options = neighbours(coord, bounds);
                options.shuffle(rng);
                let target = options.into_iter().find_map(|n| {
                    let index = bounds.index_of(n)?;
                    let occupied = next[index].len() + pending[index];
                    (occupied < grid.zone_at_index(index).capacity()).then_some(index)
                });
                if let Some(index) = target {
                    next[index].push(token);
                    stats.moved += 1;
                    continue;
                }
                stats.blocked += 1;
            }
            next[origin].push(token);
            stats.stayed += 1;
        }
    }

    let mut advanced = stray;
    for (index, tokens) in next.into_iter().enumerate() {
        advanced.insert(bounds.coord_at(index), tokens);
    }
    (advanced, stats)
}
