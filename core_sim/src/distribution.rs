//! Epoch-0 seeding of a packed map.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use sim_schema::{Bounds, Circle, Population, TokenKind, ZoneType};

use crate::zones::ZoneGrid;

/// Seed every cell with token types drawn from `probabilities`.
///
/// Weights are relative and need not sum to one. Center cells stay empty,
/// interior cells get exactly one token and exterior cells one or two. An
/// empty or all-zero weight vector yields an empty population.
pub fn distribute<R: Rng + ?Sized>(
    bounds: Bounds,
    circles: &[Circle],
    probabilities: &[f64],
    rng: &mut R,
) -> Population {
    let mut population = Population::new();
    let selector = match WeightedIndex::new(probabilities) {
        Ok(selector) => selector,
        Err(err) => {
            tracing::debug!(
                target: "circle_map::distribution",
                error = %err,
                "distribution.skipped"
            );
            return population;
        }
    };

    let grid = ZoneGrid::build(bounds, circles);
    for (coord, zone) in grid.iter() {
        let count = match zone {
            ZoneType::Center => continue,
            ZoneType::Interior => 1,
            ZoneType::Exterior => rng.gen_range(1..=2),
        };
        for _ in 0..count {
            population.push(coord, selector.sample(rng) as TokenKind);
        }
    }
    population
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use sim_schema::{CircleKind, Coord};

    fn scenario() -> (Bounds, Vec<Circle>) {
        (
            Bounds::new(10, 10),
            vec![Circle::new(5, 5, 2, CircleKind::Spawn)],
        )
    }

    #[test]
    fn single_type_fills_every_zone_to_its_rule() {
        let (bounds, circles) = scenario();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let population = distribute(bounds, &circles, &[1.0], &mut rng);

        assert!(population.get(Coord::new(5, 5)).is_empty());
        for coord in bounds.coords() {
            let tokens = population.get(coord);
            assert!(tokens.iter().all(|t| *t == 0));
            let d2 = coord.distance_squared(Coord::new(5, 5));
            if d2 == 0 {
                assert!(tokens.is_empty());
            } else if d2 <= 4 {
                assert_eq!(tokens.len(), 1, "interior {coord}");
            } else {
                assert!((1..=2).contains(&tokens.len()), "exterior {coord}");
            }
        }
        assert_eq!(population.occupied_cells(), 99);
    }

    #[test]
    fn zero_weights_are_never_drawn() {
        let (bounds, circles) = scenario();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let population = distribute(bounds, &circles, &[0.0, 3.0, 0.0], &mut rng);
        assert!(population.iter().flat_map(|(_, t)| t).all(|t| *t == 1));
    }

    #[test]
    fn weights_bias_the_mix() {
        let bounds = Bounds::new(60, 60);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let population = distribute(bounds, &[], &[90.0, 10.0], &mut rng);
        let histogram = population.histogram();
        let common = histogram.get(&0).copied().unwrap_or(0);
        let rare = histogram.get(&1).copied().unwrap_or(0);
        assert!(common > rare * 4, "common={common} rare={rare}");
    }

    #[test]
    fn empty_or_zero_weights_seed_nothing() {
        let (bounds, circles) = scenario();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(distribute(bounds, &circles, &[], &mut rng).is_empty());
        assert!(distribute(bounds, &circles, &[0.0, 0.0], &mut rng).is_empty());
    }
}
