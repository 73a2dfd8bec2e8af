use core_sim::geometry::{circle_in_bounds, circles_overlap};
use core_sim::{classify, CirclePacker, PackingConfig, PackingError};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sim_schema::{Bounds, CircleKind, MapConfig, ZoneType};

fn config(width: u32, height: u32, spawns: u32, bedrooms: u32, max_gap: u32) -> MapConfig {
    MapConfig {
        width,
        height,
        spawn_count: spawns,
        bedroom_count: bedrooms,
        spawn_radius: 3,
        bedroom_radius: 2,
        max_gap,
    }
}

#[test]
fn packed_circles_are_contained_and_disjoint_across_seeds() {
    let packer = CirclePacker::default();
    let map = config(60, 40, 3, 8, 4);
    for seed in 0..40 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let circles = packer.pack(&map, &mut rng).unwrap();
        assert_eq!(circles.len(), 11);
        for (i, a) in circles.iter().enumerate() {
            assert!(circle_in_bounds(a, map.bounds()), "seed {seed}: {a:?}");
            for b in &circles[i + 1..] {
                assert!(!circles_overlap(a, b), "seed {seed}: {a:?} / {b:?}");
            }
        }
    }
}

#[test]
fn later_circles_cluster_near_earlier_ones() {
    let packer = CirclePacker::default();
    let map = config(100, 100, 1, 6, 1);
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let circles = packer.pack(&map, &mut rng).unwrap();
    for (i, circle) in circles.iter().enumerate().skip(1) {
        let nearest = circles[..i]
            .iter()
            .map(|c| c.center().distance_squared(circle.center()))
            .min()
            .unwrap();
        // Anchored proposals land within r_a + r_b + max_gap, plus rounding.
        let reach = (3 + 3 + 1 + 1) as i64;
        assert!(nearest <= reach * reach, "{circle:?} is {nearest} away");
    }
}

#[test]
fn failure_returns_no_partial_set() {
    let packer = CirclePacker::new(PackingConfig {
        attempt_budget: 100,
        nearby_attempts: 10,
    });
    // Room for a handful of bedrooms, not fifty.
    let map = config(15, 15, 1, 50, 0);
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    match packer.pack(&map, &mut rng) {
        Err(PackingError::Exhausted { kind, ordinal, attempts }) => {
            assert_eq!(kind, CircleKind::Bedroom);
            assert!(ordinal > 1 && ordinal <= 50);
            assert_eq!(attempts, 100);
        }
        other => panic!("expected exhaustion, got {other:?}"),
    }
}

#[test]
fn classification_is_total_with_center_precedence() {
    let packer = CirclePacker::default();
    let map = config(30, 30, 2, 3, 2);
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let circles = packer.pack(&map, &mut rng).unwrap();
    let bounds = Bounds::new(30, 30);
    let mut centers = 0;
    for coord in bounds.coords() {
        match classify(coord, &circles) {
            ZoneType::Center => {
                centers += 1;
                assert!(circles.iter().any(|c| c.center() == coord));
            }
            ZoneType::Interior => assert!(circles.iter().any(|c| {
                coord.distance_squared(c.center()) <= (c.radius as i64).pow(2)
            })),
            ZoneType::Exterior => assert!(circles.iter().all(|c| {
                coord.distance_squared(c.center()) > (c.radius as i64).pow(2)
            })),
        }
    }
    assert_eq!(centers, circles.len());
}
