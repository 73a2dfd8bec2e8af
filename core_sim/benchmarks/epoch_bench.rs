use core_sim::{advance, distribute, CirclePacker};
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use sim_schema::{MapConfig, SpeedTable};

fn map(size: u32) -> MapConfig {
    MapConfig {
        width: size,
        height: size,
        spawn_count: 2,
        bedroom_count: size / 4,
        spawn_radius: 3,
        bedroom_radius: 2,
        max_gap: 3,
    }
}

fn bench_epoch(c: &mut Criterion) {
    let mut group = c.benchmark_group("epoch");
    let speeds = SpeedTable::new(vec![60.0, 30.0, 90.0]);

    for size in [16u32, 32, 64, 100] {
        let config = map(size);
        let mut rng = SmallRng::seed_from_u64(size as u64);
        let circles = match CirclePacker::default().pack(&config, &mut rng) {
            Ok(circles) => circles,
            Err(_) => continue,
        };
        let population = distribute(config.bounds(), &circles, &[0.6, 0.3, 0.1], &mut rng);

        group.bench_with_input(BenchmarkId::new("grid", size), &size, |b, _| {
            b.iter_batched(
                || SmallRng::seed_from_u64(7),
                |mut rng| advance(config.bounds(), &circles, &population, &speeds, &mut rng),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(epoch_benches, bench_epoch);
criterion_main!(epoch_benches);
