use core_sim::CirclePacker;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use sim_schema::MapConfig;

fn bench_packing(c: &mut Criterion) {
    let mut group = c.benchmark_group("packing");
    let packer = CirclePacker::default();

    for bedrooms in [4u32, 16, 32] {
        let config = MapConfig {
            width: 100,
            height: 100,
            spawn_count: 3,
            bedroom_count: bedrooms,
            spawn_radius: 4,
            bedroom_radius: 3,
            max_gap: 4,
        };
        group.bench_with_input(
            BenchmarkId::new("bedrooms", bedrooms),
            &config,
            |b, config| {
                let mut rng = SmallRng::seed_from_u64(42);
                b.iter(|| packer.pack(config, &mut rng))
            },
        );
    }

    group.finish();
}

criterion_group!(packing_benches, bench_packing);
criterion_main!(packing_benches);
