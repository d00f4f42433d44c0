//! Evaluator Benchmarks
//!
//! Payline evaluation, full-cycle exhaustive scoring and the parallel simulator.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rf_slot_lab::{GameConfig, PayTable, SimulationConfig, Simulator, build_strips, classic_strips};

fn bench_evaluate(c: &mut Criterion) {
    let strips = build_strips(&classic_strips()).expect("classic strips");
    let paytable = PayTable::classic();
    let mut group = c.benchmark_group("evaluate");

    for (name, stops) in [("no_win", [3, 9, 7]), ("cherry_line", [12, 6, 0]), ("triple_line", [0, 0, 0])] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &stops, |b, stops| {
            b.iter(|| black_box(paytable.evaluate(&strips, black_box(stops), 5)))
        });
    }

    group.finish();
}

fn bench_exhaustive(c: &mut Criterion) {
    let simulator = Simulator::new(&GameConfig::default()).expect("classic config");
    let mut group = c.benchmark_group("exhaustive");
    group.throughput(Throughput::Elements(15 * 14 * 14));
    group.bench_function("classic", |b| b.iter(|| black_box(simulator.exhaustive(1))));
    group.finish();
}

fn bench_simulator(c: &mut Criterion) {
    let simulator = Simulator::new(&GameConfig::default()).expect("classic config");
    let mut group = c.benchmark_group("simulator");
    group.sample_size(10);

    for &spins in &[10_000u64, 100_000] {
        let config = SimulationConfig {
            spins,
            bet: 1,
            seed: 42,
            chunk_size: 8_192,
        };
        group.throughput(Throughput::Elements(spins));
        group.bench_with_input(BenchmarkId::from_parameter(spins), &config, |b, config| {
            b.iter(|| black_box(simulator.run(config)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_evaluate, bench_exhaustive, bench_simulator);
criterion_main!(benches);
