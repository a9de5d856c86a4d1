// ─────────────────────────────────────────────────────────────────────
// QDT Crystal Kernel — Simulation Benchmarks
// ─────────────────────────────────────────────────────────────────────
//! Criterion benchmarks for the simulation hot path: the step loop at
//! the default and maximum step counts, the path analyzer, and the
//! prime table.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use crystal_core::{analyze, CrystalCalculator};
use crystal_physics::{prime_table, Category};
use crystal_types::{CrystalConfig, OscillatorParams};

fn make_calculator(steps: usize, depth: usize) -> CrystalCalculator {
    let config = CrystalConfig {
        resonance_depth: depth,
        ..CrystalConfig::with_steps(steps)
    };
    CrystalCalculator::new(config, OscillatorParams::default())
        .expect("benchmark config is valid")
}

// ── simulate() ───────────────────────────────────────────────────────

fn bench_simulate_100(c: &mut Criterion) {
    let calc = make_calculator(100, 5);
    c.bench_function("simulate_100steps", |b| {
        b.iter(|| calc.simulate(black_box(100.0), Category::Currency))
    });
}

fn bench_simulate_1000(c: &mut Criterion) {
    let calc = make_calculator(1000, 5);
    c.bench_function("simulate_1000steps", |b| {
        b.iter(|| calc.simulate(black_box(100.0), Category::Currency))
    });
}

fn bench_simulate_deep_resonance(c: &mut Criterion) {
    let calc = make_calculator(1000, 50);
    c.bench_function("simulate_1000steps_depth50", |b| {
        b.iter(|| calc.simulate(black_box(100.0), Category::Art))
    });
}

// ── analyze() ────────────────────────────────────────────────────────

fn bench_analyze_1000(c: &mut Criterion) {
    let series = make_calculator(1000, 5)
        .simulate(100.0, Category::Currency)
        .expect("simulation succeeds")
        .time_series;
    c.bench_function("analyze_1000steps", |b| {
        b.iter(|| analyze(black_box(&series)))
    });
}

// ── Prime table ──────────────────────────────────────────────────────

fn bench_prime_table(c: &mut Criterion) {
    c.bench_function("prime_table_100", |b| {
        b.iter(|| prime_table(black_box(100)))
    });
}

criterion_group!(
    benches,
    bench_simulate_100,
    bench_simulate_1000,
    bench_simulate_deep_resonance,
    bench_analyze_1000,
    bench_prime_table,
);
criterion_main!(benches);
