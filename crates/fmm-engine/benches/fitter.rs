//! Decomposition benchmarks
//!
//! Tracks the cost of one refinement pass and of full epoch
//! decomposition as the epoch grows.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fmm_engine::{ComponentFitter, FmmConfig, FmmEngine, WaveParams};
use std::f64::consts::TAU;

fn alpha_burst(n: usize, sampling_rate: f64) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let t = i as f64 / sampling_rate;
            35.0 * (TAU * 10.0 * t).sin()
                + 20.0 * (TAU * 6.0 * t).sin()
                + 8.0 * (TAU * 21.0 * t + 0.4).sin()
        })
        .collect()
}

fn bench_component_fit(c: &mut Criterion) {
    let config = FmmConfig::default();
    let fitter = ComponentFitter::new(&config);
    let signal = alpha_burst(1280, 128.0);
    let initial = WaveParams {
        freq_hz: 10.1,
        alpha: 0.5,
        omega: 0.8,
    };

    c.bench_function("component_fit_10s_epoch", |b| {
        b.iter(|| fitter.fit(black_box(&signal), 128.0, black_box(initial)))
    });
}

fn bench_decompose_single_component(c: &mut Criterion) {
    let config = FmmConfig {
        n_components: 1,
        random_seed: Some(42),
        ..FmmConfig::default()
    };
    let engine = FmmEngine::new(config).unwrap();
    let signal = alpha_burst(1280, 128.0);

    c.bench_function("decompose_1_component_10s", |b| {
        b.iter(|| engine.decompose(black_box(&signal), 0))
    });
}

fn bench_decompose_epoch_scaling(c: &mut Criterion) {
    let config = FmmConfig {
        n_components: 3,
        random_seed: Some(42),
        ..FmmConfig::default()
    };
    let engine = FmmEngine::new(config).unwrap();

    let mut group = c.benchmark_group("decompose_epoch_scaling");
    for seconds in [10u64, 30, 60] {
        let n = (seconds * 128) as usize;
        let signal = alpha_burst(n, 128.0);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(seconds), &signal, |b, s| {
            b.iter(|| engine.decompose(black_box(s), 0))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_component_fit,
    bench_decompose_single_component,
    bench_decompose_epoch_scaling,
);
criterion_main!(benches);
