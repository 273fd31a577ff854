//! # Floor Detector Benchmarks
//!
//! Measures the per-batch cost of registration and floor evaluation across
//! sensor counts and window sizes.
//!
//! Run: `cargo bench --bench detector`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use floorguard_core::{filter, DetectorConfig, Floor, FloorCalibration, FloorDetector};

const HPA_PER_FLOOR: f32 = 0.42;

fn config(sensors: usize, window: usize) -> DetectorConfig {
    let entries: Vec<(Floor, f32)> = (-2..=20)
        .map(|floor| (floor, -(floor as f32) * HPA_PER_FLOOR))
        .collect();
    DetectorConfig::new(FloorCalibration::delta(0, &entries).unwrap())
        .with_tolerance(0.14)
        .with_redundant_count(sensors)
        .with_window_size(window)
}

fn warm_detector(sensors: usize, window: usize) -> FloorDetector {
    let mut detector = FloorDetector::new(config(sensors, window)).unwrap();
    let batch = vec![1013.25; sensors];
    for _ in 0..window {
        detector.register_measurements(&batch).unwrap();
    }
    detector
}

/// Benchmark batch registration
fn bench_register(c: &mut Criterion) {
    let mut group = c.benchmark_group("register_measurements");

    for sensors in [1usize, 4, 8] {
        let mut detector = warm_detector(sensors, 5);
        let batch = vec![1013.1; sensors];

        group.throughput(Throughput::Elements(sensors as u64));
        group.bench_with_input(BenchmarkId::from_parameter(sensors), &batch, |b, batch| {
            b.iter(|| detector.register_measurements(black_box(batch)))
        });
    }

    group.finish();
}

/// Benchmark a full floor evaluation
fn bench_determine_floor(c: &mut Criterion) {
    let mut group = c.benchmark_group("determine_floor");

    for window in [5usize, 15, 63] {
        let mut detector = warm_detector(4, window);
        group.bench_with_input(BenchmarkId::new("window", window), &window, |b, _| {
            b.iter(|| black_box(detector.determine_floor()))
        });
    }

    group.finish();
}

/// Benchmark the median filter alone
fn bench_median(c: &mut Criterion) {
    let mut group = c.benchmark_group("median");

    for size in [5usize, 31, 64] {
        let data: Vec<f32> = (0..size).map(|i| 1013.0 + ((i * 7) % 11) as f32 * 0.01).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| {
                let mut scratch = data.clone();
                black_box(filter::median(&mut scratch))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_register, bench_determine_floor, bench_median);
criterion_main!(benches);
