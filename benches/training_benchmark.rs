//! Benchmarks for multiclass linear training and prediction.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mclinear::data::generate_blobs;
use mclinear::{LibLinear, Loss, Machine, ToyConfig};

fn toy(n_per_class: usize) -> ToyConfig {
    ToyConfig {
        n_classes: 4,
        n_dims: 10,
        n_train_per_class: n_per_class,
        n_test_per_class: n_per_class,
        spread: 1.5,
        ..ToyConfig::default()
    }
}

fn bench_training(c: &mut Criterion) {
    let mut group = c.benchmark_group("training");

    for size in [25, 100, 250].iter() {
        let ((features, labels), _) = generate_blobs(&toy(*size)).unwrap();

        let strategies = [
            ("crammer_singer", LibLinear::new()),
            ("one_vs_rest", LibLinear::one_vs_rest(Loss::L2)),
            ("one_vs_one", LibLinear::one_vs_one(Loss::L2)),
        ];

        for (name, builder) in strategies {
            group.bench_with_input(BenchmarkId::new(name, size), size, |b, _| {
                b.iter(|| {
                    builder
                        .clone()
                        .train(black_box(&features), labels.clone())
                        .unwrap()
                });
            });
        }
    }

    group.finish();
}

fn bench_prediction(c: &mut Criterion) {
    let mut group = c.benchmark_group("prediction");

    for size in [25, 100, 250].iter() {
        let ((features, labels), (test_features, _)) = generate_blobs(&toy(*size)).unwrap();
        let machine = LibLinear::new().train(&features, labels).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| machine.apply(black_box(&test_features)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_training, bench_prediction);
criterion_main!(benches);
