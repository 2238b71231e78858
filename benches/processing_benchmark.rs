// Processing benchmarks
// Author: Gabriel Demetrios Lafis

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use data_integration_engine::{
    data::{DataSet, FileFormat, Record, Value},
    export::export,
    processing::{
        AggregateProcessor, AggregateType, DataProcessor, FilterProcessor, IntegrationProcessor,
        SortProcessor,
    },
};

fn users(n: i64) -> DataSet {
    (0..n)
        .map(|i| {
            Record::new()
                .with("id", (i * 7919) % n)
                .with("name", format!("user-{}", i))
                .with("score", (i % 100) as f64 / 3.0)
        })
        .collect()
}

fn orders(n: i64) -> DataSet {
    (0..n)
        .map(|i| Record::new().with("id", i).with("product", "Laptop").with("amount", 999.99))
        .collect()
}

fn transform_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform");

    for size in [100i64, 1_000, 10_000] {
        let data = users(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("sort", size), &data, |b, data| {
            let sorter = SortProcessor::ascending("id");
            b.iter(|| black_box(sorter.process(data).unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("filter", size), &data, |b, data| {
            let filter = FilterProcessor::greater_than("score", Value::Float(10.0));
            b.iter(|| black_box(filter.process(data).unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("aggregate_avg", size), &data, |b, data| {
            let aggregate = AggregateProcessor::new("score", AggregateType::Avg);
            b.iter(|| black_box(aggregate.compute(data)));
        });
    }

    group.finish();
}

fn integrate_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("integrate");

    for size in [100i64, 500, 2_000] {
        let datasets = vec![users(size), orders(size)];

        group.bench_with_input(BenchmarkId::new("inner", size), &datasets, |b, datasets| {
            let processor = IntegrationProcessor::inner("id");
            b.iter(|| black_box(processor.integrate(datasets).unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("left", size), &datasets, |b, datasets| {
            let processor = IntegrationProcessor::left("id");
            b.iter(|| black_box(processor.integrate(datasets).unwrap()));
        });
    }

    group.finish();
}

fn export_benchmark(c: &mut Criterion) {
    let data = users(1_000);

    c.bench_function("export_csv_1000", |b| {
        b.iter(|| black_box(export(&data, FileFormat::Csv).unwrap()))
    });
    c.bench_function("export_json_1000", |b| {
        b.iter(|| black_box(export(&data, FileFormat::Json).unwrap()))
    });
}

criterion_group!(benches, transform_benchmark, integrate_benchmark, export_benchmark);
criterion_main!(benches);
