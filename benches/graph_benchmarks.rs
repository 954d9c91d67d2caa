use card_catalog::graph::{build_graph, compute_layout, graph_statistics};
use card_catalog::record::{Record, RecordId};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

const DISEASES: [&str; 8] = ["AD", "PD", "ALS", "FTD", "DLB", "MSA", "PSP", "HD"];
const MODALITIES: [&str; 6] = ["MRI", "PET", "Genomics", "Proteomics", "Clinical", "EEG"];

/// Synthetic dataset records with overlapping disease / modality lists
fn records(size: usize) -> Vec<Record> {
    (0..size)
        .map(|i| {
            let diseases: Vec<&str> = (0..3).map(|k| DISEASES[(i + k * 3) % DISEASES.len()]).collect();
            let modalities: Vec<&str> = (0..2).map(|k| MODALITIES[(i * 7 + k) % MODALITIES.len()]).collect();
            Record::new(RecordId::new(i as u64))
                .with_field("Study Name", format!("Study{}", i))
                .with_field("Diseases Included", diseases)
                .with_field("Data Modalities", modalities)
        })
        .collect()
}

/// Benchmark pairwise graph construction
fn bench_build_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_graph");
    let fields = ["Diseases Included", "Data Modalities"];

    for size in [25, 100, 250].iter() {
        let input = records(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let graph = build_graph(&input, &fields, 1).unwrap();
                criterion::black_box(graph.edge_count());
            });
        });
    }
    group.finish();
}

/// Benchmark spring layout at the default node cap and above
fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("spring_layout");

    for size in [25, 100, 250].iter() {
        let graph = build_graph(&records(*size), &["Diseases Included"], 2).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let layout = compute_layout(&graph, 42).unwrap();
                criterion::black_box(layout.len());
            });
        });
    }
    group.finish();
}

/// Benchmark statistics (betweenness dominates)
fn bench_statistics(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph_statistics");

    for size in [25, 100, 250].iter() {
        let graph = build_graph(&records(*size), &["Diseases Included"], 2).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let stats = graph_statistics(&graph).unwrap();
                criterion::black_box(stats.density);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build_graph, bench_layout, bench_statistics);
criterion_main!(benches);
