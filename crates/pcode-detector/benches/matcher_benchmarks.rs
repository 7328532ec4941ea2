//! Normalizer and matcher benchmarks.
//!
//! Measures per-fragment cost at sample sizes up to and beyond the default cap.

use std::collections::HashSet;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use pcode_detector::{
    CodeIndexBuilder, CodeRecord, FileFormat, FragmentReader, LatLongMatcher, MatchMode,
    Normalizer, PcodeMatcher, RawFragment,
};

/// Synthetic admin table with a tag row, a P-code column, and coordinates.
fn generate_csv(rows: usize) -> String {
    let mut data = String::from("Province,Province code,Population,Latitude,Longitude\n");
    data.push_str("#adm1+name,#adm1+code,#population,#geo+lat,#geo+lon\n");
    for row in 0..rows {
        data.push_str(&format!(
            "Province {},AFG{:03},{},{:.4},{:.4}\n",
            row,
            row % 400,
            row * 37,
            29.0 + (row % 900) as f64 / 100.0,
            60.0 + (row % 1100) as f64 / 100.0
        ));
    }
    data
}

fn reference_records() -> Vec<CodeRecord> {
    (0..400)
        .map(|i| CodeRecord::new("AFG", "1", format!("AFG{:03}", i)))
        .collect()
}

fn read(data: &str, rows: usize) -> RawFragment {
    FragmentReader::with_sample_rows(rows)
        .read_delimited(data.as_bytes())
        .unwrap()
}

/// Benchmark header recovery.
fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    for rows in [200, 2_000, 20_000].iter() {
        let data = generate_csv(*rows);
        let fragment = read(&data, *rows);

        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &fragment, |b, fragment| {
            b.iter_with_setup(
                || fragment.clone(),
                |fragment| black_box(Normalizer::new().normalize(fragment)),
            )
        });
    }

    group.finish();
}

/// Benchmark P-code and mis-code matching against a 400-code reference.
fn bench_pcode_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("pcode_matching");
    let reference = CodeIndexBuilder::new().build(reference_records());
    let locations = vec!["AFG".to_string()];
    let codes: HashSet<&str> = reference.codes.candidates(&locations);
    let miscodes: HashSet<&str> = reference.miscodes.candidates(&locations);
    let matcher = PcodeMatcher::new();

    for rows in [200, 2_000].iter() {
        let table = Normalizer::new().normalize(read(&generate_csv(*rows), *rows));

        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("codes", rows), &table, |b, table| {
            b.iter(|| black_box(matcher.is_pcoded(table, &codes, MatchMode::Codes)))
        });
        group.bench_with_input(BenchmarkId::new("miscodes", rows), &table, |b, table| {
            b.iter(|| black_box(matcher.is_pcoded(table, &miscodes, MatchMode::Miscodes)))
        });
    }

    group.finish();
}

/// Benchmark coordinate pair detection.
fn bench_latlong_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("latlong_matching");
    let matcher = LatLongMatcher::new();

    for rows in [200, 2_000].iter() {
        let table = Normalizer::new().normalize(read(&generate_csv(*rows), *rows));

        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &table, |b, table| {
            b.iter(|| black_box(matcher.is_latlong(table)))
        });
    }

    group.finish();
}

/// Benchmark building the reference indices.
fn bench_reference_build(c: &mut Criterion) {
    let records = reference_records();
    c.bench_function("reference_build_400", |b| {
        b.iter(|| black_box(CodeIndexBuilder::new().build(records.clone())))
    });
}

criterion_group!(
    benches,
    bench_normalize,
    bench_pcode_matching,
    bench_latlong_matching,
    bench_reference_build,
);
criterion_main!(benches);
