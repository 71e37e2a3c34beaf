//! Benchmarks for kvf store operations

use std::fs;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kvf::{record::parse_line, Config, RecordCollection, Store};
use tempfile::TempDir;

fn sample_file(entries: usize) -> String {
    let mut content = String::from("# generated\n\n");
    for i in 0..entries {
        content.push_str(&format!("key{}=\"value {}\"\n", i, i));
    }
    content
}

fn parse_benchmarks(c: &mut Criterion) {
    c.bench_function("parse_line", |b| {
        b.iter(|| parse_line(black_box("  some_key = 'some quoted value'  ")))
    });

    let content = sample_file(1_000);
    c.bench_function("parse_collection_1000", |b| {
        b.iter(|| RecordCollection::parse_from(black_box(content.as_bytes())))
    });
}

fn store_benchmarks(c: &mut Criterion) {
    let temp = TempDir::new().unwrap();
    let store = Store::open(Config::builder().lock_dir(temp.path().join("locks")).build()).unwrap();

    let mut group = c.benchmark_group("repository");
    for entries in [10usize, 1_000] {
        let path = temp.path().join(format!("bench-{}.env", entries));
        fs::write(&path, sample_file(entries)).unwrap();
        let repo = store.repository(&path);
        let last = format!("key{}", entries - 1);

        group.bench_with_input(BenchmarkId::new("get", entries), &last, |b, key| {
            b.iter(|| repo.get(black_box(key)).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("set", entries), &last, |b, key| {
            b.iter(|| repo.set_value(black_box(key), "updated").unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, parse_benchmarks, store_benchmarks);
criterion_main!(benches);
