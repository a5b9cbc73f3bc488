use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ixtree::index::btree::{Entry, IndexHandle, OrderedKey};
use ixtree::{IndexConfig, InsertPolicy, RecordId};

fn build(order: usize, policy: InsertPolicy, n: i64) -> IndexHandle {
    let mut index = IndexHandle::new(IndexConfig::new(order, policy)).unwrap();
    for k in 0..n {
        let key = OrderedKey::new((k * 7_919) % n);
        index.insert(Entry::keyed(key), RecordId::new(k as i32, 0));
    }
    index
}

fn insert_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    for &order in &[2usize, 8, 32] {
        for &n in &[1_000i64, 10_000] {
            group.bench_with_input(
                BenchmarkId::new(format!("balanced_order_{}", order), n),
                &n,
                |b, &n| b.iter(|| black_box(build(order, InsertPolicy::Balanced, n))),
            );
        }
    }

    // Sketch trees stop growing after the first root split, so this mostly
    // measures the append path and discarded splits.
    group.bench_function("sketch_order_5_1k", |b| {
        b.iter(|| black_box(build(5, InsertPolicy::Sketch, 1_000)))
    });

    group.finish();
}

fn search_benchmark(c: &mut Criterion) {
    let index = build(16, InsertPolicy::Balanced, 100_000);
    c.bench_function("search_balanced_100k", |b| {
        let mut k = 0i64;
        b.iter(|| {
            k = (k + 7_919) % 100_000;
            black_box(index.search(&OrderedKey::new(k)))
        })
    });
}

criterion_group!(benches, insert_benchmark, search_benchmark);
criterion_main!(benches);
