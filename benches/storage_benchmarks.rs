//! Performance benchmarks for the key-value store
//!
//! Every `set` rewrites the whole state document, so its cost grows with the
//! number of keys already stored.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use dnd_ui_toolkit::storage::{open_state_file, KeyValueStore, MemoryDataStore};
use serde_json::json;
use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::runtime::Runtime;

async fn populate(kv: &KeyValueStore, keys: usize) {
    for i in 0..keys {
        kv.set(&format!("slot_{i}"), &json!({ "value": i % 4 }))
            .await
            .unwrap();
    }
}

fn bench_set_json_file(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    let mut group = c.benchmark_group("kv_set_json_file");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(5));

    for keys in [10, 100, 1000] {
        let temp_dir = TempDir::new().unwrap();
        let kv = open_state_file(temp_dir.path().join("state.json"));
        rt.block_on(populate(&kv, keys));

        group.bench_with_input(BenchmarkId::new("set", keys), &keys, |b, _| {
            b.to_async(&rt).iter(|| async {
                kv.set("hp", &json!({ "current": black_box(12), "temporary": 0 }))
                    .await
                    .unwrap();
            });
        });
    }

    group.finish();
}

fn bench_set_memory(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    let mut group = c.benchmark_group("kv_set_memory");
    for keys in [10, 100, 1000] {
        let kv = KeyValueStore::new(Arc::new(MemoryDataStore::new()));
        rt.block_on(populate(&kv, keys));

        group.bench_with_input(BenchmarkId::new("set", keys), &keys, |b, _| {
            b.to_async(&rt).iter(|| async {
                kv.set("ki", &json!({ "value": black_box(1) })).await.unwrap();
            });
        });
    }
    group.finish();
}

fn bench_get(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let kv = KeyValueStore::new(Arc::new(MemoryDataStore::new()));
    rt.block_on(populate(&kv, 100));

    c.bench_function("kv_get_cached", |b| {
        b.to_async(&rt).iter(|| async {
            let value: Option<serde_json::Value> = kv.get(black_box("slot_42")).await.unwrap();
            black_box(value)
        });
    });
}

criterion_group!(benches, bench_set_json_file, bench_set_memory, bench_get);
criterion_main!(benches);
