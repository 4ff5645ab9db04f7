//! Benchmarks for quorum lock acquisition latency

use std::sync::Arc;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion};
use quorum_lock_core::prelude::*;

fn bench_quorum_acquisition(c: &mut Criterion) {
    let ttl = Duration::from_secs(5);

    let mut group = c.benchmark_group("memory_quorum");
    for store_count in [1usize, 3, 5] {
        let stores: Vec<Arc<MemoryStore>> = (0..store_count)
            .map(|i| Arc::new(MemoryStore::new(format!("mem-{i}"))))
            .collect();
        let config = LockConfig::builder().retry_count(1).build().unwrap();
        let manager = QuorumLockManager::new(stores, config).unwrap();

        group.bench_function(format!("acquire_release_n{store_count}"), |b| {
            b.to_async(tokio::runtime::Runtime::new().unwrap())
                .iter(|| async {
                    if let Ok(Some(handle)) = manager.acquire("bench-lock", ttl).await {
                        manager.release(&handle).await;
                    }
                });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_quorum_acquisition);
criterion_main!(benches);
