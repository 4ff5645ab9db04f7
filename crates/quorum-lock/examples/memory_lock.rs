//! Example: quorum lock over in-process stores
//!
//! Run with: `cargo run --example memory_lock`
//!
//! Uses five in-memory stores to show quorum behavior without any
//! external service, including surviving a minority of store failures.

use std::sync::Arc;
use std::time::Duration;

use quorum_lock::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let stores: Vec<Arc<MemoryStore>> = (0..5)
        .map(|i| Arc::new(MemoryStore::new(format!("store-{i}"))))
        .collect();

    let manager = QuorumLockManager::new(stores.clone(), LockConfig::default())?;
    println!(
        "Manager over {} stores, quorum {}",
        manager.store_count(),
        manager.quorum()
    );

    // Take two stores down; three of five still form a quorum.
    stores[0].set_unreachable(true);
    stores[1].set_unreachable(true);

    match manager.acquire("example-resource", Duration::from_secs(10)).await? {
        Some(handle) => {
            println!(
                "Acquired despite 2 dead stores, validity {}ms",
                handle.validity_millis()
            );
            manager.release(&handle).await;
            println!("Released");
        }
        None => println!("Failed to reach quorum"),
    }

    Ok(())
}
