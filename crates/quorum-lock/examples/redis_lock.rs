//! Example: quorum lock over Redis nodes
//!
//! Run with: `cargo run --example redis_lock`
//!
//! Requires at least one Redis server. Set REDIS_URLS to a comma-separated
//! list of node URLs (ideally 3 or 5 independent nodes) or rely on the
//! localhost default.

use std::sync::Arc;
use std::time::Duration;

use quorum_lock::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let urls = std::env::var("REDIS_URLS")
        .unwrap_or_else(|_| "redis://localhost:6379".to_string());

    println!("Connecting to Redis nodes...");
    let mut builder = RedisStoreBuilder::new();
    for url in urls.split(',') {
        builder = builder.url(url.trim());
    }
    let stores: Vec<Arc<RedisStore>> = builder.build().await?.into_iter().map(Arc::new).collect();

    let config = LockConfig::builder()
        .retry_count(3)
        .retry_delay(Duration::from_millis(100), Duration::from_millis(300))
        .build()?;
    let manager = QuorumLockManager::new(stores, config)?;
    println!(
        "Manager over {} store(s), quorum {}",
        manager.store_count(),
        manager.quorum()
    );

    match manager.acquire("example-resource", Duration::from_secs(10)).await? {
        Some(handle) => {
            println!(
                "Acquired '{}' with {}ms of validity",
                handle.resource(),
                handle.validity_millis()
            );

            // Critical section: finish within handle.validity().
            tokio::time::sleep(Duration::from_millis(500)).await;

            manager.release(&handle).await;
            println!("Released");
        }
        None => println!("Lock is held elsewhere, try again later"),
    }

    Ok(())
}
