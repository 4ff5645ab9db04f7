//! Redis store adapter for quorum locks.
//!
//! Maps the two store primitives onto Redis bit-for-bit:
//! set-if-absent-with-expiry is `SET key token PX ttl NX`, and
//! compare-and-delete is a single `EVAL` of the canonical unlock script.
//! For a real quorum deployment, build one [`RedisStore`] per independent
//! Redis node (ideally 3 or 5) and hand the list to a
//! `QuorumLockManager`.

pub mod adapter;
pub mod builder;

pub use adapter::RedisStore;
pub use builder::RedisStoreBuilder;
