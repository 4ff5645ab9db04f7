//! Redis implementation of the store adapter contract.

use std::time::Duration;

use fred::prelude::*;
use fred::types::CustomCommand;
use quorum_lock_core::store::StoreAdapter;
use tracing::warn;

/// Lua script for token-guarded delete.
///
/// Runs server-side as one atomic unit; a client-side GET followed by DEL
/// would race against key expiry and re-acquisition by another owner.
const COMPARE_AND_DELETE_LUA: &str = r#"
    if redis.call('get', KEYS[1]) == ARGV[1] then
        return redis.call('del', KEYS[1])
    end
    return 0
"#;

/// One independent Redis node acting as a lock store.
///
/// Per the adapter contract, every transport error degrades to "operation
/// did not succeed": an unreachable node is indistinguishable from a held
/// lock, and the quorum layer only ever sees booleans.
pub struct RedisStore {
    endpoint: String,
    client: RedisClient,
}

impl RedisStore {
    /// Wraps an already-connected client.
    pub fn from_client(endpoint: impl Into<String>, client: RedisClient) -> Self {
        Self {
            endpoint: endpoint.into(),
            client,
        }
    }
}

impl StoreAdapter for RedisStore {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn set_if_absent(&self, key: &str, token: &str, ttl: Duration) -> bool {
        let ttl_millis = ttl.as_millis() as i64;

        // SET NX returns the value when the key was set, nil when it existed.
        let result: Result<Option<String>, RedisError> = self
            .client
            .set(
                key,
                token,
                Some(Expiration::PX(ttl_millis)),
                Some(SetOptions::NX),
                false,
            )
            .await;

        match result {
            Ok(reply) => reply.is_some(),
            Err(error) => {
                warn!(endpoint = %self.endpoint, %error, "SET NX failed, counting as not granted");
                false
            }
        }
    }

    async fn compare_and_delete(&self, key: &str, token: &str) -> bool {
        let args: Vec<RedisValue> = vec![
            COMPARE_AND_DELETE_LUA.into(),
            1_i64.into(), // numkeys
            key.into(),
            token.into(),
        ];
        let cmd = CustomCommand::new_static("EVAL", None, false);

        let result: Result<i64, RedisError> = self.client.custom(cmd, args).await;

        match result {
            Ok(deleted) => deleted == 1,
            Err(error) => {
                warn!(endpoint = %self.endpoint, %error, "EVAL compare-and-delete failed");
                false
            }
        }
    }
}
