//! The atomic script executor: two fixed Lua procedures run server-side.
//!
//! Each call issues a single EVAL with the script body, so the whole
//! procedure executes as one indivisible unit inside the server's script
//! engine — no other client's commands interleave with it. The crate relies
//! on that guarantee alone; there is no client-side locking.

use redis::aio::ConnectionLike;
use redis::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::helper::RedisHelper;

/// Increment a counter and compare it to a limit, optionally refreshing the
/// key's expiry. ARGV[1] is the limit, ARGV[2] the TTL in seconds (0 = off).
///
/// Lua returns `false` when the limit is exceeded, which reaches the client
/// as a protocol nil.
pub const COUNTER_CHECK: &str = r#"redis.call('INCR', KEYS[1])
local count = tonumber(redis.call('GET', KEYS[1]))
local ttl = tonumber(ARGV[2])
if ttl > 0 then
    redis.call('EXPIRE', KEYS[1], ttl)
end
return count <= tonumber(ARGV[1])"#;

/// Scan the whole keyspace for keys matching ARGV[1] (glob pattern) and
/// delete each matched batch as it is found. When ARGV[2] is "1" the deleted
/// key names are collected and returned; otherwise the script returns 1.
pub const SCAN_DELETE: &str = r#"local cursor = "0"
local deletedKeys = {}
local keys

repeat
    cursor, keys = unpack(redis.call("SCAN", cursor, "MATCH", ARGV[1], "COUNT", 1000))

    if #keys > 0 then
        redis.call("DEL", unpack(keys))
        if ARGV[2] == "1" then
            for i, key in ipairs(keys) do
                table.insert(deletedKeys, key)
            end
        end
    end

until cursor == "0"

if ARGV[2] == "1" then
    return deletedKeys
end

return 1"#;

/// Outcome of [`RedisHelper::delete_by_pattern`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternDelete {
    /// The pass completed; key names were not requested.
    Completed,
    /// The names of every key the pass deleted (empty when nothing matched).
    Deleted(Vec<String>),
}

impl<C: ConnectionLike + Send> RedisHelper<C> {
    /// Atomically increment the counter at `key` and check it against
    /// `limit`. Returns true while the post-increment count is within the
    /// limit.
    ///
    /// A missing key starts at 0, so the first call observes 1. When
    /// `ttl_seconds` is greater than zero the key's expiry is set on every
    /// call, not only the one that created it; callers wanting
    /// expire-once semantics must guard that themselves.
    pub async fn increment_and_check(
        &mut self,
        key: &str,
        limit: i64,
        ttl_seconds: u64,
    ) -> Result<bool> {
        let allowed: bool = redis::cmd("EVAL")
            .arg(COUNTER_CHECK)
            .arg(1)
            .arg(key)
            .arg(limit)
            .arg(ttl_seconds)
            .query_async(&mut self.conn)
            .await?;
        debug!(key, limit, allowed, "counter check");
        Ok(allowed)
    }

    /// Atomically delete every key matching a glob `pattern`.
    ///
    /// The server scans its keyspace in batches of 1000 and deletes matches
    /// as it goes, all inside one script execution: nothing can race the
    /// pass, and nothing else runs on the server until it finishes — on a
    /// large keyspace that pause can be significant. If the script aborts
    /// partway, keys it already deleted stay deleted; Redis does not roll
    /// back script writes.
    ///
    /// With `return_keys` the deleted names come back in
    /// [`PatternDelete::Deleted`] (order unspecified); without it the
    /// server answers with a bare success indicator.
    pub async fn delete_by_pattern(
        &mut self,
        pattern: &str,
        return_keys: bool,
    ) -> Result<PatternDelete> {
        let reply: Value = redis::cmd("EVAL")
            .arg(SCAN_DELETE)
            .arg(0)
            .arg(pattern)
            .arg(if return_keys { "1" } else { "0" })
            .query_async(&mut self.conn)
            .await?;

        if return_keys {
            match reply {
                Value::Array(_) => {
                    let keys: Vec<String> = redis::from_redis_value(&reply)?;
                    debug!(pattern, deleted = keys.len(), "pattern delete");
                    Ok(PatternDelete::Deleted(keys))
                }
                other => Err(Error::reply("delete_by_pattern", &other)),
            }
        } else {
            match reply {
                Value::Int(_) => {
                    debug!(pattern, "pattern delete complete");
                    Ok(PatternDelete::Completed)
                }
                other => Err(Error::reply("delete_by_pattern", &other)),
            }
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────
