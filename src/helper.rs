//! The command dispatcher: one typed method per Redis command.
//!
//! [`RedisHelper`] wraps a caller-supplied async connection and translates
//! each method call into exactly one Redis command, converting the reply to
//! the nearest Rust representation. No retries, no batching, no local
//! validation beyond what the argument types enforce; any driver or server
//! error propagates unmodified.

use std::collections::HashMap;
use std::time::Instant;

use redis::aio::ConnectionLike;
use tracing::debug;

use crate::error::Result;

// ── Argument types ─────────────────────────────────────────────────

/// Selects between head- and tail-oriented command variants
/// (`LPUSH`/`RPUSH`, `ZRANGE`/`ZREVRANGE`). The server does the ordering;
/// the dispatcher never sorts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Asc,
    #[default]
    Desc,
}

/// Bitwise operation for [`RedisHelper::bit_op`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitOp {
    And,
    Or,
    Xor,
}

impl BitOp {
    fn as_str(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Xor => "XOR",
        }
    }
}

/// Distance unit for the geospatial commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeoUnit {
    #[default]
    Meters,
    Kilometers,
    Miles,
    Feet,
}

impl GeoUnit {
    fn as_str(self) -> &'static str {
        match self {
            Self::Meters => "m",
            Self::Kilometers => "km",
            Self::Miles => "mi",
            Self::Feet => "ft",
        }
    }
}

// ── RedisHelper ────────────────────────────────────────────────────

/// A stateless facade over one injected Redis connection.
///
/// The connection is owned but its lifecycle is the caller's problem:
/// the helper never opens, pools, or closes anything. Construct one helper
/// per connection and pass it explicitly to whoever needs it.
pub struct RedisHelper<C> {
    pub(crate) conn: C,
}

impl<C: ConnectionLike + Send> RedisHelper<C> {
    /// Wrap an existing connection from the `redis` driver.
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    /// Consume the helper and hand the connection back.
    pub fn into_inner(self) -> C {
        self.conn
    }

    /// Delete a key of any type. Returns true when the key existed.
    pub async fn delete_key(&mut self, key: &str) -> Result<bool> {
        let removed: bool = redis::cmd("DEL").arg(key).query_async(&mut self.conn).await?;
        Ok(removed)
    }

    // ── Hash commands ──────────────────────────────────────────────

    /// Store several field/value pairs in a hash.
    pub async fn set_hash(&mut self, key: &str, entries: &[(&str, &str)]) -> Result<()> {
        let mut cmd = redis::cmd("HSET");
        cmd.arg(key);
        for (field, value) in entries {
            cmd.arg(*field).arg(*value);
        }
        let _added: i64 = cmd.query_async(&mut self.conn).await?;
        Ok(())
    }

    /// Set a single hash field. Returns true when the field was newly created.
    pub async fn set_hash_field(&mut self, key: &str, field: &str, value: &str) -> Result<bool> {
        let created: bool = redis::cmd("HSET")
            .arg(key)
            .arg(field)
            .arg(value)
            .query_async(&mut self.conn)
            .await?;
        Ok(created)
    }

    /// Read a whole hash. An absent key yields an empty map, not an error.
    pub async fn get_hash(&mut self, key: &str) -> Result<HashMap<String, String>> {
        let map: HashMap<String, String> = redis::cmd("HGETALL")
            .arg(key)
            .query_async(&mut self.conn)
            .await?;
        Ok(map)
    }

    /// Read one hash field, `None` when the field or key is absent.
    pub async fn get_hash_field(&mut self, key: &str, field: &str) -> Result<Option<String>> {
        let value: Option<String> = redis::cmd("HGET")
            .arg(key)
            .arg(field)
            .query_async(&mut self.conn)
            .await?;
        Ok(value)
    }

    /// Remove one hash field. Returns true when the field existed.
    pub async fn delete_hash_field(&mut self, key: &str, field: &str) -> Result<bool> {
        let removed: bool = redis::cmd("HDEL")
            .arg(key)
            .arg(field)
            .query_async(&mut self.conn)
            .await?;
        Ok(removed)
    }

    /// Delete a hash key.
    pub async fn delete_hash(&mut self, key: &str) -> Result<bool> {
        self.delete_key(key).await
    }

    /// Read a hash, or populate it from `producer` when empty.
    ///
    /// Cache-aside: an empty `HGETALL` reply counts as a miss, so an absent
    /// key and a present-but-empty hash are indistinguishable here. On a
    /// miss the produced map is written through and, when `ttl_seconds` is
    /// given, the key's expiry is set. The producer is not invoked on a hit.
    pub async fn remember_hash<F>(
        &mut self,
        key: &str,
        ttl_seconds: Option<u64>,
        producer: F,
    ) -> Result<HashMap<String, String>>
    where
        F: FnOnce() -> HashMap<String, String>,
    {
        let stored = self.get_hash(key).await?;
        if !stored.is_empty() {
            return Ok(stored);
        }

        debug!(key, "hash empty or absent, invoking producer");
        let produced = producer();
        if produced.is_empty() {
            // Nothing to store; HSET with zero pairs is a server error.
            return Ok(produced);
        }

        let entries: Vec<(&str, &str)> = produced
            .iter()
            .map(|(field, value)| (field.as_str(), value.as_str()))
            .collect();
        self.set_hash(key, &entries).await?;
        if let Some(seconds) = ttl_seconds {
            self.expire(key, seconds).await?;
        }
        Ok(produced)
    }

    // ── List commands ──────────────────────────────────────────────

    /// Push values onto a list: `Asc` prepends (LPUSH), `Desc` appends
    /// (RPUSH). Returns the resulting list length.
    pub async fn push_list(
        &mut self,
        key: &str,
        values: &[&str],
        direction: Direction,
    ) -> Result<u64> {
        let name = match direction {
            Direction::Asc => "LPUSH",
            Direction::Desc => "RPUSH",
        };
        let mut cmd = redis::cmd(name);
        cmd.arg(key);
        for value in values {
            cmd.arg(*value);
        }
        let len: u64 = cmd.query_async(&mut self.conn).await?;
        Ok(len)
    }

    /// Read a range of list elements (inclusive indexes, negatives count
    /// from the tail).
    pub async fn get_list(&mut self, key: &str, start: i64, stop: i64) -> Result<Vec<String>> {
        let items: Vec<String> = redis::cmd("LRANGE")
            .arg(key)
            .arg(start)
            .arg(stop)
            .query_async(&mut self.conn)
            .await?;
        Ok(items)
    }

    /// Read one list element by index.
    pub async fn get_list_index(&mut self, key: &str, index: i64) -> Result<Option<String>> {
        let value: Option<String> = redis::cmd("LINDEX")
            .arg(key)
            .arg(index)
            .query_async(&mut self.conn)
            .await?;
        Ok(value)
    }

    /// Remove every occurrence of `element` from a list. Returns the number
    /// removed.
    pub async fn delete_list_element(&mut self, key: &str, element: &str) -> Result<u64> {
        let removed: u64 = redis::cmd("LREM")
            .arg(key)
            .arg(0)
            .arg(element)
            .query_async(&mut self.conn)
            .await?;
        Ok(removed)
    }

    /// Delete a list key.
    pub async fn delete_list(&mut self, key: &str) -> Result<bool> {
        self.delete_key(key).await
    }

    // ── Set commands ───────────────────────────────────────────────

    /// Add a member to a set. Returns true when it was not already present.
    pub async fn add_set_member(&mut self, key: &str, member: &str) -> Result<bool> {
        let added: bool = redis::cmd("SADD")
            .arg(key)
            .arg(member)
            .query_async(&mut self.conn)
            .await?;
        Ok(added)
    }

    /// Read all members of a set (order unspecified).
    pub async fn get_set(&mut self, key: &str) -> Result<Vec<String>> {
        let members: Vec<String> = redis::cmd("SMEMBERS")
            .arg(key)
            .query_async(&mut self.conn)
            .await?;
        Ok(members)
    }

    /// Membership test.
    pub async fn set_contains(&mut self, key: &str, member: &str) -> Result<bool> {
        let present: bool = redis::cmd("SISMEMBER")
            .arg(key)
            .arg(member)
            .query_async(&mut self.conn)
            .await?;
        Ok(present)
    }

    /// Remove a member from a set. Returns true when it was present.
    pub async fn remove_set_member(&mut self, key: &str, member: &str) -> Result<bool> {
        let removed: bool = redis::cmd("SREM")
            .arg(key)
            .arg(member)
            .query_async(&mut self.conn)
            .await?;
        Ok(removed)
    }

    /// Delete a set key.
    pub async fn delete_set(&mut self, key: &str) -> Result<bool> {
        self.delete_key(key).await
    }

    // ── Sorted set commands ────────────────────────────────────────

    /// Add a member with a score. Returns true when the member was new.
    pub async fn add_sorted_set(&mut self, key: &str, score: f64, member: &str) -> Result<bool> {
        let added: bool = redis::cmd("ZADD")
            .arg(key)
            .arg(score)
            .arg(member)
            .query_async(&mut self.conn)
            .await?;
        Ok(added)
    }

    /// Read a rank range: `Asc` maps to ZRANGE, `Desc` to ZREVRANGE.
    pub async fn get_sorted_set(
        &mut self,
        key: &str,
        start: i64,
        stop: i64,
        direction: Direction,
    ) -> Result<Vec<String>> {
        let name = match direction {
            Direction::Asc => "ZRANGE",
            Direction::Desc => "ZREVRANGE",
        };
        let members: Vec<String> = redis::cmd(name)
            .arg(key)
            .arg(start)
            .arg(stop)
            .query_async(&mut self.conn)
            .await?;
        Ok(members)
    }

    /// Read a member's score, `None` when absent.
    pub async fn get_sorted_set_score(&mut self, key: &str, member: &str) -> Result<Option<f64>> {
        let score: Option<f64> = redis::cmd("ZSCORE")
            .arg(key)
            .arg(member)
            .query_async(&mut self.conn)
            .await?;
        Ok(score)
    }

    /// Remove a member. Returns true when it was present.
    pub async fn remove_sorted_set_member(&mut self, key: &str, member: &str) -> Result<bool> {
        let removed: bool = redis::cmd("ZREM")
            .arg(key)
            .arg(member)
            .query_async(&mut self.conn)
            .await?;
        Ok(removed)
    }

    /// Delete a sorted set key.
    pub async fn delete_sorted_set(&mut self, key: &str) -> Result<bool> {
        self.delete_key(key).await
    }

    // ── Bitmap commands ────────────────────────────────────────────

    /// Set the bit at `offset`. Returns the previous bit.
    pub async fn set_bit(&mut self, key: &str, offset: u64, value: bool) -> Result<bool> {
        let previous: bool = redis::cmd("SETBIT")
            .arg(key)
            .arg(offset)
            .arg(i32::from(value))
            .query_async(&mut self.conn)
            .await?;
        Ok(previous)
    }

    /// Read the bit at `offset`. Unset offsets and absent keys read as false.
    pub async fn get_bit(&mut self, key: &str, offset: u64) -> Result<bool> {
        let bit: bool = redis::cmd("GETBIT")
            .arg(key)
            .arg(offset)
            .query_async(&mut self.conn)
            .await?;
        Ok(bit)
    }

    /// Count the set bits in a string key.
    pub async fn bit_count(&mut self, key: &str) -> Result<u64> {
        let count: u64 = redis::cmd("BITCOUNT")
            .arg(key)
            .query_async(&mut self.conn)
            .await?;
        Ok(count)
    }

    /// Combine two keys bitwise into `dest`. Returns the length of the
    /// resulting string.
    pub async fn bit_op(&mut self, op: BitOp, dest: &str, lhs: &str, rhs: &str) -> Result<u64> {
        let len: u64 = redis::cmd("BITOP")
            .arg(op.as_str())
            .arg(dest)
            .arg(lhs)
            .arg(rhs)
            .query_async(&mut self.conn)
            .await?;
        Ok(len)
    }

    /// Delete a bitmap key.
    pub async fn delete_bitmap(&mut self, key: &str) -> Result<bool> {
        self.delete_key(key).await
    }

    // ── Geospatial commands ────────────────────────────────────────

    /// Add a member at the given coordinates. Returns true when it was new.
    pub async fn add_geo(
        &mut self,
        key: &str,
        longitude: f64,
        latitude: f64,
        member: &str,
    ) -> Result<bool> {
        let added: bool = redis::cmd("GEOADD")
            .arg(key)
            .arg(longitude)
            .arg(latitude)
            .arg(member)
            .query_async(&mut self.conn)
            .await?;
        Ok(added)
    }

    /// Read a member's (longitude, latitude), `None` when unknown.
    pub async fn get_geo_position(
        &mut self,
        key: &str,
        member: &str,
    ) -> Result<Option<(f64, f64)>> {
        let positions: Vec<Option<(f64, f64)>> = redis::cmd("GEOPOS")
            .arg(key)
            .arg(member)
            .query_async(&mut self.conn)
            .await?;
        Ok(positions.into_iter().next().flatten())
    }

    /// Distance between two members in `unit`, `None` when either is unknown.
    pub async fn geo_distance(
        &mut self,
        key: &str,
        a: &str,
        b: &str,
        unit: GeoUnit,
    ) -> Result<Option<f64>> {
        let distance: Option<f64> = redis::cmd("GEODIST")
            .arg(key)
            .arg(a)
            .arg(b)
            .arg(unit.as_str())
            .query_async(&mut self.conn)
            .await?;
        Ok(distance)
    }

    /// Members within `radius` of a coordinate (GEORADIUS), optionally
    /// capped at `count` results.
    pub async fn geo_radius(
        &mut self,
        key: &str,
        longitude: f64,
        latitude: f64,
        radius: f64,
        unit: GeoUnit,
        count: Option<u64>,
    ) -> Result<Vec<String>> {
        let mut cmd = redis::cmd("GEORADIUS");
        cmd.arg(key)
            .arg(longitude)
            .arg(latitude)
            .arg(radius)
            .arg(unit.as_str());
        if let Some(limit) = count {
            cmd.arg("COUNT").arg(limit);
        }
        let members: Vec<String> = cmd.query_async(&mut self.conn).await?;
        Ok(members)
    }

    /// Members within `radius` of an existing member (GEORADIUSBYMEMBER),
    /// optionally capped at `count` results.
    pub async fn geo_radius_by_member(
        &mut self,
        key: &str,
        member: &str,
        radius: f64,
        unit: GeoUnit,
        count: Option<u64>,
    ) -> Result<Vec<String>> {
        let mut cmd = redis::cmd("GEORADIUSBYMEMBER");
        cmd.arg(key).arg(member).arg(radius).arg(unit.as_str());
        if let Some(limit) = count {
            cmd.arg("COUNT").arg(limit);
        }
        let members: Vec<String> = cmd.query_async(&mut self.conn).await?;
        Ok(members)
    }

    /// Delete a geospatial index key.
    pub async fn delete_geo(&mut self, key: &str) -> Result<bool> {
        self.delete_key(key).await
    }

    // ── HyperLogLog commands ───────────────────────────────────────

    /// Register an element. Returns true when the estimate changed.
    pub async fn add_hyperloglog(&mut self, key: &str, element: &str) -> Result<bool> {
        let changed: bool = redis::cmd("PFADD")
            .arg(key)
            .arg(element)
            .query_async(&mut self.conn)
            .await?;
        Ok(changed)
    }

    /// Approximate cardinality of the registered elements.
    pub async fn count_hyperloglog(&mut self, key: &str) -> Result<u64> {
        let count: u64 = redis::cmd("PFCOUNT")
            .arg(key)
            .query_async(&mut self.conn)
            .await?;
        Ok(count)
    }

    /// Delete a HyperLogLog key.
    pub async fn delete_hyperloglog(&mut self, key: &str) -> Result<bool> {
        self.delete_key(key).await
    }

    // ── Key and server commands ────────────────────────────────────

    /// PING the server and return the measured round-trip in milliseconds.
    pub async fn ping(&mut self) -> Result<f64> {
        let start = Instant::now();
        let _pong: String = redis::cmd("PING").query_async(&mut self.conn).await?;
        Ok(start.elapsed().as_secs_f64() * 1000.0)
    }

    /// All keys matching a glob pattern. Walks the whole keyspace; prefer
    /// SCAN-based access on large databases.
    pub async fn keys(&mut self, pattern: &str) -> Result<Vec<String>> {
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(pattern)
            .query_async(&mut self.conn)
            .await?;
        Ok(keys)
    }

    /// True when the key exists.
    pub async fn exists(&mut self, key: &str) -> Result<bool> {
        let present: bool = redis::cmd("EXISTS")
            .arg(key)
            .query_async(&mut self.conn)
            .await?;
        Ok(present)
    }

    /// Set a key's time-to-live in seconds. Returns false when the key is
    /// absent.
    pub async fn expire(&mut self, key: &str, seconds: u64) -> Result<bool> {
        let set: bool = redis::cmd("EXPIRE")
            .arg(key)
            .arg(seconds)
            .query_async(&mut self.conn)
            .await?;
        Ok(set)
    }

    /// Set a key's time-to-live in milliseconds.
    pub async fn pexpire(&mut self, key: &str, milliseconds: u64) -> Result<bool> {
        let set: bool = redis::cmd("PEXPIRE")
            .arg(key)
            .arg(milliseconds)
            .query_async(&mut self.conn)
            .await?;
        Ok(set)
    }

    /// Expire a key at an absolute UNIX timestamp (seconds).
    pub async fn expire_at(&mut self, key: &str, unix_seconds: i64) -> Result<bool> {
        let set: bool = redis::cmd("EXPIREAT")
            .arg(key)
            .arg(unix_seconds)
            .query_async(&mut self.conn)
            .await?;
        Ok(set)
    }

    /// Bytes a key and its value occupy, `None` when the key is absent.
    pub async fn memory_usage(&mut self, key: &str) -> Result<Option<u64>> {
        let bytes: Option<u64> = redis::cmd("MEMORY")
            .arg("USAGE")
            .arg(key)
            .query_async(&mut self.conn)
            .await?;
        Ok(bytes)
    }

    /// Server-wide memory statistics, as reported field-by-field.
    pub async fn memory_stats(&mut self) -> Result<HashMap<String, redis::Value>> {
        let stats: HashMap<String, redis::Value> = redis::cmd("MEMORY")
            .arg("STATS")
            .query_async(&mut self.conn)
            .await?;
        Ok(stats)
    }
}

// ── Tests ──────────────────────────────────────────────────────────
