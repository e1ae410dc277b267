//! redikit — a typed convenience layer over Redis data structures.
//!
//! Every operation is a direct pass-through to exactly one Redis command,
//! issued on a caller-supplied connection from the [`redis`] driver. The
//! crate owns no state, no pool, and no protocol handling; the two Lua
//! helpers ([`RedisHelper::increment_and_check`] and
//! [`RedisHelper::delete_by_pattern`]) get their atomicity entirely from the
//! server's script engine.
//!
//! ```no_run
//! use redikit::{Direction, RedisHelper};
//!
//! # async fn demo() -> redikit::Result<()> {
//! let client = redis::Client::open("redis://127.0.0.1:6379")?;
//! let conn = client.get_multiplexed_async_connection().await?;
//! let mut helper = RedisHelper::new(conn);
//!
//! helper.set_hash_field("user:1", "name", "ada").await?;
//! let allowed = helper.increment_and_check("quota:user:1", 100, 60).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod helper;
pub mod scripts;

#[cfg(test)]
pub(crate) mod mock;

pub use error::{Error, Result};
pub use helper::{BitOp, Direction, GeoUnit, RedisHelper};
pub use scripts::PatternDelete;
