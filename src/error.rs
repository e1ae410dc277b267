use std::fmt;

/// All error variants for redikit.
///
/// The crate adds no recovery of its own: driver and server errors are
/// surfaced verbatim and the caller decides whether to retry.
#[derive(Debug)]
pub enum Error {
    /// Transport or server error from the `redis` driver, unmodified.
    Redis(redis::RedisError),
    /// A script reply whose shape has no expected local representation
    /// (e.g. the scan-and-delete script returning neither an integer nor
    /// an array of key names).
    Reply(String),
}

impl Error {
    /// Create a reply-shape error from an unexpected protocol value.
    pub(crate) fn reply(context: &str, value: &redis::Value) -> Self {
        Self::Reply(format!("{context}: unexpected reply {value:?}"))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Redis(e) => write!(f, "redis error: {e}"),
            Self::Reply(msg) => write!(f, "reply error: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Redis(e) => Some(e),
            Self::Reply(_) => None,
        }
    }
}

impl From<redis::RedisError> for Error {
    fn from(e: redis::RedisError) -> Self {
        Self::Redis(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

// ── Tests ──────────────────────────────────────────────────────────
