//! In-memory connection fake for dispatcher unit tests.
//!
//! Scripts a sequence of (expected argv, canned reply) pairs and asserts
//! that the dispatcher sends exactly the command words it should, without
//! needing a server.

use std::collections::VecDeque;

use redis::aio::ConnectionLike;
use redis::{Arg, Cmd, Pipeline, RedisFuture, Value};

pub(crate) struct FakeConnection {
    expected: VecDeque<(Vec<Vec<u8>>, Value)>,
}

impl FakeConnection {
    pub(crate) fn new() -> Self {
        Self {
            expected: VecDeque::new(),
        }
    }

    /// Queue an expected command (as argv words) and the reply to answer it with.
    pub(crate) fn expect(mut self, argv: &[&str], reply: Value) -> Self {
        self.expected
            .push_back((argv.iter().map(|s| s.as_bytes().to_vec()).collect(), reply));
        self
    }

    /// True when every queued expectation has been consumed.
    pub(crate) fn finished(&self) -> bool {
        self.expected.is_empty()
    }
}

impl ConnectionLike for FakeConnection {
    fn req_packed_command<'a>(&'a mut self, cmd: &'a Cmd) -> RedisFuture<'a, Value> {
        let argv = argv_of(cmd);
        let (want, reply) = self
            .expected
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected command: {:?}", printable(&argv)));
        Box::pin(async move {
            assert_eq!(
                printable(&argv),
                printable(&want),
                "dispatched command differs from expectation"
            );
            Ok(reply)
        })
    }

    fn req_packed_commands<'a>(
        &'a mut self,
        _pipeline: &'a Pipeline,
        _offset: usize,
        _count: usize,
    ) -> RedisFuture<'a, Vec<Value>> {
        panic!("the dispatcher never issues pipelines");
    }

    fn get_db(&self) -> i64 {
        0
    }
}

fn argv_of(cmd: &Cmd) -> Vec<Vec<u8>> {
    cmd.args_iter()
        .map(|arg| match arg {
            Arg::Simple(bytes) => bytes.to_vec(),
            Arg::Cursor => b"0".to_vec(),
        })
        .collect()
}

fn printable(argv: &[Vec<u8>]) -> Vec<String> {
    argv.iter()
        .map(|word| String::from_utf8_lossy(word).into_owned())
        .collect()
}

// ── Reply constructors ─────────────────────────────────────────────

pub(crate) fn bulk(s: &str) -> Value {
    Value::BulkString(s.as_bytes().to_vec())
}

pub(crate) fn bulk_array(items: &[&str]) -> Value {
    Value::Array(items.iter().map(|s| bulk(s)).collect())
}
