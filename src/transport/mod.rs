pub mod fake;
pub mod socket;

pub use fake::FakeTransport;
pub use socket::UnixSocketTransport;

use thiserror::Error;

/// Outcome of a failed remote call, classified at the call boundary. The
/// reporter only ever matches on this to pick a log line; nothing is retried.
#[derive(Error, Debug)]
pub enum CallError {
    /// The peer did not answer within the channel deadline.
    #[error("call timed out: {0}")]
    Timeout(String),

    /// The channel itself is unreachable.
    #[error("transport connection failed: {0}")]
    Connection(String),

    /// The caller supplied a malformed method name or payload.
    #[error("invalid call argument: {0}")]
    InvalidArgument(String),

    /// Anything the other kinds do not cover.
    #[error("unexpected transport error: {0}")]
    Other(String),
}

/// One-shot remote invocation: a method name and a serialized payload, no
/// return value.
pub trait Transport {
    fn call(&mut self, method: &str, payload: &str) -> Result<(), CallError>;
}
