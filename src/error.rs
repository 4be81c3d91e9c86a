use std::io;

use thiserror::Error;

/// Errors produced by building, compiling, searching, and (de)serializing
/// an [`crate::AhoCorasick`].
#[derive(Debug, Error)]
pub enum AutomatonError {
    /// `add`/`set` was called with an empty key, or a key of an unsupported
    /// shape.
    #[error("key is empty or otherwise invalid")]
    InvalidKey,

    /// `add`/`set` was called after `compile()`.
    #[error("cannot mutate an automaton after compile()")]
    AlreadyCompiled,

    /// A search or `write` was attempted before `compile()`.
    #[error("automaton has not been compiled yet")]
    NotCompiled,

    /// `get` was called with a key that was never inserted.
    #[error("key not found")]
    KeyNotFound,

    /// `write` encountered a payload that cannot be represented as the
    /// integer-only persisted format.
    #[error("payload is not representable in the serialized format")]
    PayloadWriteError,

    /// A mapped file was truncated, carried the wrong magic/version, or
    /// referenced an out-of-bounds offset.
    #[error("invalid or corrupt serialized image: {0}")]
    InvalidImage(&'static str),

    /// An operation was attempted on a [`crate::mapped::Mapped`] view after
    /// it was closed.
    #[error("mapped view is closed")]
    Closed,

    /// An underlying OS error occurred while reading or writing a file.
    #[error("I/O error: {0}")]
    IOError(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, AutomatonError>;
