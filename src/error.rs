//! Error Types
//!
//! Typed failures of the storage engine and of the line protocol.

use std::io;
use thiserror::Error;

/// Result type alias for storage operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Failures signalled by `Store`, `UnorderedSet` and `OrderedSet`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Write attempted against an occupied key
    #[error("the key {0} already exists")]
    KeyExists(String),

    /// Read, update or delete against an absent key
    #[error("the key {0} does not exist")]
    KeyNotExists(String),

    /// Read against a set or sorted set that was never created
    #[error("the set {0} does not exist")]
    CollectionNotExists(String),

    /// Removal of an element that is not in the set
    #[error("the element {0} does not exist in set")]
    ElementNotExists(String),
}

/// Failures while framing or parsing request lines
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("connection error: {0}")]
    Io(#[from] io::Error),

    #[error("line exceeds {max} bytes")]
    LineTooLong { max: usize },

    #[error("request line is not valid UTF-8")]
    InvalidUtf8,

    #[error("empty command")]
    Empty,

    #[error("invalid command {0}")]
    UnknownCommand(String),

    #[error("wrong number of arguments for {0}")]
    WrongArity(&'static str),

    #[error("value is not an integer: {0}")]
    InvalidInteger(String),

    #[error("invalid expire time {0}")]
    InvalidExpire(i64),
}
