//! tandb - In-Memory Key-Value Store
//!
//! Expiring scalar records, unordered sets and sorted sets (backed by a
//! red-black tree), served over a newline-delimited text protocol.

pub mod error;
pub mod metrics;
pub mod protocol;
pub mod server;
pub mod storage;

pub use error::{ProtocolError, Result, StoreError};
pub use metrics::Metrics;
pub use protocol::{Command, LineCodec, Response};
pub use server::{Config, Server};
pub use storage::{
    Collection, ExpirationSweeper, OrderedSet, OrderedTree, Store, SweeperHandle, UnorderedSet,
};
