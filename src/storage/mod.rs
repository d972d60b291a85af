//! Storage Engine
//!
//! In-memory tables of expiring records, sets and sorted sets, plus the
//! background sweep that expires records.

mod collection;
mod collections;
mod rbtree;
mod record;
mod set;
mod store;
mod sweep;
mod zset;

pub use collection::Collection;
pub use rbtree::{Iter, OrderedTree};
pub use record::Record;
pub use set::UnorderedSet;
pub use store::Store;
pub use sweep::{
    ExpirationSweeper, SweeperHandle, DEFAULT_SWEEP_INTERVAL, MIN_SWEEP_INTERVAL,
};
pub use zset::OrderedSet;
