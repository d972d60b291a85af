//! In-Memory Key-Value Store
//!
//! Three tables (scalar records, sets, sorted sets) behind one store-wide
//! read-write lock. Collections carry no lock of their own.
//!
//! Reads never check expiration: a logically expired record stays visible
//! until the next sweep pass removes it, so staleness is bounded by the
//! sweep interval.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use hashbrown::hash_map::Entry;
use hashbrown::HashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;

use super::{OrderedSet, Record, UnorderedSet};
use crate::error::{Result, StoreError};

#[derive(Debug, Default)]
pub(super) struct Tables {
    pub(super) records: HashMap<String, Record>,
    pub(super) sets: HashMap<String, UnorderedSet>,
    pub(super) ordered_sets: HashMap<String, OrderedSet>,
}

/// Thread-safe store handle; clones share the same tables
#[derive(Debug, Clone, Default)]
pub struct Store {
    pub(super) inner: Arc<RwLock<Tables>>,
}

impl Store {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a key is present (expired-but-unswept keys included)
    pub fn exists(&self, key: &str) -> bool {
        self.inner.read().records.contains_key(key)
    }

    /// Store a record with a time-to-live; `None` makes it persistent.
    /// Never overwrites an existing key.
    pub fn set_ex(
        &self,
        key: impl Into<String>,
        payload: impl Into<Bytes>,
        ttl: Option<Duration>,
    ) -> Result<()> {
        let mut tables = self.inner.write();
        match tables.records.entry(key.into()) {
            Entry::Occupied(entry) => Err(StoreError::KeyExists(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(Record::new(payload.into(), ttl));
                Ok(())
            }
        }
    }

    /// Store a persistent record
    pub fn set(&self, key: impl Into<String>, payload: impl Into<Bytes>) -> Result<()> {
        self.set_ex(key, payload, None)
    }

    pub fn get(&self, key: &str) -> Result<Bytes> {
        self.inner
            .read()
            .records
            .get(key)
            .map(|record| record.payload.clone())
            .ok_or_else(|| StoreError::KeyNotExists(key.to_string()))
    }

    /// Fetch several keys at once; absent keys yield `None` in place
    pub fn mget<K: AsRef<str>>(&self, keys: &[K]) -> Vec<Option<Bytes>> {
        let tables = self.inner.read();
        keys.iter()
            .map(|key| tables.records.get(key.as_ref()).map(|r| r.payload.clone()))
            .collect()
    }

    pub fn del(&self, key: &str) -> Result<()> {
        self.inner
            .write()
            .records
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StoreError::KeyNotExists(key.to_string()))
    }

    /// Replace the time-to-live of a key. The deadline stays anchored at
    /// the record's creation time, not at the time of this call.
    pub fn expire(&self, key: &str, ttl: Option<Duration>) -> Result<()> {
        let mut tables = self.inner.write();
        let record = tables
            .records
            .get_mut(key)
            .ok_or_else(|| StoreError::KeyNotExists(key.to_string()))?;
        record.ttl = ttl;
        Ok(())
    }

    /// Make a key persistent
    pub fn persist(&self, key: &str) -> Result<()> {
        self.expire(key, None)
    }

    /// All key names, in no particular order
    pub fn keys(&self) -> Vec<String> {
        self.inner.read().records.keys().cloned().collect()
    }

    /// Expiry instant of a key, `None` when it is persistent
    pub fn expire_time(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        self.inner
            .read()
            .records
            .get(key)
            .map(Record::expires_at)
            .ok_or_else(|| StoreError::KeyNotExists(key.to_string()))
    }

    /// Seconds until expiry, `None` when persistent. Negative when the key
    /// has expired but has not been swept yet.
    pub fn ttl(&self, key: &str) -> Result<Option<f64>> {
        let now = Utc::now();
        self.inner
            .read()
            .records
            .get(key)
            .map(|record| record.remaining_secs_at(now))
            .ok_or_else(|| StoreError::KeyNotExists(key.to_string()))
    }

    /// Number of records (including expired ones not yet swept)
    pub fn len(&self) -> usize {
        self.inner.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove expired records, returns count of removed records
    pub fn cleanup_expired(&self) -> usize {
        let now = Utc::now();
        let mut tables = self.inner.write();
        let before = tables.records.len();
        tables.records.retain(|_, record| !record.is_expired_at(now));
        before - tables.records.len()
    }
}
