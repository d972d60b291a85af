//! Scalar Record
//!
//! A payload stamped with its creation time and an optional time-to-live.

use bytes::Bytes;
use chrono::{DateTime, TimeDelta, Utc};
use std::time::Duration;

/// Value stored under a scalar key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub created_at: DateTime<Utc>,
    pub payload: Bytes,
    /// `None` marks a persistent record
    pub ttl: Option<Duration>,
}

impl Record {
    pub fn new(payload: Bytes, ttl: Option<Duration>) -> Self {
        Self {
            created_at: Utc::now(),
            payload,
            ttl,
        }
    }

    /// Moment the record expires, anchored at creation time.
    ///
    /// Returns `None` for persistent records and for TTLs too large to
    /// represent as a wall-clock instant.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let ttl = TimeDelta::from_std(self.ttl?).ok()?;
        self.created_at.checked_add_signed(ttl)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|at| now > at)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Seconds left before expiry; negative once expired but not yet swept
    pub fn remaining_secs_at(&self, now: DateTime<Utc>) -> Option<f64> {
        self.expires_at()
            .map(|at| (at - now).num_milliseconds() as f64 / 1000.0)
    }
}
