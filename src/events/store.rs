//! Capped in-memory event store.
//!
//! Holds the most recent events in arrival order together with the counter
//! aggregate. One lock guards both so that an append or a clear is observed
//! as a single step.

use std::collections::VecDeque;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use super::model::{NewSecurityEvent, SecurityEvent, SecurityMetrics};
use crate::error::{Result, ShieldError};

/// Default number of events retained.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Default `limit` for event reads.
pub const DEFAULT_QUERY_LIMIT: usize = 100;

/// Events returned alongside metrics in the combined read.
pub const OVERVIEW_EVENT_LIMIT: usize = 10;

#[derive(Debug, Default)]
struct StoreInner {
    events: VecDeque<SecurityEvent>,
    metrics: SecurityMetrics,
}

/// Thread-safe, capacity-bounded security event store.
#[derive(Debug)]
pub struct EventStore {
    inner: RwLock<StoreInner>,
    capacity: usize,
}

/// Metrics plus the newest events, read under one lock.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    /// Counter aggregate
    pub metrics: SecurityMetrics,
    /// Newest events first
    pub recent_events: Vec<SecurityEvent>,
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EventStore {
    /// Create a store with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a store retaining at most `capacity` events (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: RwLock::new(StoreInner {
                events: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY) + 1),
                metrics: SecurityMetrics::default(),
            }),
            capacity,
        }
    }

    /// Maximum number of retained events.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append an event, assigning its identifier and timestamp.
    ///
    /// Evicts the oldest event once capacity is exceeded.
    pub fn append(&self, event: NewSecurityEvent) -> Result<SecurityEvent> {
        let stored = SecurityEvent::stamp(event, Utc::now());

        {
            let mut inner = self.write()?;
            inner.events.push_back(stored.clone());
            inner.metrics.record(stored.event_type);

            while inner.events.len() > self.capacity {
                inner.events.pop_front();
            }
        }

        tracing::warn!(
            target: "shield::security",
            id = %stored.id,
            event_type = %stored.event_type,
            severity = %stored.severity,
            ip = %stored.ip,
            path = %stored.path,
            "SECURITY EVENT: {}",
            stored.reason
        );

        Ok(stored)
    }

    /// The newest `limit` events, newest first.
    pub fn query(&self, limit: usize) -> Result<Vec<SecurityEvent>> {
        let inner = self.read()?;
        Ok(newest_first(&inner.events, limit))
    }

    /// Copy of the counter aggregate.
    pub fn metrics(&self) -> Result<SecurityMetrics> {
        Ok(self.read()?.metrics)
    }

    /// Metrics and the newest `limit` events, consistent with each other.
    pub fn snapshot(&self, limit: usize) -> Result<StoreSnapshot> {
        let inner = self.read()?;
        Ok(StoreSnapshot {
            metrics: inner.metrics,
            recent_events: newest_first(&inner.events, limit),
        })
    }

    /// Drop every event and zero every counter.
    pub fn clear(&self) -> Result<()> {
        let mut inner = self.write()?;
        inner.events.clear();
        inner.metrics = SecurityMetrics::default();
        drop(inner);

        tracing::info!(target: "shield::security", "security events cleared");
        Ok(())
    }

    /// Number of retained events.
    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.events.len())
    }

    /// True when no events are retained.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreInner>> {
        self.inner
            .read()
            .map_err(|e| ShieldError::Store(format!("event store lock poisoned: {e}")))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreInner>> {
        self.inner
            .write()
            .map_err(|e| ShieldError::Store(format!("event store lock poisoned: {e}")))
    }
}

fn newest_first(events: &VecDeque<SecurityEvent>, limit: usize) -> Vec<SecurityEvent> {
    events.iter().rev().take(limit).cloned().collect()
}
