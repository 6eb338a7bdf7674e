//! Security events and their in-memory store.
//!
//! Events come from two places: the detection middleware, which classifies
//! inbound User-Agents, and the reporting API's write endpoint, which accepts
//! manually injected events. Both go through [`EventStore::append`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use shield::events::{EventStore, EventType, NewSecurityEvent};
//!
//! let store = EventStore::new();
//! store.append(NewSecurityEvent::new(EventType::SqlInjection, "10.0.0.7", "/api", "sqlmap"))?;
//!
//! let recent = store.query(10)?;
//! let metrics = store.metrics()?;
//! assert_eq!(metrics.sql_injection_attempts, 1);
//! ```

mod model;
mod store;

pub use model::{EventType, NewSecurityEvent, SecurityEvent, SecurityMetrics, Severity};
pub use store::{
    EventStore, StoreSnapshot, DEFAULT_CAPACITY, DEFAULT_QUERY_LIMIT, OVERVIEW_EVENT_LIMIT,
};
