//! # Folio Shield - Portfolio Security-Event Pipeline
//!
//! Labels suspicious traffic to a personal portfolio site, keeps a bounded
//! in-memory log of what it saw, and reports it to a dashboard. A guarded
//! chat endpoint answers questions about the portfolio owner.
//!
//! ## Features
//!
//! - **Scanner detection**: ordered User-Agent rules, first match wins
//! - **Event store**: capped FIFO log (1000 events) plus running counters
//! - **Reporting API**: read events/metrics, inject test events, clear
//! - **Dashboard**: top sources and paths, severity mix, risk score
//! - **Guarded chat**: prompt-injection refusal, optional inference
//!   upstream, keyword fallback
//!
//! ## Pipeline
//!
//! ```text
//!  request ──> detect_scanners ──> HeuristicClassifier ──> EventStore
//!                  │                                          │
//!                  v                                          v
//!              handlers                             GET /api/security
//!                                                            │
//!                                                            v
//!                                                  DashboardPoller (5s)
//! ```
//!
//! Detection is labeling only: no request is ever blocked or altered.
//!
//! ### Scanner Rules
//!
//! | Order | User-Agent contains        | Event type      | Severity |
//! |-------|----------------------------|-----------------|----------|
//! | 1     | `sqlmap`                   | `SQL_INJECTION` | CRITICAL |
//! | 2     | `hydra`                    | `BRUTE_FORCE`   | HIGH     |
//! | 3     | `xss` and `ser`            | `XSS_ATTEMPT`   | MEDIUM   |
//! | 4     | `apachebench` or `ab/`     | `RATE_LIMIT`    | MEDIUM   |
//! | 5     | `python` and `requests`    | `BOT_DETECTED`  | LOW      |
//!
//! ### Reporting API
//!
//! | Request                                   | Response                         |
//! |-------------------------------------------|----------------------------------|
//! | `GET /api/security?type=metrics`          | Counter aggregate                |
//! | `GET /api/security?type=events&limit=N`   | Newest events first, at most N   |
//! | `GET /api/security`                       | Metrics plus 10 newest events    |
//! | `POST /api/security` `{"clear": true}`    | `{"ok": true}`                   |
//! | `POST /api/security` event fields         | Stored event with id, timestamp  |
//!
//! ## Quick Start
//!
//! ### Classification Only
//!
//! ```rust
//! use shield::{EventType, HeuristicClassifier};
//!
//! let classifier = HeuristicClassifier::new();
//! assert_eq!(
//!     classifier.classify(Some("sqlmap/1.7.2#stable (https://sqlmap.org)")),
//!     Some(EventType::SqlInjection)
//! );
//! assert_eq!(classifier.classify(Some("Mozilla/5.0")), None);
//! ```
//!
//! ### Event Store
//!
//! ```rust
//! use shield::{EventStore, EventType, NewSecurityEvent};
//!
//! let store = EventStore::new();
//! store
//!     .append(NewSecurityEvent::new(EventType::BruteForce, "203.0.113.4", "/sign-in", "test"))
//!     .unwrap();
//!
//! let metrics = store.metrics().unwrap();
//! assert_eq!(metrics.total_requests, 1);
//! assert_eq!(metrics.brute_force_attempts, 1);
//! ```
//!
//! ### Server
//!
//! ```rust,ignore
//! use shield::server::{ServerConfig, ShieldServer};
//!
//! let server = ShieldServer::new(ServerConfig::default().with_port(3000));
//! server.run().await?;
//! ```
//!
//! ## Modules
//!
//! - [`events`]: Event model, metrics and the capped store
//! - [`security`]: Scanner rules, classifier and prompt-injection patterns
//! - [`chat`]: Guarded portfolio chat with keyword fallback
//! - [`dashboard`]: Reporting client, poller, summary and rendering
//! - [`server`]: HTTP server, detection middleware and handlers
//! - [`config`]: TOML and environment configuration
//! - [`error`]: Error types

pub mod chat;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod events;
pub mod security;
pub mod server;

// Re-exports for convenience
pub use chat::{ChatReply, ChatService, ReplySource};
pub use config::Config;
pub use dashboard::{DashboardPoller, DashboardSummary, ReportingClient};
pub use error::{Result, ShieldError};
pub use events::{
    EventStore, EventType, NewSecurityEvent, SecurityEvent, SecurityMetrics, Severity,
};
pub use security::{HeuristicClassifier, RequestInfo};
pub use server::{AppState, ServerConfig, ShieldServer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
