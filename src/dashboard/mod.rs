//! Security dashboard: summaries, polling, and rendering.
//!
//! The dashboard reads from the reporting API like any other client. It
//! fetches the newest events and the counter aggregate, derives the figures
//! shown on screen, and repeats on a fixed interval.
//!
//! # Derived Figures
//!
//! | Figure              | Source                                         |
//! |---------------------|------------------------------------------------|
//! | Top sources         | 5 most frequent `ip` values in the window      |
//! | Most targeted paths | 5 most frequent `path` values in the window    |
//! | Severity            | Tally of `severity` in the window              |
//! | Attack types        | Per-type counters from metrics                 |
//! | Block rate          | `blockedRequests / totalRequests`              |
//! | Risk score          | `blockRate + 5 * critical`, clamped to 0-100   |
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use shield::dashboard::{DashboardPoller, PollerConfig, ReportingClient};
//!
//! let client = ReportingClient::new("http://127.0.0.1:3000", Duration::from_secs(5))?;
//! let poller = Arc::new(DashboardPoller::new(client, PollerConfig::default()));
//! let handle = poller.clone().spawn();
//!
//! handle.refresh_now();
//! // ...
//! handle.stop().await;
//! ```

mod client;
mod playbook;
mod poller;
mod render;
mod summary;

pub use client::{ReportingClient, REPORTING_PATH};
pub use playbook::{
    AttackVector, ChecklistStep, Playbook, RemediationItem, RemediationStatus, RiskAssessment,
    ATTACK_VECTORS, INCIDENT_CHECKLIST, PLAYBOOK, REMEDIATION_BACKLOG, RISK_ASSESSMENT,
};
pub use poller::{DashboardPoller, PollerConfig, PollerHandle};
pub use render::render_text;
pub use summary::{
    risk_score, top_counts, AttackTypeCount, DashboardSummary, RankedCount,
    SeverityDistribution, ThreatLevel, TOP_N,
};
