//! Folio Shield HTTP server.
//!
//! Provides the HTTP surface of the pipeline:
//! - Request-time scanner detection (middleware on every non-asset route)
//! - Reporting API (`/api/security`) for reads, injection and clearing
//! - Dashboard summary and playbook endpoints
//! - Guarded portfolio chat (`/api/chat`)
//!
//! # Example
//!
//! ```rust,ignore
//! use shield::server::{ServerConfig, ShieldServer};
//!
//! let config = ServerConfig::default().with_port(8080);
//! let server = ShieldServer::new(config);
//! server.run().await?;
//! ```

mod app;
mod config;
mod error;
mod handlers;
mod middleware;
mod state;

pub use app::ShieldServer;
pub use config::ServerConfig;
pub use error::{ApiError, ErrorResponse};
pub use handlers::{
    create_router, health_check, ChatResponse, HealthResponse, SecurityQuery, StatusResponse,
    SummaryQuery, SUMMARY_EVENT_LIMIT,
};
pub use middleware::{client_address, detect_scanners, is_static_asset};
pub use state::AppState;
