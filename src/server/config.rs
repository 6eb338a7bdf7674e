//! Server configuration.

use std::net::{Ipv4Addr, SocketAddr};

use crate::chat::UpstreamConfig;
use crate::events::DEFAULT_CAPACITY;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub addr: SocketAddr,
    /// Run the User-Agent detector on incoming requests
    pub detection_enabled: bool,
    /// Events retained by the store
    pub store_capacity: usize,
    /// Maximum request body size (bytes)
    pub max_body_size: usize,
    /// Enable request logging
    pub logging: bool,
    /// CORS enabled
    pub cors_enabled: bool,
    /// Chat inference upstream (optional)
    pub chat_upstream: Option<UpstreamConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 3000)),
            detection_enabled: true,
            store_capacity: DEFAULT_CAPACITY,
            max_body_size: 1024 * 1024, // 1MB
            logging: true,
            cors_enabled: true,
            chat_upstream: None,
        }
    }
}

impl ServerConfig {
    /// Create with custom port
    pub fn with_port(mut self, port: u16) -> Self {
        self.addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
        self
    }

    /// Bind to all interfaces
    pub fn bind_all(mut self) -> Self {
        self.addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.addr.port()));
        self
    }

    /// Set address directly
    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    /// Disable User-Agent detection
    pub fn without_detection(mut self) -> Self {
        self.detection_enabled = false;
        self
    }

    /// Set store capacity
    pub fn with_store_capacity(mut self, capacity: usize) -> Self {
        self.store_capacity = capacity;
        self
    }

    /// Answer chat through an inference upstream
    pub fn with_chat_upstream(mut self, upstream: UpstreamConfig) -> Self {
        self.chat_upstream = Some(upstream);
        self
    }

    /// Set max body size
    pub fn with_max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = size;
        self
    }

    /// Disable logging
    pub fn without_logging(mut self) -> Self {
        self.logging = false;
        self
    }

    /// Disable CORS
    pub fn without_cors(mut self) -> Self {
        self.cors_enabled = false;
        self
    }
}
