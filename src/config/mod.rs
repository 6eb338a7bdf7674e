//! Configuration management.
//!
//! Supports configuration from:
//! - TOML config files (`--config`, or `folio-shield/config.toml` under the
//!   platform config directory)
//! - Environment variables
//! - CLI arguments (applied by the binary last)

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::chat::{UpstreamConfig, DEFAULT_MODEL, DEFAULT_UPSTREAM_URL};
use crate::dashboard::PollerConfig;
use crate::error::{Result, ShieldError};
use crate::events::DEFAULT_CAPACITY;
use crate::server::ServerConfig;

/// Directory name under the platform config directory.
const APP_DIR: &str = "folio-shield";

/// Main configuration struct
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerSection,

    /// Event store configuration
    #[serde(default)]
    pub store: StoreSection,

    /// Chat responder configuration
    #[serde(default)]
    pub chat: ChatSection,

    /// Dashboard client configuration
    #[serde(default)]
    pub dashboard: DashboardSection,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ShieldError::Config(format!("Failed to read config file {}: {e}", path.display()))
        })?;

        toml::from_str(&content)
            .map_err(|e| ShieldError::Config(format!("Failed to parse config: {e}")))
    }

    /// Default config file location, if the platform has a config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(APP_DIR).join("config.toml"))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// File (explicit or default location), then environment overrides.
    ///
    /// An explicit path must exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(path) => {
                    tracing::debug!("Loading config from {}", path.display());
                    Self::from_file(path)?
                },
                None => Self::default(),
            },
        };
        config.apply_env();
        Ok(config)
    }

    /// Apply environment overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply environment overrides from an arbitrary lookup.
    ///
    /// Unparseable numeric values are ignored.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Server settings
        if let Some(host) = lookup("SHIELD_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SHIELD_PORT").and_then(|v| v.parse().ok()) {
            self.server.port = port;
        }

        // Store settings
        if let Some(capacity) = lookup("SHIELD_STORE_CAPACITY").and_then(|v| v.parse().ok()) {
            self.store.capacity = capacity;
        }

        // Chat settings
        if let Some(url) = lookup("SHIELD_CHAT_UPSTREAM") {
            self.chat.upstream = url;
        }
        if let Some(model) = lookup("SHIELD_CHAT_MODEL") {
            self.chat.model = model;
        }
        if let Some(key) = lookup("GROQ_API_KEY").filter(|k| !k.trim().is_empty()) {
            self.chat.api_key = Some(key);
        }

        // Dashboard settings
        if let Some(url) = lookup("SHIELD_DASHBOARD_URL") {
            self.dashboard.url = url;
        }
    }

    /// Server configuration derived from the `[server]`, `[store]` and `[chat]` sections
    pub fn server_config(&self) -> Result<ServerConfig> {
        let addr = self.server.listen_addr()?;
        let mut server = ServerConfig::default()
            .with_addr(addr)
            .with_store_capacity(self.store.capacity)
            .with_max_body_size(self.server.max_body_size);

        if !self.server.detection {
            server = server.without_detection();
        }
        if !self.server.cors {
            server = server.without_cors();
        }
        if !self.server.logging {
            server = server.without_logging();
        }
        if let Some(upstream) = self.chat.upstream_config() {
            server = server.with_chat_upstream(upstream);
        }
        Ok(server)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Maximum request body size in bytes
    pub max_body_size: usize,

    /// Run the User-Agent detector on incoming requests
    pub detection: bool,

    /// Allow cross-origin requests
    pub cors: bool,

    /// Emit per-request trace spans
    pub logging: bool,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            max_body_size: 1024 * 1024, // 1 MB
            detection: true,
            cors: true,
            logging: true,
        }
    }
}

impl ServerSection {
    /// Get the full listen address
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|e| ShieldError::Config(format!("Invalid host '{}': {e}", self.host)))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Event store configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    /// Events retained before the oldest are evicted
    pub capacity: usize,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Chat responder configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSection {
    /// OpenAI-compatible base URL
    pub upstream: String,

    /// Model identifier
    pub model: String,

    /// Inference credential; without one only the keyword table answers
    pub api_key: Option<String>,

    /// Completion token limit
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ChatSection {
    fn default() -> Self {
        Self {
            upstream: DEFAULT_UPSTREAM_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            max_tokens: 300,
            temperature: 0.7,
            timeout_secs: 30,
        }
    }
}

impl ChatSection {
    /// Upstream configuration, present only when a credential is set
    pub fn upstream_config(&self) -> Option<UpstreamConfig> {
        let key = self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())?;

        let mut upstream = UpstreamConfig::new(key)
            .with_base_url(self.upstream.clone())
            .with_model(self.model.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs));
        upstream.max_tokens = self.max_tokens;
        upstream.temperature = self.temperature;
        Some(upstream)
    }
}

/// Dashboard client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSection {
    /// Base URL of the server to poll
    pub url: String,

    /// Seconds between refreshes
    pub interval_secs: u64,

    /// Events fetched per refresh
    pub event_limit: usize,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for DashboardSection {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:3000".to_string(),
            interval_secs: 5,
            event_limit: 50,
            timeout_secs: 5,
        }
    }
}

impl DashboardSection {
    /// Poller settings
    pub fn poller_config(&self) -> PollerConfig {
        PollerConfig {
            interval: Duration::from_secs(self.interval_secs.max(1)),
            event_limit: self.event_limit,
        }
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.store.capacity, 1000);
        assert_eq!(config.chat.model, "llama-3.3-70b-versatile");
        assert!(config.chat.api_key.is_none());
        assert_eq!(config.dashboard.interval_secs, 5);
    }

    #[test]
    fn test_listen_addr() {
        let section = ServerSection::default();
        assert_eq!(section.listen_addr().unwrap().to_string(), "127.0.0.1:3000");

        let bad = ServerSection {
            host: "not-an-ip".to_string(),
            ..Default::default()
        };
        assert!(matches!(bad.listen_addr(), Err(ShieldError::Config(_))));
    }

    #[test]
    fn test_config_from_toml() {
        let toml = r#"
            [server]
            host = "0.0.0.0"
            port = 8080
            cors = false

            [store]
            capacity = 250

            [chat]
            model = "llama-3.1-8b-instant"
            api_key = "gsk_test"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert!(!config.server.cors);
        assert!(config.server.detection);
        assert_eq!(config.store.capacity, 250);
        assert_eq!(config.chat.upstream, DEFAULT_UPSTREAM_URL);
        assert_eq!(config.dashboard, DashboardSection::default());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[store]\ncapacity = 42\n\n[dashboard]\ninterval_secs = 2").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.store.capacity, 42);
        assert_eq!(config.dashboard.interval_secs, 2);
        assert_eq!(config.server, ServerSection::default());
    }

    #[test]
    fn test_from_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(Config::from_file(&missing), Err(ShieldError::Config(_))));
        assert!(Config::load(Some(&missing)).is_err());

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[store\ncapacity = ").unwrap();
        assert!(matches!(Config::from_file(&bad), Err(ShieldError::Config(_))));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_env_from(env(&[
            ("SHIELD_HOST", "0.0.0.0"),
            ("SHIELD_PORT", "9090"),
            ("SHIELD_STORE_CAPACITY", "not-a-number"),
            ("SHIELD_CHAT_MODEL", "mixtral"),
            ("GROQ_API_KEY", "gsk_env"),
            ("SHIELD_DASHBOARD_URL", "http://10.0.0.5:3000"),
        ]));

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.store.capacity, DEFAULT_CAPACITY);
        assert_eq!(config.chat.model, "mixtral");
        assert_eq!(config.chat.api_key.as_deref(), Some("gsk_env"));
        assert_eq!(config.dashboard.url, "http://10.0.0.5:3000");
    }

    #[test]
    fn test_blank_api_key_ignored() {
        let mut config = Config::default();
        config.apply_env_from(env(&[("GROQ_API_KEY", "  ")]));
        assert!(config.chat.api_key.is_none());
        assert!(config.chat.upstream_config().is_none());
    }

    #[test]
    fn test_upstream_config() {
        let chat = ChatSection {
            api_key: Some("gsk_x".to_string()),
            max_tokens: 128,
            timeout_secs: 3,
            ..Default::default()
        };
        let upstream = chat.upstream_config().unwrap();
        assert_eq!(upstream.api_key, "gsk_x");
        assert_eq!(upstream.max_tokens, 128);
        assert_eq!(upstream.timeout, Duration::from_secs(3));
        assert_eq!(upstream.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_server_config() {
        let mut config = Config::default();
        config.server.port = 4000;
        config.server.detection = false;
        config.store.capacity = 10;

        let server = config.server_config().unwrap();
        assert_eq!(server.addr.port(), 4000);
        assert!(!server.detection_enabled);
        assert!(server.cors_enabled);
        assert_eq!(server.store_capacity, 10);
        assert!(server.chat_upstream.is_none());
    }

    #[test]
    fn test_poller_config() {
        let section = DashboardSection {
            interval_secs: 0,
            ..Default::default()
        };
        let poller = section.poller_config();
        assert_eq!(poller.interval, Duration::from_secs(1));
        assert_eq!(poller.event_limit, 50);
    }
}
