//! Server state.

use std::sync::Arc;
use std::time::{Duration, Instant};

use super::config::ServerConfig;
use crate::chat::ChatService;
use crate::events::EventStore;
use crate::security::HeuristicClassifier;

/// Application state shared across handlers
#[derive(Debug)]
pub struct AppState {
    /// Server configuration
    pub config: ServerConfig,
    /// Event store
    pub store: Arc<EventStore>,
    /// User-Agent classifier
    pub classifier: HeuristicClassifier,
    /// Chat responder
    pub chat: ChatService,
    /// Server start time
    pub start_time: Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(config: ServerConfig) -> Self {
        let store = Arc::new(EventStore::with_capacity(config.store_capacity));
        let chat = ChatService::from_config(config.chat_upstream.clone());
        Self::with_parts(config, store, chat)
    }

    /// Create state around an existing store and chat responder
    pub fn with_parts(config: ServerConfig, store: Arc<EventStore>, chat: ChatService) -> Self {
        let classifier = if config.detection_enabled {
            HeuristicClassifier::new()
        } else {
            HeuristicClassifier::disabled()
        };

        Self {
            config,
            store,
            classifier,
            chat,
            start_time: Instant::now(),
        }
    }

    /// Get server uptime
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }
}
