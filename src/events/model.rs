//! Security event records and aggregate counters.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ShieldError;

/// Classified event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// Request burst from a load-testing tool
    RateLimit,
    /// Scripted client or scraper
    BotDetected,
    /// SQL injection scanner
    SqlInjection,
    /// Cross-site scripting scanner
    XssAttempt,
    /// Credential brute-forcing tool
    BruteForce,
    /// Generic blocked request (manual injection only)
    Blocked,
}

impl EventType {
    /// All event types in display order.
    pub const ALL: [EventType; 6] = [
        EventType::RateLimit,
        EventType::BotDetected,
        EventType::SqlInjection,
        EventType::XssAttempt,
        EventType::BruteForce,
        EventType::Blocked,
    ];

    /// Wire name (`SQL_INJECTION`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::RateLimit => "RATE_LIMIT",
            EventType::BotDetected => "BOT_DETECTED",
            EventType::SqlInjection => "SQL_INJECTION",
            EventType::XssAttempt => "XSS_ATTEMPT",
            EventType::BruteForce => "BRUTE_FORCE",
            EventType::Blocked => "BLOCKED",
        }
    }

    /// Human-readable label used by the dashboard.
    pub fn label(&self) -> &'static str {
        match self {
            EventType::RateLimit => "Rate Limit",
            EventType::BotDetected => "Bot Detection",
            EventType::SqlInjection => "SQL Injection",
            EventType::XssAttempt => "XSS Attack",
            EventType::BruteForce => "Brute Force",
            EventType::Blocked => "Blocked",
        }
    }

    /// Severity assigned to automatic detections of this type.
    pub fn default_severity(&self) -> Severity {
        match self {
            EventType::SqlInjection => Severity::Critical,
            EventType::BruteForce | EventType::Blocked => Severity::High,
            EventType::XssAttempt | EventType::RateLimit => Severity::Medium,
            EventType::BotDetected => Severity::Low,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = ShieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase().replace('-', "_");
        EventType::ALL
            .into_iter()
            .find(|t| t.as_str() == upper)
            .ok_or_else(|| ShieldError::InvalidInput(format!("Unknown event type: {s}")))
    }
}

/// Event severity, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Informational
    Low,
    /// Worth a look
    Medium,
    /// Likely hostile
    High,
    /// Hostile and dangerous
    Critical,
}

impl Severity {
    /// All severities, most severe first.
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    /// Wire name (`CRITICAL`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ShieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Severity::ALL
            .into_iter()
            .find(|sev| sev.as_str() == upper)
            .ok_or_else(|| ShieldError::InvalidInput(format!("Unknown severity: {s}")))
    }
}

/// Event fields supplied by the classifier or an external caller.
///
/// Identifier and timestamp are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSecurityEvent {
    /// Event type
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Severity
    pub severity: Severity,
    /// Source address, unvalidated
    pub ip: String,
    /// Request path
    pub path: String,
    /// Free-text reason
    pub reason: String,
    /// Lower-cased User-Agent, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// HTTP method, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

impl NewSecurityEvent {
    /// Create an event with the type's default severity.
    pub fn new(
        event_type: EventType,
        ip: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            event_type,
            severity: event_type.default_severity(),
            ip: ip.into(),
            path: path.into(),
            reason: reason.into(),
            user_agent: None,
            method: None,
        }
    }

    /// Override severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Attach User-Agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Attach HTTP method
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }
}

/// A stored security event. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityEvent {
    /// Opaque identifier, `evt_<millis>_<suffix>`
    pub id: String,
    /// Event type
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Severity
    pub severity: Severity,
    /// Source address, unvalidated
    pub ip: String,
    /// Request path
    pub path: String,
    /// Creation time (UTC)
    pub timestamp: DateTime<Utc>,
    /// Free-text reason
    pub reason: String,
    /// Lower-cased User-Agent, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// HTTP method, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

impl SecurityEvent {
    /// Stamp a new event with an identifier and the given time.
    pub fn stamp(event: NewSecurityEvent, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: generate_event_id(timestamp),
            event_type: event.event_type,
            severity: event.severity,
            ip: event.ip,
            path: event.path,
            timestamp,
            reason: event.reason,
            user_agent: event.user_agent,
            method: event.method,
        }
    }
}

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 9;

fn generate_event_id(timestamp: DateTime<Utc>) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("evt_{}_{suffix}", timestamp.timestamp_millis())
}

/// Aggregate counters derived from the event stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityMetrics {
    /// Events recorded
    pub total_requests: u64,
    /// Events counted as blocked
    pub blocked_requests: u64,
    /// `RATE_LIMIT` events
    pub rate_limit_hits: u64,
    /// `BOT_DETECTED` events
    pub bot_detections: u64,
    /// `SQL_INJECTION` events
    pub sql_injection_attempts: u64,
    /// `XSS_ATTEMPT` events
    pub xss_attempts: u64,
    /// `BRUTE_FORCE` events
    pub brute_force_attempts: u64,
}

impl SecurityMetrics {
    /// Count one event of the given type.
    pub fn record(&mut self, event_type: EventType) {
        self.total_requests += 1;
        self.blocked_requests += 1;

        match event_type {
            EventType::RateLimit => self.rate_limit_hits += 1,
            EventType::BotDetected => self.bot_detections += 1,
            EventType::SqlInjection => self.sql_injection_attempts += 1,
            EventType::XssAttempt => self.xss_attempts += 1,
            EventType::BruteForce => self.brute_force_attempts += 1,
            EventType::Blocked => {},
        }
    }

    /// Per-type counter, `None` for types without one.
    pub fn count_for(&self, event_type: EventType) -> Option<u64> {
        match event_type {
            EventType::RateLimit => Some(self.rate_limit_hits),
            EventType::BotDetected => Some(self.bot_detections),
            EventType::SqlInjection => Some(self.sql_injection_attempts),
            EventType::XssAttempt => Some(self.xss_attempts),
            EventType::BruteForce => Some(self.brute_force_attempts),
            EventType::Blocked => None,
        }
    }

    /// Blocked share of all requests, as a percentage.
    pub fn block_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.blocked_requests as f64 / self.total_requests as f64 * 100.0
        }
    }

    /// True when every counter is zero.
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_wire_names() {
        let json = serde_json::to_string(&EventType::SqlInjection).unwrap();
        assert_eq!(json, "\"SQL_INJECTION\"");

        let parsed: EventType = serde_json::from_str("\"XSS_ATTEMPT\"").unwrap();
        assert_eq!(parsed, EventType::XssAttempt);

        for t in EventType::ALL {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json.trim_matches('"'), t.as_str());
        }
    }

    #[test]
    fn test_event_type_from_str() {
        assert_eq!("bot-detected".parse::<EventType>().unwrap(), EventType::BotDetected);
        assert_eq!("BRUTE_FORCE".parse::<EventType>().unwrap(), EventType::BruteForce);
        assert!("PORT_SCAN".parse::<EventType>().is_err());
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
        assert_eq!("critical".parse::<Severity>().unwrap(), Severity::Critical);
    }

    #[test]
    fn test_default_severity_map() {
        assert_eq!(EventType::SqlInjection.default_severity(), Severity::Critical);
        assert_eq!(EventType::BruteForce.default_severity(), Severity::High);
        assert_eq!(EventType::XssAttempt.default_severity(), Severity::Medium);
        assert_eq!(EventType::RateLimit.default_severity(), Severity::Medium);
        assert_eq!(EventType::BotDetected.default_severity(), Severity::Low);
    }

    #[test]
    fn test_event_serialization_shape() {
        let new = NewSecurityEvent::new(EventType::BruteForce, "10.0.0.1", "/sign-in", "hydra")
            .with_method("POST");
        let event = SecurityEvent::stamp(new, Utc::now());
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["type"], "BRUTE_FORCE");
        assert_eq!(value["severity"], "HIGH");
        assert_eq!(value["method"], "POST");
        assert!(value.get("userAgent").is_none());
        assert!(value["id"].as_str().unwrap().starts_with("evt_"));
    }

    #[test]
    fn test_new_event_requires_fields() {
        let missing_ip = r#"{"type":"BLOCKED","severity":"LOW","path":"/","reason":"x"}"#;
        assert!(serde_json::from_str::<NewSecurityEvent>(missing_ip).is_err());

        let ok = r#"{"type":"BLOCKED","severity":"LOW","ip":"1.2.3.4","path":"/","reason":"x","userAgent":"curl/8"}"#;
        let parsed: NewSecurityEvent = serde_json::from_str(ok).unwrap();
        assert_eq!(parsed.user_agent.as_deref(), Some("curl/8"));
    }

    #[test]
    fn test_event_id_format() {
        let event = SecurityEvent::stamp(
            NewSecurityEvent::new(EventType::Blocked, "ip", "/", "r"),
            Utc::now(),
        );
        let parts: Vec<&str> = event.id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "evt");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), ID_SUFFIX_LEN);
    }

    #[test]
    fn test_metrics_record() {
        let mut metrics = SecurityMetrics::default();
        metrics.record(EventType::SqlInjection);
        metrics.record(EventType::SqlInjection);
        metrics.record(EventType::Blocked);

        assert_eq!(metrics.total_requests, 3);
        assert_eq!(metrics.blocked_requests, 3);
        assert_eq!(metrics.sql_injection_attempts, 2);
        assert_eq!(metrics.count_for(EventType::Blocked), None);
        assert!((metrics.block_rate() - 100.0).abs() < f64::EPSILON);
        assert!(!metrics.is_zero());
    }

    #[test]
    fn test_metrics_wire_names() {
        let value = serde_json::to_value(SecurityMetrics::default()).unwrap();
        for key in [
            "totalRequests",
            "blockedRequests",
            "rateLimitHits",
            "botDetections",
            "sqlInjectionAttempts",
            "xssAttempts",
            "bruteForceAttempts",
        ] {
            assert_eq!(value[key], 0, "missing {key}");
        }
    }
}
