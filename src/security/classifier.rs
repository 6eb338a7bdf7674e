//! Heuristic request classifier.
//!
//! Turns request metadata into at most one [`NewSecurityEvent`]. Pure; the
//! caller decides whether to store the result.

use super::rules::{first_match, UserAgentRule};
use crate::events::{EventType, NewSecurityEvent};

/// Characters of the User-Agent quoted in the event reason.
const REASON_UA_CHARS: usize = 40;

/// Source address used when none can be determined.
pub const UNKNOWN_SOURCE: &str = "unknown";

/// Request metadata the classifier looks at.
#[derive(Debug, Clone, Default)]
pub struct RequestInfo<'a> {
    /// Raw User-Agent header, if present and valid UTF-8
    pub user_agent: Option<&'a str>,
    /// Client address (forwarded-for or peer)
    pub ip: Option<&'a str>,
    /// Request path
    pub path: &'a str,
    /// HTTP method
    pub method: &'a str,
}

/// Outcome of classifying one request.
#[derive(Debug, Clone)]
pub struct Detection {
    /// Rule that fired
    pub rule: &'static UserAgentRule,
    /// Event to record
    pub event: NewSecurityEvent,
}

/// User-Agent heuristic classifier
#[derive(Debug, Clone)]
pub struct HeuristicClassifier {
    /// Classification enabled
    pub enabled: bool,
}

impl Default for HeuristicClassifier {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl HeuristicClassifier {
    /// Create new classifier with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifier that never reports anything
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    /// Event type for a User-Agent, first matching rule wins.
    pub fn classify(&self, user_agent: Option<&str>) -> Option<EventType> {
        if !self.enabled {
            return None;
        }
        let ua = user_agent?.to_lowercase();
        first_match(&ua).map(|rule| rule.event_type)
    }

    /// Classify a request and build the event to record.
    pub fn detect(&self, request: &RequestInfo<'_>) -> Option<Detection> {
        if !self.enabled {
            return None;
        }

        let ua = request.user_agent?.to_lowercase();
        let rule = first_match(&ua)?;

        let quoted: String = ua.chars().take(REASON_UA_CHARS).collect();
        let ip = request
            .ip
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
            .unwrap_or(UNKNOWN_SOURCE);

        let event = NewSecurityEvent::new(
            rule.event_type,
            ip,
            request.path,
            format!("detected scanner via User-Agent ({quoted})"),
        )
        .with_user_agent(ua.clone())
        .with_method(request.method);

        Some(Detection { rule, event })
    }
}

/// First address in an `X-Forwarded-For` value.
pub fn forwarded_client(header: &str) -> Option<&str> {
    header
        .split(',')
        .map(str::trim)
        .find(|entry| !entry.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Severity;

    fn request(ua: &str) -> RequestInfo<'_> {
        RequestInfo {
            user_agent: Some(ua),
            ip: Some("203.0.113.9"),
            path: "/about",
            method: "GET",
        }
    }

    #[test]
    fn test_classify_known_tools() {
        let classifier = HeuristicClassifier::new();
        let cases = [
            ("sqlmap/1.7.2#stable (https://sqlmap.org)", EventType::SqlInjection),
            ("Mozilla/5.0 (Hydra)", EventType::BruteForce),
            ("XSSer/1.8.4", EventType::XssAttempt),
            ("ApacheBench/2.3", EventType::RateLimit),
            ("ab/2.3", EventType::RateLimit),
            ("python-requests/2.31.0", EventType::BotDetected),
        ];

        for (ua, expected) in cases {
            assert_eq!(classifier.classify(Some(ua)), Some(expected), "ua: {ua}");
        }
    }

    #[test]
    fn test_classify_no_match() {
        let classifier = HeuristicClassifier::new();
        assert_eq!(classifier.classify(None), None);
        assert_eq!(classifier.classify(Some("")), None);
        assert_eq!(
            classifier.classify(Some("Mozilla/5.0 (Macintosh) Safari/605.1.15")),
            None
        );
        // python without requests is not a bot by these rules
        assert_eq!(classifier.classify(Some("python-urllib/3.11")), None);
    }

    #[test]
    fn test_detect_builds_event() {
        let classifier = HeuristicClassifier::new();
        let detection = classifier.detect(&request("SQLMap/1.7 (https://sqlmap.org)")).unwrap();

        assert_eq!(detection.rule.name, "sqlmap");
        let event = detection.event;
        assert_eq!(event.event_type, EventType::SqlInjection);
        assert_eq!(event.severity, Severity::Critical);
        assert_eq!(event.ip, "203.0.113.9");
        assert_eq!(event.path, "/about");
        assert_eq!(event.method.as_deref(), Some("GET"));
        assert_eq!(
            event.user_agent.as_deref(),
            Some("sqlmap/1.7 (https://sqlmap.org)")
        );
        assert_eq!(
            event.reason,
            "detected scanner via User-Agent (sqlmap/1.7 (https://sqlmap.org))"
        );
    }

    #[test]
    fn test_reason_truncates_user_agent() {
        let classifier = HeuristicClassifier::new();
        let ua = format!("python-requests/2.31 {}", "x".repeat(100));
        let event = classifier.detect(&request(&ua)).unwrap().event;

        let quoted = event
            .reason
            .trim_start_matches("detected scanner via User-Agent (")
            .trim_end_matches(')');
        assert_eq!(quoted.chars().count(), REASON_UA_CHARS);
        assert_eq!(event.user_agent.unwrap().len(), ua.len());
    }

    #[test]
    fn test_missing_ip_is_unknown() {
        let classifier = HeuristicClassifier::new();
        let mut req = request("hydra");
        req.ip = None;
        assert_eq!(classifier.detect(&req).unwrap().event.ip, UNKNOWN_SOURCE);

        req.ip = Some("  ");
        assert_eq!(classifier.detect(&req).unwrap().event.ip, UNKNOWN_SOURCE);
    }

    #[test]
    fn test_disabled_classifier() {
        let classifier = HeuristicClassifier::disabled();
        assert!(classifier.classify(Some("sqlmap")).is_none());
        assert!(classifier.detect(&request("sqlmap")).is_none());
    }

    #[test]
    fn test_forwarded_client() {
        assert_eq!(
            forwarded_client("198.51.100.4, 10.0.0.1"),
            Some("198.51.100.4")
        );
        assert_eq!(forwarded_client(" 198.51.100.4 "), Some("198.51.100.4"));
        assert_eq!(forwarded_client(" , "), None);
    }
}
