//! Derived dashboard figures.
//!
//! Everything here is computed from one events read plus one metrics read;
//! nothing is stored.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::events::{EventType, SecurityEvent, SecurityMetrics, Severity};

/// Entries kept in the top-sources and top-paths rankings.
pub const TOP_N: usize = 5;

/// Risk points added per critical event.
const CRITICAL_WEIGHT: f64 = 5.0;

/// A ranked key with its occurrence count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedCount {
    /// Source address or path
    pub key: String,
    /// Occurrences
    pub count: usize,
}

/// Events per severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityDistribution {
    /// CRITICAL events
    pub critical: usize,
    /// HIGH events
    pub high: usize,
    /// MEDIUM events
    pub medium: usize,
    /// LOW events
    pub low: usize,
}

impl SeverityDistribution {
    /// Tally severities
    pub fn from_events(events: &[SecurityEvent]) -> Self {
        let mut dist = Self::default();
        for event in events {
            match event.severity {
                Severity::Critical => dist.critical += 1,
                Severity::High => dist.high += 1,
                Severity::Medium => dist.medium += 1,
                Severity::Low => dist.low += 1,
            }
        }
        dist
    }

    /// Count for one severity
    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }

    /// Total events tallied
    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low
    }

    /// Share of one severity, as a percentage
    pub fn percent(&self, severity: Severity) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.get(severity) as f64 / total as f64 * 100.0
        }
    }
}

/// Counter for one attack type, as charted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackTypeCount {
    /// Event type
    pub event_type: EventType,
    /// Display label
    pub label: String,
    /// Counter value
    pub count: u64,
}

/// Coarse threat indicator shown next to the risk score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThreatLevel {
    /// No critical events in the window
    Low,
    /// At least one critical event in the window
    High,
}

/// Everything the dashboard renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Counter aggregate
    pub metrics: SecurityMetrics,
    /// Events in the window
    pub event_count: usize,
    /// Most active source addresses
    pub top_sources: Vec<RankedCount>,
    /// Most targeted paths
    pub top_paths: Vec<RankedCount>,
    /// Severity tally over the window
    pub severity: SeverityDistribution,
    /// Per-type counters, chart order
    pub attack_types: Vec<AttackTypeCount>,
    /// Blocked share of requests (percent, 0-100)
    pub block_rate: f64,
    /// Heuristic risk score (0-100)
    pub risk_score: u8,
    /// HIGH when any critical event is in the window
    pub threat_level: ThreatLevel,
    /// Newest events in the window
    pub recent_events: Vec<SecurityEvent>,
    /// When the summary was computed
    pub generated_at: DateTime<Utc>,
}

impl DashboardSummary {
    /// Compute every derived figure from one events window and the metrics.
    pub fn compute(events: Vec<SecurityEvent>, metrics: SecurityMetrics) -> Self {
        let severity = SeverityDistribution::from_events(&events);

        Self {
            metrics,
            event_count: events.len(),
            top_sources: top_counts(events.iter().map(|e| e.ip.as_str()), TOP_N),
            top_paths: top_counts(events.iter().map(|e| e.path.as_str()), TOP_N),
            severity,
            attack_types: attack_type_counts(&metrics),
            block_rate: metrics.block_rate(),
            risk_score: risk_score(&metrics, severity.critical),
            threat_level: if severity.critical > 0 {
                ThreatLevel::High
            } else {
                ThreatLevel::Low
            },
            recent_events: events,
            generated_at: Utc::now(),
        }
    }
}

/// Heuristic risk score in 0..=100.
///
/// `blockRate + 5 * critical`, clamped and rounded; zero with no traffic.
pub fn risk_score(metrics: &SecurityMetrics, critical_events: usize) -> u8 {
    if metrics.total_requests == 0 {
        return 0;
    }
    let raw = metrics.block_rate() + critical_events as f64 * CRITICAL_WEIGHT;
    raw.clamp(0.0, 100.0).round() as u8
}

/// Count keys and keep the `n` most frequent.
///
/// Ties keep first-seen order.
pub fn top_counts<'a>(keys: impl Iterator<Item = &'a str>, n: usize) -> Vec<RankedCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut ranked: Vec<RankedCount> = Vec::new();

    for key in keys {
        if let Some(&i) = index.get(key) {
            ranked[i].count += 1;
        } else {
            index.insert(key, ranked.len());
            ranked.push(RankedCount {
                key: key.to_string(),
                count: 1,
            });
        }
    }

    // stable sort keeps first-seen order among equal counts
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(n);
    ranked
}

fn attack_type_counts(metrics: &SecurityMetrics) -> Vec<AttackTypeCount> {
    [
        EventType::SqlInjection,
        EventType::BruteForce,
        EventType::XssAttempt,
        EventType::RateLimit,
        EventType::BotDetected,
    ]
    .into_iter()
    .filter_map(|event_type| {
        metrics.count_for(event_type).map(|count| AttackTypeCount {
            event_type,
            label: event_type.label().to_string(),
            count,
        })
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NewSecurityEvent;

    fn event(ip: &str, path: &str, severity: Severity) -> SecurityEvent {
        SecurityEvent::stamp(
            NewSecurityEvent::new(EventType::Blocked, ip, path, "test").with_severity(severity),
            Utc::now(),
        )
    }

    fn metrics(total: u64, blocked: u64) -> SecurityMetrics {
        SecurityMetrics {
            total_requests: total,
            blocked_requests: blocked,
            ..Default::default()
        }
    }

    #[test]
    fn test_top_counts_ranking() {
        let keys = ["a", "b", "a", "c", "b", "a", "d", "e", "f"];
        let ranked = top_counts(keys.into_iter(), TOP_N);

        assert_eq!(ranked.len(), TOP_N);
        assert_eq!(ranked[0], RankedCount { key: "a".into(), count: 3 });
        assert_eq!(ranked[1], RankedCount { key: "b".into(), count: 2 });
        // ties in first-seen order
        let tail: Vec<_> = ranked[2..].iter().map(|r| r.key.as_str()).collect();
        assert_eq!(tail, vec!["c", "d", "e"]);
    }

    #[test]
    fn test_top_counts_empty() {
        assert!(top_counts(std::iter::empty(), TOP_N).is_empty());
    }

    #[test]
    fn test_risk_score() {
        assert_eq!(risk_score(&metrics(0, 0), 10), 0);
        assert_eq!(risk_score(&metrics(10, 5), 0), 50);
        assert_eq!(risk_score(&metrics(10, 5), 3), 65);
        assert_eq!(risk_score(&metrics(10, 10), 4), 100);
        assert_eq!(risk_score(&metrics(3, 1), 0), 33);
    }

    #[test]
    fn test_severity_distribution() {
        let events = vec![
            event("a", "/", Severity::Critical),
            event("a", "/", Severity::Critical),
            event("b", "/", Severity::Low),
            event("c", "/", Severity::Medium),
        ];
        let dist = SeverityDistribution::from_events(&events);

        assert_eq!(dist.critical, 2);
        assert_eq!(dist.high, 0);
        assert_eq!(dist.total(), 4);
        assert!((dist.percent(Severity::Critical) - 50.0).abs() < f64::EPSILON);
        assert!(SeverityDistribution::default().percent(Severity::Low).abs() < f64::EPSILON);
    }

    #[test]
    fn test_compute_summary() {
        let events = vec![
            event("10.0.0.1", "/sign-in", Severity::Critical),
            event("10.0.0.1", "/sign-in", Severity::High),
            event("10.0.0.2", "/", Severity::Low),
        ];
        let mut m = metrics(3, 3);
        m.sql_injection_attempts = 1;

        let summary = DashboardSummary::compute(events, m);

        assert_eq!(summary.event_count, 3);
        assert_eq!(summary.top_sources[0].key, "10.0.0.1");
        assert_eq!(summary.top_sources[0].count, 2);
        assert_eq!(summary.top_paths[0].key, "/sign-in");
        assert_eq!(summary.threat_level, ThreatLevel::High);
        assert_eq!(summary.risk_score, 100);
        assert!((summary.block_rate - 100.0).abs() < f64::EPSILON);

        assert_eq!(summary.attack_types.len(), 5);
        assert_eq!(summary.attack_types[0].event_type, EventType::SqlInjection);
        assert_eq!(summary.attack_types[0].count, 1);
    }

    #[test]
    fn test_compute_empty() {
        let summary = DashboardSummary::compute(Vec::new(), SecurityMetrics::default());
        assert_eq!(summary.risk_score, 0);
        assert_eq!(summary.threat_level, ThreatLevel::Low);
        assert!(summary.top_sources.is_empty());
        assert_eq!(summary.severity.total(), 0);
    }
}
