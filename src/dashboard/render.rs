//! Plain-text dashboard rendering for the terminal.

use std::fmt::Write;

use super::summary::{DashboardSummary, RankedCount};
use crate::events::Severity;

const BAR_WIDTH: usize = 20;

/// Render a summary as a fixed-width text report.
pub fn render_text(summary: &DashboardSummary) -> String {
    let mut out = String::new();
    let m = &summary.metrics;

    let _ = writeln!(
        out,
        "Security Analytics  ({})",
        summary.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(out, "{}", "=".repeat(60));
    let _ = writeln!(
        out,
        "Requests: {:<8} Blocked: {:<8} Block rate: {:.0}%",
        m.total_requests, m.blocked_requests, summary.block_rate
    );
    let _ = writeln!(
        out,
        "Risk score: {:<5} Threat level: {:?}   Events shown: {}",
        summary.risk_score, summary.threat_level, summary.event_count
    );

    let _ = writeln!(out, "\nAttack types");
    let max = summary
        .attack_types
        .iter()
        .map(|a| a.count)
        .max()
        .unwrap_or(0)
        .max(1);
    for attack in &summary.attack_types {
        let _ = writeln!(
            out,
            "  {:<14} {:>6}  {}",
            attack.label,
            attack.count,
            bar(attack.count as f64 / max as f64)
        );
    }

    let _ = writeln!(out, "\nSeverity");
    for severity in Severity::ALL {
        let _ = writeln!(
            out,
            "  {:<14} {:>6}  {:>5.1}%",
            severity.as_str(),
            summary.severity.get(severity),
            summary.severity.percent(severity)
        );
    }

    render_ranking(&mut out, "Top sources", &summary.top_sources);
    render_ranking(&mut out, "Most targeted paths", &summary.top_paths);

    let _ = writeln!(out, "\nRecent events");
    if summary.recent_events.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for event in summary.recent_events.iter().take(10) {
        let _ = writeln!(
            out,
            "  {}  {:<8} {:<13} {:<15} {}",
            event.timestamp.format("%H:%M:%S"),
            event.severity.as_str(),
            event.event_type.as_str(),
            event.ip,
            event.path
        );
    }

    out
}

fn render_ranking(out: &mut String, title: &str, ranking: &[RankedCount]) {
    let _ = writeln!(out, "\n{title}");
    if ranking.is_empty() {
        let _ = writeln!(out, "  (none)");
        return;
    }
    let max = ranking[0].count.max(1);
    for entry in ranking {
        let _ = writeln!(
            out,
            "  {:<24} {:>6}  {}",
            entry.key,
            entry.count,
            bar(entry.count as f64 / max as f64)
        );
    }
}

fn bar(fraction: f64) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::events::{EventType, NewSecurityEvent, SecurityEvent, SecurityMetrics};

    #[test]
    fn test_bar() {
        assert_eq!(bar(0.0), ".".repeat(BAR_WIDTH));
        assert_eq!(bar(1.0), "#".repeat(BAR_WIDTH));
        assert_eq!(bar(0.5).matches('#').count(), BAR_WIDTH / 2);
    }

    #[test]
    fn test_render_contains_sections() {
        let event = SecurityEvent::stamp(
            NewSecurityEvent::new(EventType::SqlInjection, "198.51.100.7", "/api/chat", "sqlmap"),
            Utc::now(),
        );
        let mut metrics = SecurityMetrics::default();
        metrics.record(EventType::SqlInjection);

        let text = render_text(&DashboardSummary::compute(vec![event], metrics));

        assert!(text.contains("Risk score: 100"));
        assert!(text.contains("SQL Injection"));
        assert!(text.contains("198.51.100.7"));
        assert!(text.contains("/api/chat"));
        assert!(text.contains("CRITICAL"));
    }

    #[test]
    fn test_render_empty() {
        let text = render_text(&DashboardSummary::compute(Vec::new(), SecurityMetrics::default()));
        assert!(text.contains("(none)"));
        assert!(text.contains("Risk score: 0"));
    }
}
