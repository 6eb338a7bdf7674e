//! Static incident-response reference data.

use serde::Serialize;

use crate::events::{EventType, Severity};

/// One incident-response step
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistStep {
    /// Step number, in execution order
    pub id: u8,
    /// Urgency
    pub severity: Severity,
    /// What to do
    pub action: &'static str,
    /// Whether the step runs without an operator
    pub automated: bool,
}

/// A known attack vector and its mitigation
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackVector {
    /// Event type recorded for this vector
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Display name
    pub name: &'static str,
    /// What the attack looks like
    pub description: &'static str,
    /// Control in place
    pub mitigation: &'static str,
    /// Whether the mitigation has been exercised
    pub tested: bool,
    /// Tools used to exercise the vector
    pub tooling: &'static str,
}

/// Severity of a vector before and after mitigations
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    /// Vector name
    pub vector: &'static str,
    /// Severity without mitigations
    pub pre_deployment: Severity,
    /// Severity with mitigations
    pub post_deployment: Severity,
    /// Summary of the reduction
    pub improvement: &'static str,
}

/// Remediation progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RemediationStatus {
    /// Not started
    Pending,
    /// Being worked on
    InProgress,
    /// Done
    Completed,
}

/// Outstanding hardening work
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemediationItem {
    /// Backlog position
    pub id: u8,
    /// Priority
    pub severity: Severity,
    /// Work item
    pub issue: &'static str,
    /// Target week
    pub timeline: &'static str,
    /// Progress
    pub status: RemediationStatus,
}

/// Everything served by `GET /api/security/playbook`
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Playbook {
    /// Response steps
    pub incident_checklist: &'static [ChecklistStep],
    /// Known vectors
    pub attack_vectors: &'static [AttackVector],
    /// Before/after severities
    pub risk_assessment: &'static [RiskAssessment],
    /// Hardening work
    pub remediation_backlog: &'static [RemediationItem],
}

/// Incident-response steps, most urgent first.
pub const INCIDENT_CHECKLIST: &[ChecklistStep] = &[
    ChecklistStep {
        id: 1,
        severity: Severity::Critical,
        action: "Identify the attack source (IP, User Agent, Pattern)",
        automated: true,
    },
    ChecklistStep {
        id: 2,
        severity: Severity::Critical,
        action: "Block the malicious IP at firewall level",
        automated: true,
    },
    ChecklistStep {
        id: 3,
        severity: Severity::High,
        action: "Review security logs for similar patterns",
        automated: false,
    },
    ChecklistStep {
        id: 4,
        severity: Severity::High,
        action: "Notify security team via email/Slack",
        automated: false,
    },
    ChecklistStep {
        id: 5,
        severity: Severity::Medium,
        action: "Update firewall rules based on attack pattern",
        automated: false,
    },
    ChecklistStep {
        id: 6,
        severity: Severity::Medium,
        action: "Document the incident in security log",
        automated: true,
    },
    ChecklistStep {
        id: 7,
        severity: Severity::Low,
        action: "Schedule security audit and penetration test",
        automated: false,
    },
];

/// Vectors the detector labels.
pub const ATTACK_VECTORS: &[AttackVector] = &[
    AttackVector {
        event_type: EventType::RateLimit,
        name: "Rate Limiting Exceeded",
        description: "Too many requests from single IP address",
        mitigation: "Token bucket rate limiting (100 requests/minute)",
        tested: true,
        tooling: "Slowloris, Apache Bench (ab)",
    },
    AttackVector {
        event_type: EventType::BruteForce,
        name: "Brute Force Attack",
        description: "Multiple failed authentication attempts",
        mitigation: "Authentication provider + rate limiting",
        tested: true,
        tooling: "Hydra, Medusa",
    },
    AttackVector {
        event_type: EventType::BotDetected,
        name: "Malicious Bot Detection",
        description: "Automated bot attempting to scrape or attack",
        mitigation: "User-Agent heuristics with bot scoring",
        tested: true,
        tooling: "Custom Python scripts, Scrapy",
    },
    AttackVector {
        event_type: EventType::SqlInjection,
        name: "SQL Injection Attempt",
        description: "Attempting to inject SQL commands",
        mitigation: "Request shield protection",
        tested: true,
        tooling: "SQLmap, Manual payloads",
    },
    AttackVector {
        event_type: EventType::XssAttempt,
        name: "Cross-Site Scripting (XSS)",
        description: "Attempting to inject malicious scripts",
        mitigation: "Request shield + output escaping",
        tested: true,
        tooling: "XSSer, Manual payloads",
    },
];

/// Severity per vector before and after mitigations.
pub const RISK_ASSESSMENT: &[RiskAssessment] = &[
    RiskAssessment {
        vector: "Rate Limiting",
        pre_deployment: Severity::Critical,
        post_deployment: Severity::Low,
        improvement: "95% reduction - Token bucket limits prevent DDoS",
    },
    RiskAssessment {
        vector: "Brute Force Attacks",
        pre_deployment: Severity::High,
        post_deployment: Severity::Low,
        improvement: "90% reduction - Auth + rate limiting",
    },
    RiskAssessment {
        vector: "Bot Attacks",
        pre_deployment: Severity::High,
        post_deployment: Severity::Low,
        improvement: "85% reduction - Bot detection",
    },
    RiskAssessment {
        vector: "SQL Injection",
        pre_deployment: Severity::Critical,
        post_deployment: Severity::Medium,
        improvement: "80% reduction - Shield protection active",
    },
    RiskAssessment {
        vector: "XSS Attacks",
        pre_deployment: Severity::High,
        post_deployment: Severity::Medium,
        improvement: "75% reduction - Shield + output sanitization",
    },
];

/// Remaining hardening work.
pub const REMEDIATION_BACKLOG: &[RemediationItem] = &[
    RemediationItem {
        id: 1,
        severity: Severity::Critical,
        issue: "Implement WAF rules for advanced SQL injection patterns",
        timeline: "Week 1",
        status: RemediationStatus::InProgress,
    },
    RemediationItem {
        id: 2,
        severity: Severity::High,
        issue: "Add IP reputation checking against threat intelligence feeds",
        timeline: "Week 2",
        status: RemediationStatus::Pending,
    },
    RemediationItem {
        id: 3,
        severity: Severity::High,
        issue: "Implement CAPTCHA for repeated failed login attempts",
        timeline: "Week 2",
        status: RemediationStatus::Pending,
    },
    RemediationItem {
        id: 4,
        severity: Severity::Medium,
        issue: "Set up automated security scanning with OWASP ZAP",
        timeline: "Week 3",
        status: RemediationStatus::Pending,
    },
    RemediationItem {
        id: 5,
        severity: Severity::Medium,
        issue: "Implement CSP headers for additional XSS protection",
        timeline: "Week 3",
        status: RemediationStatus::Pending,
    },
    RemediationItem {
        id: 6,
        severity: Severity::Low,
        issue: "Add honeypot endpoints to detect reconnaissance",
        timeline: "Week 4",
        status: RemediationStatus::Pending,
    },
    RemediationItem {
        id: 7,
        severity: Severity::Low,
        issue: "Implement security headers (HSTS, X-Frame-Options, etc.)",
        timeline: "Week 4",
        status: RemediationStatus::Completed,
    },
];

/// The full playbook.
pub const PLAYBOOK: Playbook = Playbook {
    incident_checklist: INCIDENT_CHECKLIST,
    attack_vectors: ATTACK_VECTORS,
    risk_assessment: RISK_ASSESSMENT,
    remediation_backlog: REMEDIATION_BACKLOG,
};
