//! User-Agent rule table for scanner detection.
//!
//! Rules are evaluated in order against the lower-cased User-Agent and the
//! first match wins. Common offensive tools leave identifiable strings in
//! their default User-Agent, which is all these rules look for.

use crate::events::EventType;

/// Substring predicate over a lower-cased User-Agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    /// Contains the token
    Contains(&'static str),
    /// Contains every token
    AllOf(&'static [&'static str]),
    /// Contains at least one token
    AnyOf(&'static [&'static str]),
}

impl Predicate {
    /// Evaluate against an already lower-cased User-Agent.
    pub fn matches(&self, user_agent: &str) -> bool {
        match self {
            Predicate::Contains(token) => user_agent.contains(token),
            Predicate::AllOf(tokens) => tokens.iter().all(|t| user_agent.contains(t)),
            Predicate::AnyOf(tokens) => tokens.iter().any(|t| user_agent.contains(t)),
        }
    }
}

/// A single detection rule
#[derive(Debug, Clone, Copy)]
pub struct UserAgentRule {
    /// Rule name
    pub name: &'static str,
    /// Match condition
    pub predicate: Predicate,
    /// Event type emitted on match
    pub event_type: EventType,
    /// Tooling the rule targets
    pub description: &'static str,
}

/// Scanner rules, in evaluation order.
pub static SCANNER_RULES: &[UserAgentRule] = &[
    UserAgentRule {
        name: "sqlmap",
        predicate: Predicate::Contains("sqlmap"),
        event_type: EventType::SqlInjection,
        description: "sqlmap automatic SQL injection tool",
    },
    UserAgentRule {
        name: "hydra",
        predicate: Predicate::Contains("hydra"),
        event_type: EventType::BruteForce,
        description: "THC Hydra login brute-forcer",
    },
    UserAgentRule {
        name: "xsser",
        predicate: Predicate::AllOf(&["xss", "ser"]),
        event_type: EventType::XssAttempt,
        description: "XSSer cross-site scripting framework",
    },
    UserAgentRule {
        name: "apache_bench",
        predicate: Predicate::AnyOf(&["apachebench", "ab/"]),
        event_type: EventType::RateLimit,
        description: "ApacheBench load generator",
    },
    UserAgentRule {
        name: "python_requests",
        predicate: Predicate::AllOf(&["python", "requests"]),
        event_type: EventType::BotDetected,
        description: "Scripted client using python-requests",
    },
];

/// First rule matching the lower-cased User-Agent.
pub fn first_match(user_agent: &str) -> Option<&'static UserAgentRule> {
    SCANNER_RULES
        .iter()
        .find(|rule| rule.predicate.matches(user_agent))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates() {
        assert!(Predicate::Contains("sqlmap").matches("sqlmap/1.7"));
        assert!(!Predicate::Contains("sqlmap").matches("mozilla/5.0"));

        assert!(Predicate::AllOf(&["xss", "ser"]).matches("xsser/1.8"));
        assert!(!Predicate::AllOf(&["xss", "ser"]).matches("xss-only"));

        assert!(Predicate::AnyOf(&["apachebench", "ab/"]).matches("ab/2.3"));
        assert!(!Predicate::AnyOf(&["apachebench", "ab/"]).matches("curl/8.4"));
    }

    #[test]
    fn test_rule_order() {
        let order: Vec<_> = SCANNER_RULES.iter().map(|r| r.event_type).collect();
        assert_eq!(
            order,
            vec![
                EventType::SqlInjection,
                EventType::BruteForce,
                EventType::XssAttempt,
                EventType::RateLimit,
                EventType::BotDetected,
            ]
        );
    }

    #[test]
    fn test_first_match_wins() {
        // Both sqlmap and python-requests tokens present
        let rule = first_match("sqlmap via python-requests/2.31").unwrap();
        assert_eq!(rule.name, "sqlmap");

        let rule = first_match("hydra xsser").unwrap();
        assert_eq!(rule.event_type, EventType::BruteForce);
    }

    #[test]
    fn test_no_match() {
        assert!(first_match("mozilla/5.0 (x11; linux x86_64) firefox/128.0").is_none());
        assert!(first_match("").is_none());
    }
}
