//! Property tests for the User-Agent classifier and the event store.

use proptest::prelude::*;
use shield::events::{EventStore, EventType, NewSecurityEvent};
use shield::security::{HeuristicClassifier, RequestInfo};

/// Scanner tokens in rule order, with the rule index they belong to.
const TOKENS: &[(&str, usize, EventType)] = &[
    ("sqlmap", 0, EventType::SqlInjection),
    ("hydra", 1, EventType::BruteForce),
    ("xsser", 2, EventType::XssAttempt),
    ("apachebench", 3, EventType::RateLimit),
    ("ab/", 3, EventType::RateLimit),
    ("python-requests", 4, EventType::BotDetected),
];

/// Filler that can never spell a scanner token.
fn filler() -> impl Strategy<Value = String> {
    "[cdefgijkltuvwz0-9 ;().]{0,24}"
}

fn token() -> impl Strategy<Value = (&'static str, usize, EventType)> {
    prop::sample::select(TOKENS)
}

fn mixed_case(s: &str, upper: &[bool]) -> String {
    s.chars()
        .zip(upper.iter().cycle())
        .map(|(c, &up)| if up { c.to_ascii_uppercase() } else { c })
        .collect()
}

proptest! {
    #[test]
    fn test_token_yields_mapped_type(
        prefix in filler(),
        suffix in filler(),
        (tok, _, expected) in token(),
        upper in prop::collection::vec(any::<bool>(), 1..8),
    ) {
        let ua = format!("{prefix}{}{suffix}", mixed_case(tok, &upper));
        let classifier = HeuristicClassifier::new();
        prop_assert_eq!(classifier.classify(Some(&ua)), Some(expected));
    }

    #[test]
    fn test_first_rule_wins(
        a in token(),
        b in token(),
        gap in filler(),
    ) {
        let ua = format!("{} {gap} {}", a.0, b.0);
        let expected = if a.1 <= b.1 { a.2 } else { b.2 };
        let classifier = HeuristicClassifier::new();
        prop_assert_eq!(classifier.classify(Some(&ua)), Some(expected));
    }

    #[test]
    fn test_no_token_no_event(ua in filler(), path in "/[a-z]{0,12}") {
        let classifier = HeuristicClassifier::new();
        prop_assert_eq!(classifier.classify(Some(&ua)), None);

        let request = RequestInfo {
            user_agent: Some(&ua),
            ip: Some("192.0.2.1"),
            path: &path,
            method: "GET",
        };
        prop_assert!(classifier.detect(&request).is_none());
    }

    #[test]
    fn test_detection_matches_classification(ua in "\\PC{0,64}") {
        let classifier = HeuristicClassifier::new();
        let request = RequestInfo {
            user_agent: Some(&ua),
            ip: None,
            path: "/",
            method: "GET",
        };
        let detected = classifier.detect(&request).map(|d| d.event.event_type);
        prop_assert_eq!(detected, classifier.classify(Some(&ua)));
    }

    #[test]
    fn test_store_keeps_most_recent(capacity in 1usize..40, appends in 0usize..120) {
        let store = EventStore::with_capacity(capacity);
        for i in 0..appends {
            store
                .append(NewSecurityEvent::new(EventType::Blocked, "10.0.0.1", format!("/{i}"), "p"))
                .unwrap();
        }

        prop_assert_eq!(store.len().unwrap(), appends.min(capacity));
        prop_assert_eq!(store.metrics().unwrap().total_requests, appends as u64);

        let events = store.query(usize::MAX).unwrap();
        for (offset, event) in events.iter().enumerate() {
            prop_assert_eq!(&event.path, &format!("/{}", appends - 1 - offset));
        }
    }
}
