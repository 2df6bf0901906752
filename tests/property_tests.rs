//! Property-based tests for rust_event_logger using proptest

use proptest::prelude::*;
use rust_event_logger::core::{color, formatter};
use rust_event_logger::prelude::*;

fn any_level() -> impl Strategy<Value = Level> {
    prop_oneof![
        Just(Level::Trace),
        Just(Level::Debug),
        Just(Level::Info),
        Just(Level::Warn),
        Just(Level::Error),
        Just(Level::Exception),
    ]
}

// ============================================================================
// Level Tests
// ============================================================================

proptest! {
    /// isLoggable agrees with the weights
    #[test]
    fn test_is_loggable_matches_weights(candidate in any_level(), threshold in any_level()) {
        prop_assert_eq!(
            candidate.is_loggable(threshold),
            threshold.weight() <= candidate.weight()
        );
    }

    /// Ordering of the enum agrees with the weights
    #[test]
    fn test_level_ordering_matches_weights(a in any_level(), b in any_level()) {
        prop_assert_eq!(a <= b, a.weight() <= b.weight());
    }

    /// Level string conversions roundtrip, case-insensitively
    #[test]
    fn test_level_str_roundtrip(level in any_level(), lower in any::<bool>()) {
        let name = if lower { level.to_str().to_lowercase() } else { level.to_str().to_string() };
        let parsed: Level = name.parse().unwrap();
        prop_assert_eq!(parsed, level);
    }
}

// ============================================================================
// Formatter Tests
// ============================================================================

proptest! {
    /// N placeholders with N string arguments are replaced left to right
    #[test]
    fn test_placeholders_filled_in_order(
        parts in prop::collection::vec("[a-z ]{0,8}", 1..8),
        values in prop::collection::vec("[a-z0-9]{1,6}", 8),
    ) {
        let placeholders = parts.len() - 1;
        let template = parts.join("{}");
        let args: Vec<Argument> = values[..placeholders].iter().map(Argument::from).collect();

        let mut expected = parts[0].clone();
        for (part, value) in parts[1..].iter().zip(&values[..placeholders]) {
            expected.push_str(value);
            expected.push_str(part);
        }

        let out = formatter::format(&template, &args);
        prop_assert_eq!(&out.plain, &expected);
        prop_assert!(!out.plain.contains("{}"), "output still contains a placeholder: {:?}", out.plain);
        prop_assert_eq!(out.level_override, None);
    }

    /// Extra placeholders stay literally in the output
    #[test]
    fn test_unconsumed_placeholders_remain(extra in 1usize..5) {
        let template = "{} ".repeat(extra + 1);
        let out = formatter::format(&template, &[Argument::from("v")]);
        prop_assert_eq!(out.plain.matches("{}").count(), extra);
        prop_assert!(out.plain.starts_with("v "));
    }

    /// Formatting never panics on arbitrary input
    #[test]
    fn test_format_never_panics(template in ".{0,64}", arg in ".{0,16}") {
        let out = formatter::format(&template, &[Argument::from(arg), Argument::Null]);
        prop_assert!(out.plain.len() <= out.colored.len());
    }

    /// Stripping leaves text without tags untouched
    #[test]
    fn test_strip_is_identity_without_tags(text in "[^@]{0,64}") {
        prop_assert_eq!(color::strip(&text), text.clone());
        prop_assert_eq!(color::expand(&text), text);
    }

    /// Known tags never survive stripping
    #[test]
    fn test_known_tags_are_stripped(
        words in prop::collection::vec("[a-z]{1,6}", 1..6),
        tag in prop_oneof![Just("@red"), Just("@bold"), Just("@reset"), Just("@underline")],
    ) {
        let text = words.join(&format!("{} ", tag));
        let stripped = color::strip(&text);
        prop_assert!(!stripped.contains(tag));
    }
}

// ============================================================================
// Event Tests
// ============================================================================

proptest! {
    /// A throwable argument always yields an exception-level event
    #[test]
    fn test_throwable_always_exception(level in any_level(), with_placeholder in any::<bool>()) {
        let template = if with_placeholder { "failed: {}" } else { "failed" };
        let event = LogEvent::detached(
            "app",
            level,
            template,
            vec![Argument::from(Throwable::with_frames("boom", vec!["app::run".to_string()]))],
        );
        prop_assert_eq!(event.level(), Level::Exception);
        prop_assert!(event.formatted().contains("boom"));
        prop_assert!(event.formatted().contains("    at app::run"));
    }
}
