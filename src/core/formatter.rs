//! Placeholder substitution and message decoration
//!
//! A template uses `{}` as its single positional placeholder. printf-style
//! `%s`, `%d` and `%f` are accepted and normalized to `{}` first, and `%%`
//! collapses to a literal `%` as in printf. Arguments
//! replace placeholders left to right; leftover placeholders stay in the
//! output literally. Throwable arguments promote the call to
//! [`Level::Exception`] and are always surfaced: when no placeholder is left
//! for them, their rendered block is appended on a new line.

use super::argument::{Argument, Throwable};
use super::color::{self, ColorTag};
use super::level::Level;
use std::borrow::Cow;

/// Canonical placeholder token
pub const PLACEHOLDER: &str = "{}";

const FRAME_INDENT: &str = "    at ";

/// Result of rendering one template with its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatted {
    /// Substituted message with color tags removed
    pub plain: String,
    /// Substituted message with color tags expanded to ANSI sequences
    pub colored: String,
    /// `Some(Level::Exception)` when a throwable argument was present
    pub level_override: Option<Level>,
}

impl Formatted {
    /// Level to use for the call, given the level the caller asked for
    pub fn effective_level(&self, requested: Level) -> Level {
        self.level_override.unwrap_or(requested)
    }
}

/// Rewrite printf-style `%s`, `%d` and `%f` to `{}` and `%%` to `%`
pub fn normalize(template: &str) -> Cow<'_, str> {
    if !template.contains('%') {
        return Cow::Borrowed(template);
    }

    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('s' | 'd' | 'f') => {
                chars.next();
                out.push_str(PLACEHOLDER);
            }
            Some('%') => {
                chars.next();
                out.push('%');
            }
            _ => out.push('%'),
        }
    }
    Cow::Owned(out)
}

/// Substitute `args` into `template`. Never fails.
pub fn format(template: &str, args: &[Argument]) -> Formatted {
    let normalized = normalize(template);
    let mut plain = String::with_capacity(normalized.len() + 32);
    let mut colored = String::with_capacity(normalized.len() + 64);

    let mut segments = normalized.split(PLACEHOLDER);
    let mut remaining = args.iter();

    if let Some(first) = segments.next() {
        push_literal(first, &mut plain, &mut colored);
    }
    for literal in segments {
        match remaining.next() {
            Some(arg) => push_argument(arg, &mut plain, &mut colored),
            None => {
                plain.push_str(PLACEHOLDER);
                colored.push_str(PLACEHOLDER);
            }
        }
        push_literal(literal, &mut plain, &mut colored);
    }

    // Surplus arguments are dropped, except throwables which are appended
    for throwable in remaining.filter_map(Argument::as_throwable) {
        plain.push('\n');
        colored.push('\n');
        push_throwable(throwable, &mut plain, &mut colored);
    }

    let level_override = args
        .iter()
        .any(Argument::is_throwable)
        .then_some(Level::Exception);

    Formatted {
        plain,
        colored,
        level_override,
    }
}

fn push_literal(literal: &str, plain: &mut String, colored: &mut String) {
    if literal.contains('@') {
        plain.push_str(&color::strip(literal));
        colored.push_str(&color::expand(literal));
    } else {
        plain.push_str(literal);
        colored.push_str(literal);
    }
}

fn push_argument(arg: &Argument, plain: &mut String, colored: &mut String) {
    match arg {
        Argument::Throwable(throwable) => push_throwable(throwable, plain, colored),
        other => {
            let rendered = other.render();
            colored.push_str(&rendered);
            plain.push_str(&rendered);
        }
    }
}

/// Message line, one `Caused by:` line per cause, one `at` line per frame
fn push_throwable(throwable: &Throwable, plain: &mut String, colored: &mut String) {
    plain.push_str(throwable.message());
    colored.push_str(&ColorTag::BrightRed.paint(throwable.message()));

    for cause in throwable.causes() {
        plain.push_str("\nCaused by: ");
        plain.push_str(cause);
        colored.push('\n');
        colored.push_str(&ColorTag::Yellow.paint("Caused by: "));
        colored.push_str(cause);
    }

    for frame in throwable.frames() {
        plain.push('\n');
        plain.push_str(FRAME_INDENT);
        plain.push_str(frame);
        colored.push('\n');
        colored.push_str(FRAME_INDENT);
        colored.push_str(&ColorTag::BrightBlack.paint(frame));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("app::frame_{}", i)).collect()
    }

    #[test]
    fn test_simple_substitution() {
        let out = format("Value: {}", &[Argument::from(42)]);
        assert_eq!(out.plain, "Value: 42");
        assert_eq!(out.colored, "Value: 42");
        assert_eq!(out.level_override, None);
    }

    #[test]
    fn test_left_to_right_order() {
        let out = format(
            "{} -> {} -> {}",
            &[Argument::from("a"), Argument::from("b"), Argument::from("c")],
        );
        assert_eq!(out.plain, "a -> b -> c");
    }

    #[test]
    fn test_unconsumed_placeholders_remain() {
        let out = format("{} and {}", &[Argument::from(1)]);
        assert_eq!(out.plain, "1 and {}");
    }

    #[test]
    fn test_surplus_plain_arguments_are_dropped() {
        let out = format("only {}", &[Argument::from(1), Argument::from(2)]);
        assert_eq!(out.plain, "only 1");
    }

    #[test]
    fn test_printf_normalization() {
        assert_eq!(normalize("%s is %d years, %f"), "{} is {} years, {}");
        assert_eq!(normalize("100%% sure, 5%"), "100% sure, 5%");
        assert_eq!(normalize("%%s stays literal"), "%s stays literal");
        assert!(matches!(normalize("no percent"), Cow::Borrowed(_)));

        let out = format("%s=%d", &[Argument::from("x"), Argument::from(3)]);
        assert_eq!(out.plain, "x=3");
    }

    #[test]
    fn test_null_argument() {
        let out = format("got {}", &[Argument::Null]);
        assert_eq!(out.plain, "got null");
    }

    #[test]
    fn test_throwable_in_placeholder() {
        let t = Throwable::with_frames("x", frames(2));
        let out = format("Error {}", &[Argument::from(t)]);
        assert_eq!(out.level_override, Some(Level::Exception));
        assert_eq!(
            out.plain,
            "Error x\n    at app::frame_0\n    at app::frame_1"
        );
        assert!(out.colored.contains("\x1b[91mx\x1b[0m"));
        assert!(out.colored.contains("    at \x1b[90mapp::frame_0\x1b[0m"));
    }

    #[test]
    fn test_throwable_without_placeholder_is_appended() {
        let t = Throwable::with_frames("boom", frames(1)).with_cause("root");
        let out = format("failed", &[Argument::from(t)]);
        assert_eq!(
            out.plain,
            "failed\nboom\nCaused by: root\n    at app::frame_0"
        );
        assert_eq!(out.effective_level(Level::Trace), Level::Exception);
    }

    #[test]
    fn test_color_tags_in_template() {
        let out = format("@red{}@reset done", &[Argument::from("v")]);
        assert_eq!(out.plain, "v done");
        assert_eq!(out.colored, "\x1b[31mv\x1b[0m done");
    }

    #[test]
    fn test_color_tags_in_arguments_are_verbatim() {
        let out = format("{}", &[Argument::from("@red")]);
        assert_eq!(out.plain, "@red");
        assert_eq!(out.colored, "@red");
    }

    #[test]
    fn test_collections() {
        let out = format("Tags: {}", &[Argument::from(vec!["a", "b", "c"])]);
        assert_eq!(out.plain, "Tags: [ a, b, c ]");
    }
}
