//! Color markup for message templates
//!
//! Templates may embed `@name` tags (`@red`, `@bold`, `@reset`, ...). The
//! colored rendering replaces each known tag with its ANSI escape sequence and
//! the plain rendering removes it. Unknown tags are left exactly as written, so
//! text such as `user@example.com` passes through untouched.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Escape sequence that resets all attributes
pub const RESET: &str = "\x1b[0m";

/// A markup tag with a fixed ANSI escape sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorTag {
    Reset,
    Bold,
    Italic,
    Underline,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

/// Tag name lookup table, matched against a whole identifier
const TAGS: &[(&str, ColorTag)] = &[
    ("reset", ColorTag::Reset),
    ("bold", ColorTag::Bold),
    ("italic", ColorTag::Italic),
    ("underline", ColorTag::Underline),
    ("black", ColorTag::Black),
    ("red", ColorTag::Red),
    ("green", ColorTag::Green),
    ("yellow", ColorTag::Yellow),
    ("blue", ColorTag::Blue),
    ("magenta", ColorTag::Magenta),
    ("purple", ColorTag::Magenta),
    ("cyan", ColorTag::Cyan),
    ("white", ColorTag::White),
    ("gray", ColorTag::BrightBlack),
    ("grey", ColorTag::BrightBlack),
    ("bright_black", ColorTag::BrightBlack),
    ("bright_red", ColorTag::BrightRed),
    ("bright_green", ColorTag::BrightGreen),
    ("bright_yellow", ColorTag::BrightYellow),
    ("bright_blue", ColorTag::BrightBlue),
    ("bright_magenta", ColorTag::BrightMagenta),
    ("bright_cyan", ColorTag::BrightCyan),
    ("bright_white", ColorTag::BrightWhite),
];

impl ColorTag {
    /// Look up a tag by its markup name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        TAGS.iter()
            .find(|(tag, _)| tag.eq_ignore_ascii_case(name))
            .map(|(_, color)| *color)
    }

    /// Canonical markup name
    pub fn name(&self) -> &'static str {
        match self {
            ColorTag::Reset => "reset",
            ColorTag::Bold => "bold",
            ColorTag::Italic => "italic",
            ColorTag::Underline => "underline",
            ColorTag::Black => "black",
            ColorTag::Red => "red",
            ColorTag::Green => "green",
            ColorTag::Yellow => "yellow",
            ColorTag::Blue => "blue",
            ColorTag::Magenta => "magenta",
            ColorTag::Cyan => "cyan",
            ColorTag::White => "white",
            ColorTag::BrightBlack => "bright_black",
            ColorTag::BrightRed => "bright_red",
            ColorTag::BrightGreen => "bright_green",
            ColorTag::BrightYellow => "bright_yellow",
            ColorTag::BrightBlue => "bright_blue",
            ColorTag::BrightMagenta => "bright_magenta",
            ColorTag::BrightCyan => "bright_cyan",
            ColorTag::BrightWhite => "bright_white",
        }
    }

    pub fn escape(&self) -> &'static str {
        match self {
            ColorTag::Reset => RESET,
            ColorTag::Bold => "\x1b[1m",
            ColorTag::Italic => "\x1b[3m",
            ColorTag::Underline => "\x1b[4m",
            ColorTag::Black => "\x1b[30m",
            ColorTag::Red => "\x1b[31m",
            ColorTag::Green => "\x1b[32m",
            ColorTag::Yellow => "\x1b[33m",
            ColorTag::Blue => "\x1b[34m",
            ColorTag::Magenta => "\x1b[35m",
            ColorTag::Cyan => "\x1b[36m",
            ColorTag::White => "\x1b[37m",
            ColorTag::BrightBlack => "\x1b[90m",
            ColorTag::BrightRed => "\x1b[91m",
            ColorTag::BrightGreen => "\x1b[92m",
            ColorTag::BrightYellow => "\x1b[93m",
            ColorTag::BrightBlue => "\x1b[94m",
            ColorTag::BrightMagenta => "\x1b[95m",
            ColorTag::BrightCyan => "\x1b[96m",
            ColorTag::BrightWhite => "\x1b[97m",
        }
    }

    /// Wrap `text` in this tag's escape sequence followed by a reset
    pub fn paint(&self, text: &str) -> String {
        format!("{}{}{}", self.escape(), text, RESET)
    }
}

impl fmt::Display for ColorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name())
    }
}

/// Expand every known `@tag` in `input` to its escape sequence
pub fn expand(input: &str) -> String {
    render(input, true)
}

/// Remove every known `@tag` from `input`
pub fn strip(input: &str) -> String {
    render(input, false)
}

/// Single pass over the input: each `@` is followed by the longest run of
/// identifier characters, which is then looked up as a whole.
fn render(input: &str, colored: bool) -> String {
    let mut out = String::with_capacity(input.len() + 16);
    let mut rest = input;

    while let Some(at) = rest.find('@') {
        out.push_str(&rest[..at]);
        let after = &rest[at + 1..];
        let ident_len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        let ident = &after[..ident_len];

        match ColorTag::from_name(ident) {
            Some(tag) => {
                if colored {
                    out.push_str(tag.escape());
                }
            }
            None => {
                out.push('@');
                out.push_str(ident);
            }
        }
        rest = &after[ident_len..];
    }

    out.push_str(rest);
    out
}
