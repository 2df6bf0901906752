//! Log call arguments
//!
//! Every value passed alongside a template is converted into an [`Argument`],
//! which records how it must be rendered: verbatim strings, `null`, ordered
//! collections, key/value mappings, throwables and plain `Display` values.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::panic::Location;

/// Maximum number of backtrace frames kept per throwable
const MAX_FRAMES: usize = 32;

/// Frames belonging to the capture machinery itself
const SKIPPED_FRAME_PREFIXES: &[&str] = &[
    "std::backtrace",
    "std::backtrace_rs",
    "rust_event_logger::core::argument",
];

/// An exception-like value: message, cause chain and stack frames
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Throwable {
    message: String,
    causes: Vec<String>,
    frames: Vec<String>,
}

impl Throwable {
    /// Create a throwable from a message, capturing the current stack
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            causes: Vec::new(),
            frames: capture_frames(Location::caller()),
        }
    }

    /// Capture an error together with its `source()` chain and the current stack
    #[track_caller]
    pub fn from_error(error: &(dyn std::error::Error + 'static)) -> Self {
        let mut causes = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }

        Self {
            message: error.to_string(),
            causes,
            frames: capture_frames(Location::caller()),
        }
    }

    /// Create a throwable with explicit frames and no capture
    pub fn with_frames(message: impl Into<String>, frames: Vec<String>) -> Self {
        Self {
            message: message.into(),
            causes: Vec::new(),
            frames,
        }
    }

    #[must_use]
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.causes.push(cause.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn causes(&self) -> &[String] {
        &self.causes
    }

    pub fn frames(&self) -> &[String] {
        &self.frames
    }
}

impl fmt::Display for Throwable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// First frame is always the capture location; backtrace frames follow when
/// the platform provides them.
fn capture_frames(location: &Location<'_>) -> Vec<String> {
    let mut frames = vec![format!(
        "{}:{}:{}",
        location.file(),
        location.line(),
        location.column()
    )];

    let backtrace = Backtrace::force_capture();
    if backtrace.status() != BacktraceStatus::Captured {
        return frames;
    }

    let rendered = backtrace.to_string();
    let symbols = rendered.lines().filter_map(|line| {
        let (index, symbol) = line.trim_start().split_once(": ")?;
        if index.is_empty() || !index.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        Some(symbol.trim())
    });

    frames.extend(
        symbols
            .filter(|symbol| *symbol != "<unknown>")
            .filter(|symbol| {
                !SKIPPED_FRAME_PREFIXES
                    .iter()
                    .any(|prefix| symbol.starts_with(prefix))
            })
            .take(MAX_FRAMES)
            .map(String::from),
    );
    frames
}

/// A single argument of a log call
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// Absent value, rendered as `null`
    Null,
    /// String inserted verbatim
    Str(String),
    /// Any other value, already converted with `Display`
    Value(String),
    /// Exception-like value; promotes the call to exception level
    Throwable(Throwable),
    /// Ordered collection, rendered as `[ a, b ]`
    List(Vec<Argument>),
    /// Key/value mapping, rendered as `{ [k,v] [k,v] }`
    Map(Vec<(Argument, Argument)>),
}

impl Argument {
    /// Render any `Display` value
    pub fn display<T: fmt::Display + ?Sized>(value: &T) -> Self {
        Argument::Value(value.to_string())
    }

    /// Render any `Debug` value
    pub fn debug<T: fmt::Debug + ?Sized>(value: &T) -> Self {
        Argument::Value(format!("{:?}", value))
    }

    /// Wrap an error as a throwable argument
    #[track_caller]
    pub fn throwable(error: &(dyn std::error::Error + 'static)) -> Self {
        Argument::Throwable(Throwable::from_error(error))
    }

    pub fn is_throwable(&self) -> bool {
        matches!(self, Argument::Throwable(_))
    }

    pub fn as_throwable(&self) -> Option<&Throwable> {
        match self {
            Argument::Throwable(t) => Some(t),
            _ => None,
        }
    }

    /// Inline (single-line) rendering used inside collections and placeholders
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    pub(crate) fn render_into(&self, out: &mut String) {
        match self {
            Argument::Null => out.push_str("null"),
            Argument::Str(s) | Argument::Value(s) => out.push_str(s),
            Argument::Throwable(t) => out.push_str(t.message()),
            Argument::List(items) => {
                if items.is_empty() {
                    out.push_str("[ ]");
                    return;
                }
                out.push_str("[ ");
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        out.push_str(", ");
                    }
                    item.render_into(out);
                }
                out.push_str(" ]");
            }
            Argument::Map(entries) => {
                if entries.is_empty() {
                    out.push_str("{ }");
                    return;
                }
                out.push_str("{ ");
                for (key, value) in entries {
                    out.push('[');
                    key.render_into(out);
                    out.push(',');
                    value.render_into(out);
                    out.push_str("] ");
                }
                out.push('}');
            }
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for Argument {
    fn from(s: &str) -> Self {
        Argument::Str(s.to_string())
    }
}

impl From<String> for Argument {
    fn from(s: String) -> Self {
        Argument::Str(s)
    }
}

impl From<&String> for Argument {
    fn from(s: &String) -> Self {
        Argument::Str(s.clone())
    }
}

impl From<Throwable> for Argument {
    fn from(t: Throwable) -> Self {
        Argument::Throwable(t)
    }
}

macro_rules! impl_from_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Argument {
                fn from(value: $ty) -> Self {
                    Argument::Value(value.to_string())
                }
            }
        )*
    };
}

impl_from_display!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64
);

impl<T: Into<Argument>> From<Option<T>> for Argument {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Argument::Null)
    }
}

impl<T: Into<Argument>> From<Vec<T>> for Argument {
    fn from(items: Vec<T>) -> Self {
        Argument::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Argument>, const N: usize> From<[T; N]> for Argument {
    fn from(items: [T; N]) -> Self {
        Argument::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Argument> + Clone> From<&[T]> for Argument {
    fn from(items: &[T]) -> Self {
        Argument::List(items.iter().cloned().map(Into::into).collect())
    }
}

impl<K: Into<Argument>, V: Into<Argument>> From<BTreeMap<K, V>> for Argument {
    fn from(map: BTreeMap<K, V>) -> Self {
        Argument::Map(map.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Entries are sorted by their rendered key so the output is stable
impl<K: Into<Argument>, V: Into<Argument>, S> From<HashMap<K, V, S>> for Argument {
    fn from(map: HashMap<K, V, S>) -> Self {
        let mut entries: Vec<(Argument, Argument)> =
            map.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        entries.sort_by_cached_key(|(k, _)| k.render());
        Argument::Map(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Outer(Inner);

    #[derive(Debug)]
    struct Inner;

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "outer failed")
        }
    }

    impl fmt::Display for Inner {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "inner cause")
        }
    }

    impl std::error::Error for Outer {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    impl std::error::Error for Inner {}

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(Argument::from(42).render(), "42");
        assert_eq!(Argument::from(1.5f64).render(), "1.5");
        assert_eq!(Argument::from(true).render(), "true");
        assert_eq!(Argument::from("text").render(), "text");
        assert_eq!(Argument::from(None::<i32>).render(), "null");
        assert_eq!(Argument::from(Some("x")).render(), "x");
    }

    #[test]
    fn test_list_rendering() {
        assert_eq!(Argument::from(vec!["a", "b", "c"]).render(), "[ a, b, c ]");
        assert_eq!(Argument::from(Vec::<i32>::new()).render(), "[ ]");
        assert_eq!(Argument::from([1, 2]).render(), "[ 1, 2 ]");
        let nested = Argument::from(vec![vec![1], vec![2, 3]]);
        assert_eq!(nested.render(), "[ [ 1 ], [ 2, 3 ] ]");
    }

    #[test]
    fn test_map_rendering_is_sorted() {
        let mut map = HashMap::new();
        map.insert("b", 2);
        map.insert("a", 1);
        assert_eq!(Argument::from(map).render(), "{ [a,1] [b,2] }");

        let empty: BTreeMap<String, String> = BTreeMap::new();
        assert_eq!(Argument::from(empty).render(), "{ }");
    }

    #[test]
    fn test_throwable_from_error_collects_causes() {
        let err = Outer(Inner);
        let throwable = Throwable::from_error(&err);
        assert_eq!(throwable.message(), "outer failed");
        assert_eq!(throwable.causes(), ["inner cause".to_string()]);
        assert!(!throwable.frames().is_empty());
        assert!(throwable.frames()[0].contains("argument.rs"));
    }

    #[test]
    fn test_throwable_argument() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let arg = Argument::throwable(&err);
        assert!(arg.is_throwable());
        assert_eq!(arg.render(), "disk gone");
        assert!(Argument::Null.as_throwable().is_none());
    }
}
