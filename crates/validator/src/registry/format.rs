//! Message formatting
//!
//! A template holds a single `{}` slot that receives the display value.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Slot replaced by the display value.
pub const SLOT: &str = "{}";

/// Callable turning `(template, display_value)` into a message.
#[derive(Clone)]
pub struct Formatter(Arc<dyn Fn(&str, &str) -> String + Send + Sync>);

impl Formatter {
    /// Wraps a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str, &str) -> String + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Formats `template` with `display`.
    pub fn format(&self, template: &str, display: &str) -> String {
        (self.0)(template, display)
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(format_default)
    }
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Formatter")
    }
}

/// Reference to a formatter: either the callable itself or a name resolved
/// against the registry's named formatters at format time.
#[derive(Debug, Clone)]
pub enum FormatterRef {
    /// Callable supplied in code.
    Inline(Formatter),
    /// Name of a formatter registered with the registry.
    Named(String),
}

impl From<Formatter> for FormatterRef {
    fn from(formatter: Formatter) -> Self {
        Self::Inline(formatter)
    }
}

/// Substitutes `display` into the first slot of `template`.
///
/// Templates without a slot are returned unchanged.
pub fn format_default(template: &str, display: &str) -> String {
    template.replacen(SLOT, display, 1)
}

/// Quoted string form of a value, as shown in messages.
///
/// Strings are quoted as they are; everything else is quoted in its JSON
/// form.
pub fn quote(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{s}\""),
        other => format!("\"{other}\""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn default_fills_single_slot() {
        assert_eq!(format_default("{} is required", "email"), "email is required");
    }

    #[test]
    fn default_fills_only_first_slot() {
        assert_eq!(format_default("{} and {}", "a"), "a and {}");
    }

    #[test]
    fn default_without_slot() {
        assert_eq!(format_default("Invalid value", "x"), "Invalid value");
    }

    #[test]
    fn quoting() {
        assert_eq!(quote(&json!("abc")), "\"abc\"");
        assert_eq!(quote(&json!(42)), "\"42\"");
        assert_eq!(quote(&Value::Null), "\"null\"");
        assert_eq!(quote(&json!([1, 2])), "\"[1,2]\"");
    }

    #[test]
    fn custom_formatter() {
        let upper = Formatter::new(|template, display| {
            format_default(template, &display.to_uppercase())
        });
        assert_eq!(upper.format("{}!", "hey"), "HEY!");
    }
}
