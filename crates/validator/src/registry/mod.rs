//! Keyed error-template registry
//!
//! The [`ErrorRegistry`] maps error keys to message templates and turns a
//! raised key into a [`Failure`]. Every registry starts from a fixed baseline
//! (`default` and `required`); caller entries are merged over it.
//!
//! # Examples
//!
//! ```rust,ignore
//! use rulechain::registry::{ErrorHandlerEntry, ErrorRegistry};
//! use serde_json::json;
//!
//! let registry = ErrorRegistry::baseline()
//!     .with_entry("min_length", ErrorHandlerEntry::new("{} is too short"));
//!
//! let err = registry.create_failure("min_length", Some(&json!("ab")), None);
//! assert_eq!(err.as_failure().unwrap().message, "\"ab\" is too short");
//! ```

pub mod config;
pub mod format;

use std::borrow::Cow;
use std::collections::HashMap;

use serde_json::Value;
use tracing::warn;

use crate::foundation::{ChainError, ConfigError, Failure, Rejection};

pub use config::{EntryConfig, RegistryConfig};
pub use format::{Formatter, FormatterRef, format_default, quote};

/// Key of the fixed fallback entry.
pub const DEFAULT_KEY: &str = "default";

/// Key raised by the built-in `required` step.
pub const REQUIRED_KEY: &str = "required";

/// Template of the fixed fallback entry.
pub const FALLBACK_TEMPLATE: &str = "Invalid value";

// ============================================================================
// ENTRY
// ============================================================================

/// Template, default label and formatter for one error key.
#[derive(Debug, Clone)]
pub struct ErrorHandlerEntry {
    template: String,
    default_label: Option<String>,
    formatter: Option<FormatterRef>,
}

impl ErrorHandlerEntry {
    /// Creates an entry from a template with a single `{}` slot.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            default_label: None,
            formatter: None,
        }
    }

    /// Sets the label used when a failure carries none.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.default_label = Some(label.into());
        self
    }

    /// Sets the formatter for this entry.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_formatter(mut self, formatter: impl Into<FormatterRef>) -> Self {
        self.formatter = Some(formatter.into());
        self
    }

    /// Message template.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Default display label, if any.
    pub fn default_label(&self) -> Option<&str> {
        self.default_label.as_deref()
    }

    fn from_config(config: EntryConfig) -> Self {
        Self {
            template: config.message,
            default_label: config.label,
            formatter: config.formatter.map(FormatterRef::Named),
        }
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Maps error keys to message templates and builds failures.
#[derive(Debug, Clone)]
pub struct ErrorRegistry {
    entries: HashMap<String, ErrorHandlerEntry>,
    formatter: Option<FormatterRef>,
    named: HashMap<String, Formatter>,
}

impl Default for ErrorRegistry {
    fn default() -> Self {
        Self::baseline()
    }
}

impl ErrorRegistry {
    /// Registry holding only the built-in entries.
    ///
    /// The `default` entry is the fallback for unknown keys and stays fixed
    /// for the registry's lifetime.
    #[must_use]
    pub fn baseline() -> Self {
        let mut entries = HashMap::new();
        entries.insert(
            DEFAULT_KEY.to_owned(),
            ErrorHandlerEntry::new(FALLBACK_TEMPLATE),
        );
        entries.insert(
            REQUIRED_KEY.to_owned(),
            ErrorHandlerEntry::new("{} is required").with_label("value"),
        );

        Self {
            entries,
            formatter: None,
            named: HashMap::new(),
        }
    }

    /// Baseline merged with `config`.
    #[must_use]
    pub fn from_config(config: RegistryConfig) -> Self {
        Self::baseline().merge_config(config)
    }

    /// Baseline merged with a JSON [`RegistryConfig`] document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(Self::from_config(RegistryConfig::from_json(json)?))
    }

    /// Merges `config` over the current entries.
    #[must_use = "builder methods must be chained or built"]
    pub fn merge_config(mut self, config: RegistryConfig) -> Self {
        if let Some(name) = config.formatter {
            self.formatter = Some(FormatterRef::Named(name));
        }
        for (key, entry) in config.entries {
            self.insert(key, ErrorHandlerEntry::from_config(entry));
        }
        self
    }

    /// Adds or replaces the entry for `key`.
    ///
    /// The fallback entry under [`DEFAULT_KEY`] is fixed; attempts to replace
    /// it are ignored.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_entry(mut self, key: impl Into<String>, entry: ErrorHandlerEntry) -> Self {
        self.insert(key.into(), entry);
        self
    }

    fn insert(&mut self, key: String, entry: ErrorHandlerEntry) {
        if key == DEFAULT_KEY {
            warn!(key = DEFAULT_KEY, "the fallback entry cannot be replaced");
            return;
        }
        self.entries.insert(key, entry);
    }

    /// Sets the registry-level formatter, used by entries without their own.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_formatter(mut self, formatter: impl Into<FormatterRef>) -> Self {
        self.formatter = Some(formatter.into());
        self
    }

    /// Registers a formatter that configuration can refer to by name.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_named_formatter(mut self, name: impl Into<String>, formatter: Formatter) -> Self {
        self.named.insert(name.into(), formatter);
        self
    }

    /// Looks up the entry for `key`.
    pub fn entry(&self, key: &str) -> Option<&ErrorHandlerEntry> {
        self.entries.get(key)
    }

    /// Returns `true` if `key` resolves.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Registered keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Builds the error raised for `key`.
    ///
    /// Always yields an error:
    ///
    /// - a [`ChainError::Configuration`] when `key` is unknown (carrying the
    ///   fallback template) or its formatter does not resolve;
    /// - a [`ChainError::Validation`] otherwise.
    ///
    /// The display value is `value_key` if given, else the entry's default
    /// label, else the quoted form of `value`.
    pub fn create_failure(
        &self,
        key: impl Into<Cow<'static, str>>,
        value: Option<&Value>,
        value_key: Option<&str>,
    ) -> ChainError {
        let key = key.into();

        let Some(entry) = self.entries.get(key.as_ref()) else {
            warn!(key = %key, "error key is not registered");
            return ConfigError::UnknownErrorKey {
                key: key.into_owned(),
                message: FALLBACK_TEMPLATE.to_owned(),
            }
            .into();
        };

        let formatter = match self.resolve_formatter(&key, entry) {
            Ok(formatter) => formatter,
            Err(err) => return err.into(),
        };

        let display = match (value_key, entry.default_label()) {
            (Some(label), _) | (None, Some(label)) => label.to_owned(),
            (None, None) => quote(value.unwrap_or(&Value::Null)),
        };

        let message = match formatter {
            Some(formatter) => formatter.format(entry.template(), &display),
            None => format_default(entry.template(), &display),
        };

        Failure::new(key, message).into()
    }

    /// Resolves a step's [`Rejection`] through [`create_failure`](Self::create_failure).
    pub fn resolve(&self, rejection: Rejection) -> ChainError {
        self.create_failure(
            rejection.key,
            rejection.value.as_ref(),
            rejection.label.as_deref(),
        )
    }

    fn resolve_formatter<'a>(
        &'a self,
        key: &str,
        entry: &'a ErrorHandlerEntry,
    ) -> Result<Option<&'a Formatter>, ConfigError> {
        match entry.formatter.as_ref().or(self.formatter.as_ref()) {
            None => Ok(None),
            Some(FormatterRef::Inline(formatter)) => Ok(Some(formatter)),
            Some(FormatterRef::Named(name)) => match self.named.get(name) {
                Some(formatter) => Ok(Some(formatter)),
                None => {
                    warn!(key, formatter = %name, "formatter is not registered");
                    Err(ConfigError::FormatterNotCallable {
                        key: key.to_owned(),
                        formatter: name.clone(),
                    })
                }
            },
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
