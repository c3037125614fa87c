//! Error types for chain invocation
//!
//! Two families of errors exist and they never mix:
//!
//! - [`Failure`] is the structured outcome of a rejected value. It is
//!   recoverable and gets shaped by the validator's result mode.
//! - [`ConfigError`] reports a mistake in how a chain or registry was built.
//!   It always reaches the caller, whatever the result mode says.
//!
//! [`ChainError`] carries either one out of a mode-independent invocation,
//! and [`Rejection`] / [`Signal`] are what steps raise while a chain runs.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// FAILURE
// ============================================================================

/// A rejected value: the error key plus the formatted message.
///
/// Produced once, at the failure boundary, by
/// [`ErrorRegistry::create_failure`](crate::registry::ErrorRegistry::create_failure).
///
/// # Examples
///
/// ```rust,ignore
/// use rulechain::foundation::Failure;
///
/// let failure = Failure::new("required", "email is required");
/// assert_eq!(failure.key, "required");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    /// Registry key the failure was raised under.
    ///
    /// Examples: "required", "min_length"
    pub key: Cow<'static, str>,

    /// Message produced from the key's template.
    pub message: String,
}

impl Failure {
    /// Creates a failure from a key and an already formatted message.
    pub fn new(key: impl Into<Cow<'static, str>>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Converts the failure to a JSON object.
    pub fn to_json_value(&self) -> Value {
        serde_json::json!({
            "key": self.key,
            "message": self.message,
        })
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.message)
    }
}

impl std::error::Error for Failure {}

// ============================================================================
// CONFIGURATION ERROR
// ============================================================================

/// A misconfigured chain or registry.
///
/// Never downgraded to `false` and never wrapped as a [`Failure`]: it
/// indicates a programming error in chain construction, not a bad input.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A step raised a key that the registry does not know.
    ///
    /// `message` is the fixed fallback entry's template.
    #[error("unknown error key '{key}': {message}")]
    UnknownErrorKey { key: String, message: String },

    /// A formatter reference did not resolve to a callable formatter.
    #[error("formatter '{formatter}' configured for error key '{key}' is not callable")]
    FormatterNotCallable { key: String, formatter: String },

    /// A condition matched but carries no `then` target.
    #[error("alternatives condition #{index} matched but has no `then` target")]
    MissingThen { index: usize },

    /// A named rule was requested from a validator without a factory.
    #[error("no validator factory configured, cannot build rule '{name}'")]
    NoFactory { name: String },

    /// The factory does not know the requested rule.
    #[error("unknown rule '{name}'")]
    UnknownRule { name: String },

    /// The factory rejected the arguments of a rule.
    #[error("invalid arguments for rule '{name}': {reason}")]
    InvalidRuleArgs { name: String, reason: String },

    /// A registry configuration document could not be parsed.
    #[error("invalid registry configuration: {0}")]
    InvalidRegistry(String),
}

impl ConfigError {
    /// Key under which the error is reported, mirroring [`Failure::key`].
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::UnknownErrorKey { .. } => "default",
            Self::FormatterNotCallable { .. } => "formatter.not_callable",
            Self::MissingThen { .. } => "alternatives.missing_then",
            Self::NoFactory { .. } => "factory.missing",
            Self::UnknownRule { .. } => "factory.unknown_rule",
            Self::InvalidRuleArgs { .. } => "factory.invalid_args",
            Self::InvalidRegistry(_) => "registry.invalid",
        }
    }

    /// Convenience constructor for [`ConfigError::InvalidRuleArgs`].
    pub fn invalid_args(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRuleArgs {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidRegistry(err.to_string())
    }
}

// ============================================================================
// CHAIN ERROR
// ============================================================================

/// Either kind of error an invocation can end with.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ChainError {
    /// The value was rejected.
    #[error(transparent)]
    Validation(#[from] Failure),

    /// The chain or registry is misconfigured.
    #[error(transparent)]
    Configuration(#[from] ConfigError),
}

impl ChainError {
    /// Returns `true` for configuration errors.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Returns the error key of either variant.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Validation(failure) => &failure.key,
            Self::Configuration(err) => err.key(),
        }
    }

    /// Returns the failure if this is a validation error.
    #[must_use]
    pub fn as_failure(&self) -> Option<&Failure> {
        match self {
            Self::Validation(failure) => Some(failure),
            Self::Configuration(_) => None,
        }
    }
}

// ============================================================================
// STEP SIGNALS
// ============================================================================

/// An unformatted rejection raised by a step.
///
/// Carries what the registry needs to build the message: the error key, the
/// offending value and an optional display label.
///
/// # Examples
///
/// ```rust,ignore
/// use rulechain::foundation::Rejection;
/// use serde_json::json;
///
/// let rejection = Rejection::new("min_length")
///     .with_value(json!("ab"))
///     .with_label("username");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// Registry key to resolve.
    pub key: Cow<'static, str>,
    /// Value shown in the message when no label applies.
    pub value: Option<Value>,
    /// Label shown in place of the value.
    pub label: Option<String>,
}

impl Rejection {
    /// Creates a rejection for `key`.
    pub fn new(key: impl Into<Cow<'static, str>>) -> Self {
        Self {
            key: key.into(),
            value: None,
            label: None,
        }
    }

    /// Attaches the offending value.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    /// Attaches a display label.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// What a step raises to abort the chain.
#[derive(Debug, Clone)]
pub enum Signal {
    /// Rejection still to be resolved against a registry.
    Reject(Rejection),
    /// Failure already resolved, by a step scoped to another registry.
    Failed(Failure),
    /// Configuration error; always fatal.
    Fatal(ConfigError),
}

impl From<Rejection> for Signal {
    fn from(rejection: Rejection) -> Self {
        Self::Reject(rejection)
    }
}

impl From<ConfigError> for Signal {
    fn from(err: ConfigError) -> Self {
        Self::Fatal(err)
    }
}

impl From<ChainError> for Signal {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::Validation(failure) => Self::Failed(failure),
            ChainError::Configuration(err) => Self::Fatal(err),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn failure_display() {
        let failure = Failure::new("required", "email is required");
        assert_eq!(failure.to_string(), "required: email is required");
    }

    #[test]
    fn failure_json() {
        let failure = Failure::new("required", "value is required");
        assert_eq!(
            failure.to_json_value(),
            serde_json::json!({"key": "required", "message": "value is required"})
        );
    }

    #[test]
    fn static_key_is_borrowed() {
        let failure = Failure::new("required", "x");
        assert!(matches!(failure.key, Cow::Borrowed(_)));
    }

    #[test]
    fn chain_error_classification() {
        let validation = ChainError::from(Failure::new("required", "x"));
        assert!(!validation.is_configuration());
        assert_eq!(validation.key(), "required");

        let config = ChainError::from(ConfigError::MissingThen { index: 2 });
        assert!(config.is_configuration());
        assert_eq!(config.key(), "alternatives.missing_then");
        assert!(config.as_failure().is_none());
    }

    #[test]
    fn missing_then_message() {
        let err = ConfigError::MissingThen { index: 1 };
        assert_eq!(
            err.to_string(),
            "alternatives condition #1 matched but has no `then` target"
        );
    }

    #[test]
    fn serde_error_maps_to_invalid_registry() {
        let err: ConfigError = serde_json::from_str::<Value>("{")
            .map_err(ConfigError::from)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRegistry(_)));
    }

    #[test]
    fn signal_from_chain_error() {
        let signal = Signal::from(ChainError::from(Failure::new("k", "m")));
        assert!(matches!(signal, Signal::Failed(f) if f.key == "k"));

        let signal = Signal::from(ChainError::from(ConfigError::NoFactory { name: "x".into() }));
        assert!(matches!(signal, Signal::Fatal(ConfigError::NoFactory { .. })));
    }
}
