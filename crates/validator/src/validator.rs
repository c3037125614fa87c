//! The validator: chain, error registry and result mode in one place
//!
//! [`Validator`] is the composition root. It is built with a consuming,
//! fluent API and then invoked any number of times:
//!
//! ```rust,ignore
//! use rulechain::prelude::*;
//! use serde_json::{json, Value};
//!
//! let name = Validator::new()
//!     .required()
//!     .add_fn(|v, _| Ok(match v.as_str() {
//!         Some(s) => StepOutput::replace(s.trim()),
//!         None => StepOutput::Keep,
//!     }));
//!
//! // Boolean mode (the default): failures collapse to `Rejected`.
//! assert_eq!(name.invoke(json!("  ada "), Some("name"))?, Verdict::Accepted(json!("ada")));
//! assert_eq!(name.invoke(Value::Null, Some("name"))?, Verdict::Rejected);
//!
//! // Structured mode: failures carry key and message.
//! let name = name.to_bool(false);
//! let verdict = name.invoke(Value::Null, Some("name"))?;
//! assert_eq!(verdict.failure().unwrap().message, "name is required");
//! ```

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::combinators::alternatives::{Alternatives, Condition};
use crate::factory::ValidatorFactory;
use crate::foundation::{
    Chain, ChainError, ConfigError, Failure, Signal, Step, StepContext, StepResult, invoke,
    step_fn,
};
use crate::registry::ErrorRegistry;
use crate::validators::Required;

// ============================================================================
// RESULT MODE
// ============================================================================

/// How a failed invocation is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultMode {
    /// Failures become [`Verdict::Rejected`].
    #[default]
    Boolean,
    /// Failures become [`Verdict::Failed`].
    Structured,
}

// ============================================================================
// VERDICT
// ============================================================================

/// Outcome of [`Validator::invoke`].
///
/// Success is never collapsed: an accepted value is returned in either mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The value passed; holds the final threaded value.
    Accepted(Value),
    /// The value failed, reported in boolean mode.
    Rejected,
    /// The value failed, reported in structured mode.
    Failed(Failure),
}

impl Verdict {
    /// Returns `true` if the value passed.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// Boolean view: `false` for any failure.
    #[must_use]
    pub fn as_bool(&self) -> bool {
        self.is_accepted()
    }

    /// The accepted value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Accepted(value) => Some(value),
            _ => None,
        }
    }

    /// Consumes the verdict, returning the accepted value.
    #[must_use]
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Accepted(value) => Some(value),
            _ => None,
        }
    }

    /// The structured failure, if any.
    #[must_use]
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    /// Converts to a `Result`; `Rejected` becomes `Err(None)`.
    pub fn into_result(self) -> Result<Value, Option<Failure>> {
        match self {
            Self::Accepted(value) => Ok(value),
            Self::Rejected => Err(None),
            Self::Failed(failure) => Err(Some(failure)),
        }
    }
}

// ============================================================================
// VALIDATOR
// ============================================================================

/// Owns a [`Chain`], an [`ErrorRegistry`] and a [`ResultMode`].
///
/// Cloning is cheap: steps and registry are shared.
#[derive(Clone, Default)]
pub struct Validator {
    chain: Chain,
    registry: Arc<ErrorRegistry>,
    mode: ResultMode,
    factory: Option<Arc<dyn ValidatorFactory>>,
}

impl Validator {
    /// Empty validator with the baseline registry, in boolean mode.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty validator using `registry` for its messages.
    #[must_use]
    pub fn with_registry(registry: ErrorRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            ..Self::default()
        }
    }

    /// Sets the factory used by [`rule`](Self::rule).
    #[must_use = "builder methods must be chained or built"]
    pub fn with_factory(mut self, factory: Arc<dyn ValidatorFactory>) -> Self {
        self.factory = Some(factory);
        self
    }

    // ------------------------------------------------------------------
    // Builder
    // ------------------------------------------------------------------

    /// Appends the built-in `required` step.
    #[must_use = "builder methods must be chained or built"]
    pub fn required(mut self) -> Self {
        self.chain.push(Required);
        self
    }

    /// Appends a step.
    #[must_use = "builder methods must be chained or built"]
    pub fn add(mut self, step: impl Step + 'static) -> Self {
        self.chain.push(step);
        self
    }

    /// Appends a closure `(value, key) -> StepResult` as a step.
    #[must_use = "builder methods must be chained or built"]
    pub fn add_fn<F>(self, f: F) -> Self
    where
        F: Fn(&Value, Option<&str>) -> StepResult + Send + Sync + 'static,
    {
        self.add(step_fn(f))
    }

    /// Appends one conditional branch built from `conditions`.
    #[must_use = "builder methods must be chained or built"]
    pub fn alternatives(self, conditions: Vec<Condition>) -> Self {
        self.add(Alternatives::new(conditions))
    }

    /// Sets the result mode: `true` for boolean, `false` for structured.
    #[must_use = "builder methods must be chained or built"]
    #[allow(clippy::wrong_self_convention)] // consuming builder, not a conversion
    pub fn to_bool(mut self, flag: bool) -> Self {
        self.mode = if flag {
            ResultMode::Boolean
        } else {
            ResultMode::Structured
        };
        self
    }

    /// Builds the named rule with the factory and appends its steps.
    ///
    /// The appended steps keep using the rule's own error registry.
    pub fn rule(mut self, name: &str, args: &[Value]) -> Result<Self, ConfigError> {
        let factory = self.factory.as_ref().ok_or_else(|| ConfigError::NoFactory {
            name: name.to_owned(),
        })?;
        if !factory.knows(name) {
            return Err(ConfigError::UnknownRule {
                name: name.to_owned(),
            });
        }
        let steps = factory.build(name, args)?.scoped_steps();
        debug!(rule = name, steps = steps.len(), "appending factory rule");
        self.chain.extend_from_slice(&steps);
        Ok(self)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Read-only view of the chain's steps.
    pub fn steps(&self) -> &[Arc<dyn Step>] {
        self.chain.steps()
    }

    /// The chain.
    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    /// The error registry.
    pub fn registry(&self) -> &ErrorRegistry {
        &self.registry
    }

    /// The result mode.
    pub fn mode(&self) -> ResultMode {
        self.mode
    }

    /// Returns `true` in boolean mode.
    pub fn is_bool_mode(&self) -> bool {
        self.mode == ResultMode::Boolean
    }

    /// Steps wrapped so their rejections resolve against this registry.
    ///
    /// Used when the rules of this validator are spliced into another one.
    pub fn scoped_steps(&self) -> Vec<Arc<dyn Step>> {
        self.chain
            .steps()
            .iter()
            .map(|step| {
                Arc::new(Scoped {
                    inner: Arc::clone(step),
                    registry: Arc::clone(&self.registry),
                }) as Arc<dyn Step>
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Invocation
    // ------------------------------------------------------------------

    /// Runs the chain and shapes the outcome according to the result mode.
    ///
    /// Configuration errors are returned as `Err` in both modes.
    pub fn invoke(&self, value: Value, key: Option<&str>) -> Result<Verdict, ConfigError> {
        match self.validate(value, key) {
            Ok(value) => Ok(Verdict::Accepted(value)),
            Err(ChainError::Validation(failure)) => {
                debug!(key = %failure.key, "value rejected");
                Ok(match self.mode {
                    ResultMode::Boolean => Verdict::Rejected,
                    ResultMode::Structured => Verdict::Failed(failure),
                })
            }
            Err(ChainError::Configuration(err)) => Err(err),
        }
    }

    /// Runs the chain, ignoring the result mode.
    pub fn validate(&self, value: Value, key: Option<&str>) -> Result<Value, ChainError> {
        invoke(&self.chain, value, key).map_err(|signal| self.settle(signal))
    }

    /// Runs the chain for a yes/no answer, as a branch guard does.
    pub fn check(&self, value: Value) -> Result<bool, ConfigError> {
        match self.validate(value, None) {
            Ok(_) => Ok(true),
            Err(ChainError::Validation(_)) => Ok(false),
            Err(ChainError::Configuration(err)) => Err(err),
        }
    }

    /// Builds the error for `key` with this validator's registry.
    pub fn create_failure(
        &self,
        key: impl Into<Cow<'static, str>>,
        value: Option<&Value>,
        value_key: Option<&str>,
    ) -> ChainError {
        self.registry.create_failure(key, value, value_key)
    }

    fn settle(&self, signal: Signal) -> ChainError {
        match signal {
            Signal::Reject(rejection) => self.registry.resolve(rejection),
            Signal::Failed(failure) => ChainError::Validation(failure),
            Signal::Fatal(err) => ChainError::Configuration(err),
        }
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("chain", &self.chain)
            .field("mode", &self.mode)
            .field("factory", &self.factory.is_some())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// SCOPED STEP
// ============================================================================

/// A step borrowed from another validator, resolving its rejections
/// against that validator's registry.
struct Scoped {
    inner: Arc<dyn Step>,
    registry: Arc<ErrorRegistry>,
}

impl Step for Scoped {
    fn apply(&self, value: &Value, key: Option<&str>, cx: &mut StepContext) -> StepResult {
        self.inner
            .apply(value, key, cx)
            .map_err(|signal| match signal {
                Signal::Reject(rejection) => self.registry.resolve(rejection).into(),
                other => other,
            })
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::{Rejection, StepOutput};
    use crate::registry::ErrorHandlerEntry;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn default_mode_is_boolean() {
        assert_eq!(Validator::new().mode(), ResultMode::Boolean);
        assert!(Validator::new().is_bool_mode());
    }

    #[test]
    fn success_is_not_collapsed_in_boolean_mode() {
        let validator = Validator::new().required();
        assert_eq!(
            validator.invoke(json!("x"), None).unwrap(),
            Verdict::Accepted(json!("x"))
        );
    }

    #[test]
    fn mode_shapes_failures() {
        let validator = Validator::new().required();
        assert_eq!(validator.invoke(Value::Null, None).unwrap(), Verdict::Rejected);

        let validator = validator.to_bool(false);
        assert_eq!(
            validator.invoke(Value::Null, Some("age")).unwrap(),
            Verdict::Failed(Failure::new("required", "age is required"))
        );
    }

    #[test]
    fn configuration_errors_propagate_in_both_modes() {
        let validator =
            Validator::new().add_fn(|_, _| Err(Rejection::new("nonexistent-key").into()));

        for v in [validator.clone(), validator.to_bool(false)] {
            assert!(matches!(
                v.invoke(json!(1), None),
                Err(ConfigError::UnknownErrorKey { .. })
            ));
        }
    }

    #[test]
    fn custom_registry_is_used() {
        let registry = ErrorRegistry::baseline()
            .with_entry("even", ErrorHandlerEntry::new("{} must be even"));
        let validator = Validator::with_registry(registry)
            .add_fn(|v, _| match v.as_i64() {
                Some(n) if n % 2 == 0 => Ok(StepOutput::Keep),
                _ => Err(Rejection::new("even").with_value(v.clone()).into()),
            })
            .to_bool(false);

        let verdict = validator.invoke(json!(3), None).unwrap();
        assert_eq!(verdict.failure().unwrap().message, "\"3\" must be even");
    }

    #[test]
    fn check_is_independent_of_mode() {
        let validator = Validator::new().required().to_bool(false);
        assert!(validator.check(json!(1)).unwrap());
        assert!(!validator.check(Value::Null).unwrap());
        assert_eq!(validator.mode(), ResultMode::Structured);
    }

    #[test]
    fn scoped_steps_use_their_own_registry() {
        let inner = Validator::with_registry(
            ErrorRegistry::baseline()
                .with_entry("required", ErrorHandlerEntry::new("{} missing (inner)")),
        )
        .required();

        let outer = Validator::new().to_bool(false);
        let outer = inner
            .scoped_steps()
            .into_iter()
            .fold(outer, |v, step| v.add(step));

        let verdict = outer.invoke(Value::Null, Some("id")).unwrap();
        assert_eq!(verdict.failure().unwrap().message, "id missing (inner)");
    }

    #[test]
    fn verdict_helpers() {
        let accepted = Verdict::Accepted(json!(1));
        assert!(accepted.as_bool());
        assert_eq!(accepted.value(), Some(&json!(1)));
        assert_eq!(accepted.into_result(), Ok(json!(1)));

        assert!(!Verdict::Rejected.as_bool());
        assert_eq!(Verdict::Rejected.into_result(), Err(None));

        let failed = Verdict::Failed(Failure::new("k", "m"));
        assert_eq!(failed.failure().map(|f| f.key.as_ref()), Some("k"));
        assert_eq!(failed.into_value(), None);
    }

    #[test]
    fn rule_without_factory_is_configuration_error() {
        let result = Validator::new().rule("email", &[]);
        assert!(matches!(result, Err(ConfigError::NoFactory { name }) if name == "email"));
    }
}
