//! ALTERNATIVES combinator - guarded conditional branching
//!
//! [`Alternatives`] evaluates an ordered list of [`Condition`]s against the
//! threaded value. Each condition has a guard validator and optional `then`
//! and `otherwise` targets; a target is either a literal value or the rules
//! of another validator.
//!
//! On a matching target:
//!
//! - a **literal** (non-null) value becomes the replacement value and the
//!   remaining conditions are skipped;
//! - a **rules** target is spliced onto the end of the running chain and
//!   the loop moves on to the next condition.
//!
//! Rule targets are flattened when the condition is built, so invoking the
//! branch never modifies any chain.
//!
//! # Examples
//!
//! ```rust,ignore
//! use rulechain::prelude::*;
//! use serde_json::json;
//!
//! let is_null = Validator::new().add_fn(|v, _| match v {
//!     Value::Null => Ok(StepOutput::Keep),
//!     _ => Err(Rejection::new("default").into()),
//! });
//!
//! // Fill in a default when the value is missing.
//! let port = Validator::new()
//!     .alternatives(vec![Condition::when(is_null).then_value(8080)])
//!     .to_bool(false);
//!
//! assert_eq!(port.invoke(Value::Null, None)?.into_value(), Some(json!(8080)));
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::foundation::{ConfigError, Step, StepContext, StepOutput, StepResult};
use crate::validator::Validator;

// ============================================================================
// TARGET
// ============================================================================

/// What a matched condition leads to.
#[derive(Clone)]
pub enum Target {
    /// Substitute this value and stop evaluating conditions.
    Value(Value),
    /// Splice these steps onto the running chain and keep evaluating.
    Rules(Vec<Arc<dyn Step>>),
}

impl Target {
    /// Flattens `validator` into a rules target.
    ///
    /// The steps keep resolving their rejections against `validator`'s own
    /// error registry.
    pub fn rules(validator: &Validator) -> Self {
        Self::Rules(validator.scoped_steps())
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Rules(steps) => f.debug_tuple("Rules").field(&steps.len()).finish(),
        }
    }
}

impl From<Value> for Target {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<&Validator> for Target {
    fn from(validator: &Validator) -> Self {
        Self::rules(validator)
    }
}

impl From<Validator> for Target {
    fn from(validator: Validator) -> Self {
        Self::rules(&validator)
    }
}

// ============================================================================
// CONDITION
// ============================================================================

/// A guard plus the targets taken when it passes or fails.
///
/// The guard is stored in boolean result mode, independently of how the
/// caller configured it.
#[derive(Debug, Clone)]
pub struct Condition {
    guard: Validator,
    then: Option<Target>,
    otherwise: Option<Target>,
}

impl Condition {
    /// Starts a condition guarded by `guard`.
    pub fn when(guard: Validator) -> Self {
        Self {
            guard: guard.to_bool(true),
            then: None,
            otherwise: None,
        }
    }

    /// Target taken when the guard passes.
    #[must_use = "builder methods must be chained or built"]
    pub fn then(mut self, target: impl Into<Target>) -> Self {
        self.then = Some(target.into());
        self
    }

    /// Substitutes `value` when the guard passes.
    #[must_use = "builder methods must be chained or built"]
    pub fn then_value(self, value: impl Into<Value>) -> Self {
        self.then(Target::Value(value.into()))
    }

    /// Splices `rules` when the guard passes.
    #[must_use = "builder methods must be chained or built"]
    pub fn then_rules(self, rules: &Validator) -> Self {
        self.then(Target::rules(rules))
    }

    /// Target taken when the guard fails.
    #[must_use = "builder methods must be chained or built"]
    pub fn otherwise(mut self, target: impl Into<Target>) -> Self {
        self.otherwise = Some(target.into());
        self
    }

    /// Substitutes `value` when the guard fails.
    #[must_use = "builder methods must be chained or built"]
    pub fn otherwise_value(self, value: impl Into<Value>) -> Self {
        self.otherwise(Target::Value(value.into()))
    }

    /// Splices `rules` when the guard fails.
    #[must_use = "builder methods must be chained or built"]
    pub fn otherwise_rules(self, rules: &Validator) -> Self {
        self.otherwise(Target::rules(rules))
    }

    /// The guard, already in boolean mode.
    pub fn guard(&self) -> &Validator {
        &self.guard
    }
}

// ============================================================================
// ALTERNATIVES STEP
// ============================================================================

/// Step evaluating a list of [`Condition`]s.
#[derive(Debug, Clone)]
pub struct Alternatives {
    conditions: Vec<Condition>,
}

impl Alternatives {
    /// Creates the step from conditions evaluated in list order.
    pub fn new(conditions: Vec<Condition>) -> Self {
        Self { conditions }
    }

    /// The conditions, in evaluation order.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }
}

impl Step for Alternatives {
    fn apply(&self, value: &Value, _key: Option<&str>, cx: &mut StepContext) -> StepResult {
        for (index, condition) in self.conditions.iter().enumerate() {
            let target = if condition.guard.check(value.clone())? {
                match &condition.then {
                    Some(target) => Some(target),
                    None => return Err(ConfigError::MissingThen { index }.into()),
                }
            } else {
                condition.otherwise.as_ref()
            };

            match target {
                Some(Target::Rules(steps)) => {
                    debug!(index, steps = steps.len(), "splicing rules");
                    cx.splice(steps);
                }
                Some(Target::Value(literal)) if !literal.is_null() => {
                    debug!(index, "substituting literal");
                    return Ok(StepOutput::Replace(literal.clone()));
                }
                _ => {}
            }
        }

        Ok(StepOutput::Keep)
    }

    fn name(&self) -> &str {
        "alternatives"
    }
}

/// Creates an [`Alternatives`] step.
pub fn alternatives(conditions: Vec<Condition>) -> Alternatives {
    Alternatives::new(conditions)
}
