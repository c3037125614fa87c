//! The step abstraction
//!
//! A [`Step`] is one unit of validation logic. It looks at the threaded value,
//! and either leaves it alone, replaces it, or aborts the chain with a
//! [`Signal`].

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use smallvec::SmallVec;

use crate::foundation::error::Signal;

// ============================================================================
// STEP OUTPUT
// ============================================================================

/// What a successful step does to the threaded value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StepOutput {
    /// No replacement; the next step sees the same value.
    #[default]
    Keep,
    /// The next step sees this value instead.
    Replace(Value),
}

impl StepOutput {
    /// Shorthand for [`StepOutput::Replace`].
    pub fn replace(value: impl Into<Value>) -> Self {
        Self::Replace(value.into())
    }
}

/// Result type returned by [`Step::apply`].
pub type StepResult = Result<StepOutput, Signal>;

// ============================================================================
// STEP CONTEXT
// ============================================================================

/// Per-invocation state handed to each step.
///
/// Steps queued through [`splice`](Self::splice) run after every step of the
/// owning chain, in the order they were queued. The owning chain itself is
/// never modified.
#[derive(Default)]
pub struct StepContext {
    spliced: SmallVec<[Arc<dyn Step>; 4]>,
}

impl StepContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `steps` onto the end of the running chain.
    pub fn splice(&mut self, steps: &[Arc<dyn Step>]) {
        self.spliced.extend(steps.iter().cloned());
    }

    /// Number of steps queued so far in this invocation.
    #[must_use]
    pub fn spliced_len(&self) -> usize {
        self.spliced.len()
    }

    pub(crate) fn spliced_step(&self, index: usize) -> Option<Arc<dyn Step>> {
        self.spliced.get(index).cloned()
    }
}

impl fmt::Debug for StepContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepContext")
            .field("spliced", &self.spliced.len())
            .finish()
    }
}

// ============================================================================
// STEP TRAIT
// ============================================================================

/// One unit of validation logic inside a chain.
///
/// # Examples
///
/// ```rust,ignore
/// use rulechain::foundation::{Rejection, Step, StepContext, StepOutput, StepResult};
/// use serde_json::Value;
///
/// struct NotEmpty;
///
/// impl Step for NotEmpty {
///     fn apply(&self, value: &Value, key: Option<&str>, _cx: &mut StepContext) -> StepResult {
///         match value.as_str() {
///             Some("") => Err(Rejection::new("not_empty").with_value(value.clone()).into()),
///             _ => Ok(StepOutput::Keep),
///         }
///     }
/// }
/// ```
pub trait Step: Send + Sync {
    /// Runs the step against the current value.
    fn apply(&self, value: &Value, key: Option<&str>, cx: &mut StepContext) -> StepResult;

    /// Short name used in logs.
    fn name(&self) -> &str {
        "custom"
    }
}

impl<S: Step + ?Sized> Step for Arc<S> {
    fn apply(&self, value: &Value, key: Option<&str>, cx: &mut StepContext) -> StepResult {
        (**self).apply(value, key, cx)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

// ============================================================================
// FUNCTION STEPS
// ============================================================================

/// A step backed by a closure `(value, key) -> StepResult`.
///
/// Built with [`step_fn`].
#[derive(Clone)]
pub struct FnStep<F> {
    f: F,
}

impl<F> Step for FnStep<F>
where
    F: Fn(&Value, Option<&str>) -> StepResult + Send + Sync,
{
    fn apply(&self, value: &Value, key: Option<&str>, _cx: &mut StepContext) -> StepResult {
        (self.f)(value, key)
    }

    fn name(&self) -> &str {
        "fn"
    }
}

impl<F> fmt::Debug for FnStep<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnStep")
    }
}

/// Wraps a closure as a [`Step`].
///
/// # Examples
///
/// ```rust,ignore
/// use rulechain::foundation::{step_fn, StepOutput};
///
/// let trim = step_fn(|value, _key| {
///     Ok(match value.as_str() {
///         Some(s) => StepOutput::replace(s.trim()),
///         None => StepOutput::Keep,
///     })
/// });
/// ```
pub fn step_fn<F>(f: F) -> FnStep<F>
where
    F: Fn(&Value, Option<&str>) -> StepResult + Send + Sync,
{
    FnStep { f }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::error::Rejection;
    use serde_json::json;

    #[test]
    fn fn_step_passes_value_and_key() {
        let step = step_fn(|value, key| {
            Ok(StepOutput::replace(format!(
                "{}:{}",
                value.as_str().unwrap_or_default(),
                key.unwrap_or("-")
            )))
        });
        let mut cx = StepContext::new();

        let out = step.apply(&json!("a"), Some("k"), &mut cx).unwrap();
        assert_eq!(out, StepOutput::Replace(json!("a:k")));
        assert_eq!(step.name(), "fn");
    }

    #[test]
    fn fn_step_can_reject() {
        let step = step_fn(|_, _| Err(Rejection::new("nope").into()));
        let mut cx = StepContext::new();
        assert!(matches!(
            step.apply(&json!(1), None, &mut cx),
            Err(Signal::Reject(r)) if r.key == "nope"
        ));
    }

    #[test]
    fn context_splice_appends_in_order() {
        let first: Arc<dyn Step> = Arc::new(step_fn(|_, _| Ok(StepOutput::replace(1))));
        let second: Arc<dyn Step> = Arc::new(step_fn(|_, _| Ok(StepOutput::replace(2))));
        let mut cx = StepContext::new();

        cx.splice(&[first]);
        cx.splice(&[second]);

        assert_eq!(cx.spliced_len(), 2);
        let mut inner = StepContext::new();
        let out = cx
            .spliced_step(1)
            .unwrap()
            .apply(&Value::Null, None, &mut inner)
            .unwrap();
        assert_eq!(out, StepOutput::Replace(json!(2)));
    }
}
