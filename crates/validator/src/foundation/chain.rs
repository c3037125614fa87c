//! Chain of steps and the invoker that runs it
//!
//! A [`Chain`] is an append-only list of steps. [`invoke`] threads one value
//! through it:
//!
//! - steps run in insertion order, each seeing the value left by the
//!   previous one;
//! - the first [`Signal`] aborts the run and is returned as is;
//! - steps spliced during the run execute after the chain's own steps.
//!
//! # Examples
//!
//! ```rust,ignore
//! use rulechain::foundation::{invoke, step_fn, Chain, StepOutput};
//! use serde_json::json;
//!
//! let mut chain = Chain::new();
//! chain.push(step_fn(|_, _| Ok(StepOutput::replace("x"))));
//! assert_eq!(invoke(&chain, json!(1), None).unwrap(), json!("x"));
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, trace};

use crate::foundation::error::Signal;
use crate::foundation::step::{Step, StepContext, StepOutput};

/// Ordered, append-only sequence of steps.
#[derive(Clone, Default)]
pub struct Chain {
    steps: Vec<Arc<dyn Step>>,
}

impl Chain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a step.
    pub fn push(&mut self, step: impl Step + 'static) {
        self.steps.push(Arc::new(step));
    }

    /// Appends an already shared step.
    pub fn push_shared(&mut self, step: Arc<dyn Step>) {
        self.steps.push(step);
    }

    /// Appends every step of `steps`, in order.
    pub fn extend_from_slice(&mut self, steps: &[Arc<dyn Step>]) {
        self.steps.extend(steps.iter().cloned());
    }

    /// Read-only view of the steps.
    #[must_use]
    pub fn steps(&self) -> &[Arc<dyn Step>] {
        &self.steps
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if the chain has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.steps.iter().map(Step::name))
            .finish()
    }
}

/// Runs `chain` against `value`.
///
/// Returns the final threaded value, or the first signal raised. An empty
/// chain returns `value` unchanged.
pub fn invoke(chain: &Chain, value: Value, key: Option<&str>) -> Result<Value, Signal> {
    if chain.is_empty() {
        return Ok(value);
    }

    let own = chain.steps();
    let mut cx = StepContext::new();
    let mut current = value;
    let mut index = 0;

    loop {
        let step = match own.get(index) {
            Some(step) => Arc::clone(step),
            None => match cx.spliced_step(index - own.len()) {
                Some(step) => step,
                None => break,
            },
        };

        trace!(index, step = step.name(), "applying step");

        match step.apply(&current, key, &mut cx) {
            Ok(StepOutput::Keep) => {}
            Ok(StepOutput::Replace(next)) => current = next,
            Err(signal) => {
                debug!(index, step = step.name(), "step aborted the chain");
                return Err(signal);
            }
        }

        index += 1;
    }

    if cx.spliced_len() > 0 {
        trace!(
            own = own.len(),
            spliced = cx.spliced_len(),
            "chain finished with spliced steps"
        );
    }

    Ok(current)
}
