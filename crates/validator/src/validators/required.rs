//! The `required` step
//!
//! Rejects the absence value (`null`) with the `required` key and lets
//! everything else through unchanged.
//!
//! # Examples
//!
//! ```rust,ignore
//! use rulechain::prelude::*;
//! use serde_json::{json, Value};
//!
//! let email = Validator::new().required().to_bool(false);
//! assert!(email.invoke(json!("a@b.c"), Some("email"))?.is_accepted());
//! assert_eq!(
//!     email.invoke(Value::Null, Some("email"))?.failure().unwrap().message,
//!     "email is required",
//! );
//! ```

use serde_json::Value;

use crate::foundation::{Rejection, Step, StepContext, StepOutput, StepResult};
use crate::registry::REQUIRED_KEY;

/// Fails on `null`, passes anything else through.
///
/// The invocation key becomes the display label; without a key the
/// registry's default label for `required` is used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Required;

impl Step for Required {
    fn apply(&self, value: &Value, key: Option<&str>, _cx: &mut StepContext) -> StepResult {
        if value.is_null() {
            let mut rejection = Rejection::new(REQUIRED_KEY).with_value(Value::Null);
            rejection.label = key.map(str::to_owned);
            return Err(rejection.into());
        }
        Ok(StepOutput::Keep)
    }

    fn name(&self) -> &str {
        "required"
    }
}

/// Creates a [`Required`] step.
#[must_use]
pub fn required() -> Required {
    Required
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::Signal;
    use serde_json::json;

    #[test]
    fn null_is_rejected_with_key_as_label() {
        let mut cx = StepContext::new();
        match required().apply(&Value::Null, Some("email"), &mut cx) {
            Err(Signal::Reject(rejection)) => {
                assert_eq!(rejection.key, REQUIRED_KEY);
                assert_eq!(rejection.label.as_deref(), Some("email"));
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn null_without_key_has_no_label() {
        let mut cx = StepContext::new();
        let result = required().apply(&Value::Null, None, &mut cx);
        assert!(matches!(result, Err(Signal::Reject(r)) if r.label.is_none()));
    }

    #[test]
    fn present_values_pass_unchanged() {
        let mut cx = StepContext::new();
        for value in [json!(0), json!(""), json!(false), json!([]), json!({})] {
            assert_eq!(
                required().apply(&value, None, &mut cx).unwrap(),
                StepOutput::Keep
            );
        }
    }
}
