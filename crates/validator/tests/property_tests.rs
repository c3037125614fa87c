//! Property-based tests for rulechain.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use proptest::prelude::*;
use rulechain::prelude::*;
use serde_json::json;

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        ".{0,16}".prop_map(Value::from),
    ]
}

// ============================================================================
// IDENTITY: an empty chain returns its input
// ============================================================================

proptest! {
    #[test]
    fn empty_chain_is_identity(value in scalar()) {
        let verdict = Validator::new().invoke(value.clone(), None).unwrap();
        prop_assert_eq!(verdict, Verdict::Accepted(value));
    }

    #[test]
    fn keep_steps_are_identity(value in scalar(), n in 0usize..8) {
        let validator = (0..n).fold(Validator::new(), |v, _| v.add_fn(|_, _| Ok(StepOutput::Keep)));
        prop_assert_eq!(validator.invoke(value.clone(), None).unwrap(), Verdict::Accepted(value));
    }
}

// ============================================================================
// SHORT-CIRCUIT: nothing after the failing step runs
// ============================================================================

proptest! {
    #[test]
    fn failing_step_stops_the_chain(fail_at in 0usize..6, len in 6usize..10) {
        let ran = Arc::new(AtomicUsize::new(0));
        let mut validator = Validator::new();
        for i in 0..len {
            let ran = Arc::clone(&ran);
            validator = validator.add_fn(move |_, _| {
                ran.fetch_add(1, Ordering::SeqCst);
                if i == fail_at {
                    Err(Rejection::new("default").into())
                } else {
                    Ok(StepOutput::Keep)
                }
            });
        }

        prop_assert_eq!(validator.invoke(json!(1), None).unwrap(), Verdict::Rejected);
        prop_assert_eq!(ran.load(Ordering::SeqCst), fail_at + 1);
    }
}

// ============================================================================
// REQUIRED: only null fails
// ============================================================================

proptest! {
    #[test]
    fn required_fails_iff_null(value in scalar()) {
        let verdict = Validator::new().required().invoke(value.clone(), None).unwrap();
        prop_assert_eq!(verdict.is_accepted(), !value.is_null());
    }
}

// ============================================================================
// FORMATTING: same inputs, same message
// ============================================================================

proptest! {
    #[test]
    fn create_failure_is_idempotent(value in scalar(), label in proptest::option::of("[a-z]{1,8}")) {
        let registry = ErrorRegistry::baseline()
            .with_entry("shape", ErrorHandlerEntry::new("{} has the wrong shape"));

        let first = registry.create_failure("shape", Some(&value), label.as_deref());
        let second = registry.create_failure("shape", Some(&value), label.as_deref());
        prop_assert_eq!(first.as_failure(), second.as_failure());
        prop_assert!(!first.is_configuration());
    }

    #[test]
    fn modes_agree_on_key(value in scalar()) {
        let validator = Validator::new().required();
        let boolean = validator.invoke(value.clone(), Some("f")).unwrap();
        let structured = validator.to_bool(false).invoke(value, Some("f")).unwrap();

        prop_assert_eq!(boolean.is_accepted(), structured.is_accepted());
        if let Some(failure) = structured.failure() {
            prop_assert_eq!(failure.key.as_ref(), "required");
            prop_assert_eq!(boolean, Verdict::Rejected);
        }
    }
}
