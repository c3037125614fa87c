//! Prelude module for convenient imports.
//!
//! `use rulechain::prelude::*;` brings in the validator, the step types and
//! the error types needed for everyday use.

pub use crate::combinators::{Alternatives, Condition, Target, alternatives};
pub use crate::factory::{RuleBook, ValidatorFactory};
pub use crate::foundation::{
    Chain, ChainError, ConfigError, Failure, Rejection, Signal, Step, StepContext, StepOutput,
    StepResult, step_fn,
};
pub use crate::registry::{ErrorHandlerEntry, ErrorRegistry, Formatter, RegistryConfig};
pub use crate::validator::{ResultMode, Validator, Verdict};
pub use crate::validators::{Required, required};

pub use serde_json::Value;
