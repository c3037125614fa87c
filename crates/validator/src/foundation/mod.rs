//! Core building blocks of the chain engine
//!
//! - **Steps**: [`Step`], [`StepOutput`], [`StepContext`], [`step_fn`]
//! - **Chains**: [`Chain`] and the [`invoke`] function that runs one
//! - **Errors**: [`Failure`], [`ConfigError`], [`ChainError`], plus the
//!   [`Rejection`] / [`Signal`] pair steps raise
//!
//! # Architecture
//!
//! A step never formats messages. It raises a [`Rejection`] naming an error
//! key; the validator owning the chain resolves it against its error
//! registry at the invocation boundary. Configuration mistakes travel as
//! [`Signal::Fatal`] and are never turned into failures.
//!
//! ```rust,ignore
//! use rulechain::foundation::{invoke, step_fn, Chain, Rejection, StepOutput};
//! use serde_json::json;
//!
//! let mut chain = Chain::new();
//! chain.push(step_fn(|v, _| match v.as_i64() {
//!     Some(n) if n >= 0 => Ok(StepOutput::Keep),
//!     _ => Err(Rejection::new("non_negative").with_value(v.clone()).into()),
//! }));
//!
//! assert!(invoke(&chain, json!(3), None).is_ok());
//! assert!(invoke(&chain, json!(-3), None).is_err());
//! ```

pub mod chain;
pub mod error;
pub mod step;

pub use chain::{Chain, invoke};
pub use error::{ChainError, ConfigError, Failure, Rejection, Signal};
pub use step::{FnStep, Step, StepContext, StepOutput, StepResult, step_fn};

/// A validation result carrying either kind of error.
pub type ChainResult<T> = Result<T, ChainError>;
