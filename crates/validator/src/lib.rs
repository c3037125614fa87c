//! # rulechain
//!
//! Composable value validation: assemble an ordered chain of steps against a
//! single value, then invoke it to accept the value (possibly transformed) or
//! reject it with a keyed, templated error.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rulechain::prelude::*;
//! use serde_json::{json, Value};
//!
//! let email = Validator::new().required().to_bool(false);
//!
//! assert_eq!(email.invoke(json!("a@b.c"), Some("email"))?, Verdict::Accepted(json!("a@b.c")));
//! assert_eq!(
//!     email.invoke(Value::Null, Some("email"))?.failure().unwrap().message,
//!     "email is required",
//! );
//! ```
//!
//! ## Pieces
//!
//! - [`Validator`](validator::Validator) - builder and invocation entry point
//! - [`Chain`](foundation::Chain) / [`invoke`](foundation::invoke) - sequential,
//!   short-circuiting execution with value threading
//! - [`ErrorRegistry`](registry::ErrorRegistry) - error key to message template
//! - [`Alternatives`](combinators::Alternatives) - conditional branching
//! - [`RuleBook`](factory::RuleBook) - named, reusable rule sets

// Failure and ChainError are the fundamental error types for every invocation.
#![allow(clippy::result_large_err)]

pub mod combinators;
pub mod factory;
pub mod foundation;
pub mod prelude;
pub mod registry;
pub mod validator;
pub mod validators;
