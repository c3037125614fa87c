//! Named validator construction
//!
//! A [`ValidatorFactory`] builds reusable, named rule sets. Validators get
//! one injected with [`Validator::with_factory`] and pull rules from it with
//! [`Validator::rule`].
//!
//! [`RuleBook`] is the stock implementation: a table of named constructors.
//!
//! # Examples
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rulechain::prelude::*;
//! use serde_json::json;
//!
//! let book = RuleBook::new().register("non_null", |_args| Ok(Validator::new().required()));
//!
//! let validator = Validator::new()
//!     .with_factory(Arc::new(book))
//!     .rule("non_null", &[])?;
//! assert!(validator.invoke(json!(1), None)?.is_accepted());
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::foundation::ConfigError;
use crate::validator::Validator;

/// Builds validators by name.
pub trait ValidatorFactory: Send + Sync {
    /// Builds the rule `name` with `args`.
    fn build(&self, name: &str, args: &[Value]) -> Result<Validator, ConfigError>;

    /// Returns `true` if `name` can be built.
    fn knows(&self, name: &str) -> bool;
}

type Constructor = Arc<dyn Fn(&[Value]) -> Result<Validator, ConfigError> + Send + Sync>;

/// A [`ValidatorFactory`] backed by a table of named constructors.
#[derive(Clone, Default)]
pub struct RuleBook {
    rules: BTreeMap<String, Constructor>,
}

impl RuleBook {
    /// Creates an empty rule book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a constructor under `name`, replacing any previous one.
    #[must_use = "builder methods must be chained or built"]
    pub fn register<F>(mut self, name: impl Into<String>, constructor: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Validator, ConfigError> + Send + Sync + 'static,
    {
        self.rules.insert(name.into(), Arc::new(constructor));
        self
    }

    /// Registered rule names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }
}

impl ValidatorFactory for RuleBook {
    fn build(&self, name: &str, args: &[Value]) -> Result<Validator, ConfigError> {
        let constructor = self.rules.get(name).ok_or_else(|| ConfigError::UnknownRule {
            name: name.to_owned(),
        })?;
        constructor(args)
    }

    fn knows(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }
}

impl fmt::Debug for RuleBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rules.keys()).finish()
    }
}
