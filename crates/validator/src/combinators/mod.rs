//! Combinators built on top of the step abstraction
//!
//! - [`Alternatives`] - guarded branching that substitutes a value or
//!   splices another validator's rules

pub mod alternatives;

pub use alternatives::{Alternatives, Condition, Target, alternatives};
