//! Built-in validators

pub mod required;

pub use required::{Required, required};
