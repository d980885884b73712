//! Parsing and evaluation of Kubernetes-style label selectors.
//!
//! A selector is a comma-separated conjunction of requirements, each
//! tying a label key to an operator and a set of values:
//!
//! ```text
//! env = prod, tier in (web, api), !legacy, replicas > 3
//! ```
//!
//! [`Selector::parse`] turns such a string into a [`Selector`], which
//! evaluates against anything implementing [`Labels`]. Parsing
//! validates keys and values against the Kubernetes qualified-name and
//! label-value rules, so a selector that parses is also well formed.
//!
//! The crate deliberately mirrors the upstream Kubernetes grammar,
//! including its quirks: an empty value set `()` stands for the single
//! empty value, `key=` compares against the empty value, and the `in`
//! and `notin` keywords are valid label keys in key position.

pub mod errors;
pub mod labels;
mod parser;
pub mod requirement;
pub mod selector;

// Error types
pub use errors::ParseError;

// Label set access
pub use labels::Labels;

// Requirements and selectors
pub use requirement::{Operator, Requirement};
pub use selector::Selector;
