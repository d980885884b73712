//! Parsed selectors and their evaluation.

use std::fmt;
use std::str::FromStr;

use crate::errors::ParseError;
use crate::labels::Labels;
use crate::parser;
use crate::requirement::Requirement;

/// A parsed label selector: a conjunction of requirements.
///
/// An empty selector has no requirements and matches every label set,
/// including the empty one. Requirements are kept sorted by key so the
/// textual form is canonical.
///
/// # Examples
///
/// ```rust
/// use std::collections::BTreeMap;
///
/// use label_selector::Selector;
///
/// let selector = Selector::parse("env=prod,tier in (api,web)")?;
/// let labels = BTreeMap::from([
///     ("env".to_string(), "prod".to_string()),
///     ("tier".to_string(), "web".to_string()),
/// ]);
/// assert!(selector.matches(&labels));
/// # Ok::<(), label_selector::ParseError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selector {
    requirements: Vec<Requirement>,
}

impl Selector {
    /// Parses a selector string.
    ///
    /// The grammar follows the Kubernetes label selector syntax:
    /// comma-separated requirements of the forms `key`, `!key`,
    /// `key = value`, `key == value`, `key != value`,
    /// `key in (v1,v2)`, `key notin (v1,v2)`, `key > n` and
    /// `key < n`. The empty string parses to the empty selector.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when the input violates the grammar,
    /// when a key is not a qualified name, or when a value violates
    /// the label value syntax.
    pub fn parse(selector: &str) -> Result<Self, ParseError> {
        let mut requirements = parser::parse(selector)?;
        requirements.sort_by(|a, b| a.key().cmp(b.key()));
        Ok(Self { requirements })
    }

    /// Returns whether the selector places no constraints on labels.
    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    /// The requirements of this selector, sorted by key.
    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    /// Adds a requirement, keeping the key order.
    pub fn add(&mut self, requirement: Requirement) {
        self.requirements.push(requirement);
        self.requirements.sort_by(|a, b| a.key().cmp(b.key()));
    }

    /// Evaluates the selector against a label set. All requirements
    /// must match.
    pub fn matches(&self, labels: &impl Labels) -> bool {
        self.requirements
            .iter()
            .all(|requirement| requirement.matches(labels))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .requirements
            .iter()
            .map(|requirement| requirement.to_string())
            .collect();
        write!(f, "{}", rendered.join(","))
    }
}

impl FromStr for Selector {
    type Err = ParseError;

    fn from_str(selector: &str) -> Result<Self, Self::Err> {
        Self::parse(selector)
    }
}

#[cfg(test)]
#[path = "selector_tests.rs"]
mod tests;
