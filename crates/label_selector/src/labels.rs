//! Read access to label sets.

use std::collections::{BTreeMap, HashMap};

/// A set of labels a selector can be evaluated against.
///
/// Implementations only need to answer point lookups; selectors never
/// enumerate the full label set. Both standard map types keyed by
/// `String` implement this trait, so most callers can pass their label
/// maps directly.
pub trait Labels {
    /// Returns whether a label with the given key is present.
    fn has(&self, key: &str) -> bool;

    /// Returns the value of the label with the given key, if present.
    fn get(&self, key: &str) -> Option<&str>;
}

impl Labels for BTreeMap<String, String> {
    fn has(&self, key: &str) -> bool {
        self.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<&str> {
        BTreeMap::get(self, key).map(String::as_str)
    }
}

impl Labels for HashMap<String, String> {
    fn has(&self, key: &str) -> bool {
        self.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<&str> {
        HashMap::get(self, key).map(String::as_str)
    }
}

#[cfg(test)]
#[path = "labels_tests.rs"]
mod tests;
