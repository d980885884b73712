//! Strategic merging of configuration trees.
//!
//! Named record lists merge by name: a patch record replaces the
//! same-named base record in place, unknown names append in patch
//! order, and a record carrying the `$patch: delete` directive removes
//! its base counterpart. Context keys merge per key with the patch
//! winning, and a non-empty patch subscription list replaces the base
//! list wholesale.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::{Config, NotificationTemplate, NotificationTrigger, PatchDirective};

/// A list record addressed by name during a merge.
trait NamedRecord: Clone {
    fn record_name(&self) -> &str;
    fn is_delete_directive(&self) -> bool;
}

impl NamedRecord for NotificationTrigger {
    fn record_name(&self) -> &str {
        &self.name
    }

    fn is_delete_directive(&self) -> bool {
        self.patch == Some(PatchDirective::Delete)
    }
}

impl NamedRecord for NotificationTemplate {
    fn record_name(&self) -> &str {
        &self.name
    }

    fn is_delete_directive(&self) -> bool {
        self.patch == Some(PatchDirective::Delete)
    }
}

/// Merges two named record lists.
///
/// Base order is preserved, overridden records keep their slot, and
/// new records append in patch order. Delete directives never survive
/// into the result. When a name occurs more than once on either side,
/// the first occurrence keeps the position and the last occurrence
/// supplies the record.
fn merge_named_list<T: NamedRecord>(base: &[T], patch: &[T]) -> Vec<T> {
    let mut overrides: BTreeMap<&str, &T> = BTreeMap::new();
    let mut deletions: BTreeSet<&str> = BTreeSet::new();
    for record in patch {
        if record.is_delete_directive() {
            deletions.insert(record.record_name());
            overrides.remove(record.record_name());
        } else {
            overrides.insert(record.record_name(), record);
            deletions.remove(record.record_name());
        }
    }

    // Within one list the last same-named record wins, so collapsing
    // duplicates keeps the first position and the last record.
    let mut base_last: BTreeMap<&str, &T> = BTreeMap::new();
    for record in base {
        base_last.insert(record.record_name(), record);
    }

    let mut merged = Vec::with_capacity(base.len() + patch.len());
    let mut base_names: BTreeSet<&str> = BTreeSet::new();
    for record in base {
        let name = record.record_name();
        if !base_names.insert(name) || deletions.contains(name) {
            continue;
        }
        if let Some(replacement) = overrides.get(name).or_else(|| base_last.get(name)) {
            merged.push((*replacement).clone());
        }
    }

    let mut appended: BTreeSet<&str> = BTreeSet::new();
    for record in patch {
        let name = record.record_name();
        if record.is_delete_directive()
            || base_names.contains(name)
            || deletions.contains(name)
            || appended.contains(name)
        {
            continue;
        }
        if let Some(replacement) = overrides.get(name) {
            appended.insert(name);
            merged.push((*replacement).clone());
        }
    }
    merged
}

fn merge_context(
    base: &BTreeMap<String, String>,
    patch: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut merged = base.clone();
    for (key, value) in patch {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

impl Config {
    /// Merges `patch` onto this tree and returns the combined tree.
    ///
    /// Neither input is modified. Merging the empty tree in either
    /// direction leaves the other tree unchanged.
    pub fn merge(&self, patch: &Config) -> Config {
        Config {
            triggers: merge_named_list(&self.triggers, &patch.triggers),
            templates: merge_named_list(&self.templates, &patch.templates),
            context: merge_context(&self.context, &patch.context),
            subscriptions: if patch.subscriptions.is_empty() {
                self.subscriptions.clone()
            } else {
                patch.subscriptions.clone()
            },
        }
    }
}

#[cfg(test)]
#[path = "merge_tests.rs"]
mod tests;
