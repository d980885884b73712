//! The notification configuration tree and its named records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::subscription::DefaultSubscriptions;

/// Patch directive a record can carry when it appears in patch
/// position of a merge.
///
/// On the wire the directive travels as a `$patch` field, so a trigger
/// that removes its same-named counterpart from the base list is
/// written as:
///
/// ```yaml
/// triggers:
///   - name: on-sync-failed
///     $patch: delete
/// ```
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PatchDirective {
    /// Remove the same-named record from the base list.
    Delete,
}

/// A named condition that decides when notifications are sent.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct NotificationTrigger {
    /// Record name; for prefix-keyed config map entries the name comes
    /// from the key, not from the document body.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// The condition expression evaluated against the monitored object.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub condition: String,

    /// Free-form description shown in user-facing listings.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Name of the template rendered when the trigger fires.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub template: String,

    /// Whether the trigger participates in evaluation. `None` means
    /// the default of the consuming controller applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Merge directive; only meaningful in patch position.
    #[serde(rename = "$patch", default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<PatchDirective>,
}

/// A named message template.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct NotificationTemplate {
    /// Record name; for prefix-keyed config map entries the name comes
    /// from the key, not from the document body.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Message title template.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,

    /// Message body template.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body: String,

    /// Merge directive; only meaningful in patch position.
    #[serde(rename = "$patch", default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<PatchDirective>,
}

/// The full notification configuration tree.
///
/// Trees come from three places: compiled-in defaults, the cluster
/// config map, and tests. [`Config::merge`](crate::Config::merge)
/// combines two trees, with the receiver acting as the base.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Config {
    /// Named triggers, in definition order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub triggers: Vec<NotificationTrigger>,

    /// Named templates, in definition order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub templates: Vec<NotificationTemplate>,

    /// Key/value pairs made available to every template as shared
    /// context.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, String>,

    /// Cluster-wide default subscriptions.
    #[serde(default, skip_serializing_if = "DefaultSubscriptions::is_empty")]
    pub subscriptions: DefaultSubscriptions,
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
