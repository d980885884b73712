//! Notification settings resolution for ClusterCourier.
//!
//! The controller keeps its notification behaviour in two cluster
//! objects: a config map carrying triggers, templates, shared context
//! and default subscriptions, and a secret carrying the notifier
//! service credentials. This crate turns that raw cluster state into
//! ready-to-use settings:
//!
//! 1. [`parse_config_map`] decodes the config map, combining the
//!    reserved `config.yaml` document with `template.<name>` and
//!    `trigger.<name>` entries.
//! 2. [`Config::merge`] layers the decoded tree over the compiled-in
//!    defaults using strategic merge semantics, including
//!    `$patch: delete` suppression of default records.
//! 3. [`resolve`] drives the whole pipeline and hands the merged
//!    trigger set to a [`TriggerCompiler`] and the secret to a
//!    [`NotifierFactory`].
//!
//! Subscriptions route notifications: [`DefaultSubscriptions::get_recipients`]
//! answers who gets notified for a trigger firing on an object with
//! given labels, using the `label_selector` crate for label matching.

pub mod config;
pub mod config_map;
pub mod errors;
mod merge;
pub mod resolve;
pub mod subscription;

#[cfg(test)]
mod integration_tests;

// Configuration tree
pub use config::{Config, NotificationTemplate, NotificationTrigger, PatchDirective};

// Config map decoding
pub use config_map::{parse_config_map, scan_entries, ScanWarning, CONFIG_YAML_KEY};

// Error types
pub use errors::{SettingsError, SettingsResult};

// Resolution
pub use resolve::{
    parse_secret, resolve, NotifierFactory, ResolvedSettings, TriggerCompiler,
    NOTIFIERS_YAML_KEY,
};

// Subscriptions
pub use subscription::{DefaultSubscriptions, Subscription};
