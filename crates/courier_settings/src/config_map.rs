//! Decoding of config map data into a configuration tree.
//!
//! Config map keys route by prefix: keys starting with `template` hold
//! one template each, keys starting with `trigger` hold one trigger,
//! and the reserved `config.yaml` key holds a full configuration
//! document. Everything after the first `.` of a prefixed key is the
//! record name, so `template.app.deployed` defines the template
//! `app.deployed`.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use tracing::warn;

use crate::config::{Config, NotificationTemplate, NotificationTrigger};
use crate::errors::{SettingsError, SettingsResult};

/// Reserved config map key holding the full configuration document.
pub const CONFIG_YAML_KEY: &str = "config.yaml";

const TEMPLATE_KEY_PREFIX: &str = "template";
const TRIGGER_KEY_PREFIX: &str = "trigger";

/// A config map key that was skipped because it matches no known
/// pattern. Unknown keys are reported rather than rejected so that
/// unrelated data can share the config map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanWarning {
    /// The skipped config map key.
    pub key: String,
    /// Why the key was skipped.
    pub message: String,
}

/// Decodes a YAML document, treating a blank or null document as the
/// default value. Prefix-keyed entries and `config.yaml` may
/// legitimately be empty.
fn decode_document<T>(document: &str) -> Result<T, serde_yaml::Error>
where
    T: DeserializeOwned + Default,
{
    if document.trim().is_empty() {
        return Ok(T::default());
    }
    Ok(serde_yaml::from_str::<Option<T>>(document)?.unwrap_or_default())
}

/// Derives the record name from a prefixed config map key: everything
/// after the first `.`, with further dots kept verbatim.
fn record_name(key: &str) -> String {
    match key.split_once('.') {
        Some((_, name)) => name.to_string(),
        None => String::new(),
    }
}

/// Scans prefix-keyed entries into a configuration tree.
///
/// The reserved `config.yaml` key is left alone; [`parse_config_map`]
/// decodes it separately. Record names in document bodies are
/// overwritten by the name derived from the key.
///
/// # Errors
///
/// Returns a [`SettingsError`] naming the record when an entry does
/// not decode.
pub fn scan_entries(
    data: &BTreeMap<String, String>,
) -> SettingsResult<(Config, Vec<ScanWarning>)> {
    let mut root = Config::default();
    let mut warnings = Vec::new();
    for (key, value) in data {
        if key == CONFIG_YAML_KEY {
            continue;
        }
        if key.starts_with(TEMPLATE_KEY_PREFIX) {
            let name = record_name(key);
            let mut template: NotificationTemplate = decode_document(value)
                .map_err(|source| SettingsError::TemplateDecode {
                    name: name.clone(),
                    source,
                })?;
            template.name = name;
            root.templates.push(template);
            continue;
        }
        if key.starts_with(TRIGGER_KEY_PREFIX) {
            let name = record_name(key);
            let mut trigger: NotificationTrigger = decode_document(value)
                .map_err(|source| SettingsError::TriggerDecode {
                    name: name.clone(),
                    source,
                })?;
            trigger.name = name;
            root.triggers.push(trigger);
            continue;
        }
        warn!("config map key '{}' does not match any known pattern, ignoring it", key);
        warnings.push(ScanWarning {
            key: key.clone(),
            message: "key matches neither template.<name>, trigger.<name> nor config.yaml"
                .to_string(),
        });
    }
    Ok((root, warnings))
}

/// Decodes config map data into one configuration tree.
///
/// The `config.yaml` document forms the base and the prefix-keyed
/// entries are merged onto it, so a record defined both ways resolves
/// to the prefix-keyed version.
///
/// # Errors
///
/// Returns a [`SettingsError`] when any entry fails to decode; a
/// failing entry rejects the whole config map.
pub fn parse_config_map(
    data: &BTreeMap<String, String>,
) -> SettingsResult<(Config, Vec<ScanWarning>)> {
    let (root, warnings) = scan_entries(data)?;
    let explicit: Config = match data.get(CONFIG_YAML_KEY) {
        Some(document) => decode_document(document)
            .map_err(|source| SettingsError::ConfigYamlDecode { source })?,
        None => Config::default(),
    };
    Ok((explicit.merge(&root), warnings))
}

#[cfg(test)]
#[path = "config_map_tests.rs"]
mod tests;
