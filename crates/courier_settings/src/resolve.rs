//! Top-level resolution of notification settings.
//!
//! [`resolve`] ties the pieces together: it decodes the cluster config
//! map, layers it over the compiled-in defaults, compiles the merged
//! triggers and builds notifier clients from the secret. The two
//! collaborator traits keep this crate free of any expression language
//! or delivery service specifics.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::{Config, NotificationTemplate, NotificationTrigger};
use crate::config_map::parse_config_map;
use crate::errors::{SettingsError, SettingsResult};

/// Reserved secret key holding the notifier configuration document.
pub const NOTIFIERS_YAML_KEY: &str = "notifiers.yaml";

/// Compiles the merged trigger set against the merged templates.
///
/// Compilation is the step that turns the textual condition and
/// template references of a trigger into something the controller can
/// evaluate. Implementations report their own error type; resolution
/// wraps it into [`SettingsError::Compilation`].
pub trait TriggerCompiler {
    /// A compiled, evaluatable trigger.
    type Compiled;

    /// Compiles every trigger, keyed by trigger name.
    ///
    /// # Errors
    ///
    /// Returns an error when any condition or referenced template is
    /// invalid; one bad trigger rejects the whole set.
    fn compile(
        &self,
        templates: &[NotificationTemplate],
        triggers: &[NotificationTrigger],
    ) -> Result<BTreeMap<String, Self::Compiled>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Builds notifier clients from the decoded secret configuration.
///
/// Building is infallible: a factory hands out clients for whatever
/// services the configuration names, and connection problems surface
/// later when a notification is sent.
pub trait NotifierFactory {
    /// The notifier configuration type decoded from the secret.
    type Config: DeserializeOwned + Default;

    /// A ready-to-use notifier client.
    type Notifier;

    /// Builds every configured notifier, keyed by service name.
    fn build(&self, config: Self::Config) -> BTreeMap<String, Self::Notifier>;
}

/// The outcome of a full resolution run.
#[derive(Debug)]
pub struct ResolvedSettings<T, N> {
    /// Compiled triggers, keyed by trigger name.
    pub triggers: BTreeMap<String, T>,
    /// Notifier clients, keyed by service name.
    pub notifiers: BTreeMap<String, N>,
    /// The merged configuration tree the compiled artefacts came from.
    pub config: Config,
}

/// Decodes the notifier configuration from secret data.
///
/// A missing, blank or null `notifiers.yaml` entry yields the default
/// configuration, so clusters without delivery credentials resolve
/// cleanly to zero notifiers.
///
/// # Errors
///
/// Returns [`SettingsError::NotifierDecode`] when the entry is present
/// but does not decode as `C`.
pub fn parse_secret<C>(data: &BTreeMap<String, Vec<u8>>) -> SettingsResult<C>
where
    C: DeserializeOwned + Default,
{
    match data.get(NOTIFIERS_YAML_KEY) {
        Some(payload) if !payload.iter().all(u8::is_ascii_whitespace) => {
            serde_yaml::from_slice::<Option<C>>(payload)
                .map(Option::unwrap_or_default)
                .map_err(|source| SettingsError::NotifierDecode { source })
        }
        _ => Ok(C::default()),
    }
}

/// Resolves notification settings from cluster state.
///
/// The configuration is assembled in two stages: the config map's
/// explicit `config.yaml` document is patched with its prefix-keyed
/// entries, and the result is layered over `defaults`. The merged
/// trigger set is then compiled and the notifier clients are built
/// from the secret.
///
/// Resolution is atomic: any decode or compilation failure fails the
/// whole run and no partial settings are returned.
///
/// # Errors
///
/// Returns a [`SettingsError`] when the config map or secret fails to
/// decode, or when the compiler rejects the merged triggers.
pub fn resolve<TC, NF>(
    config_map_data: &BTreeMap<String, String>,
    secret_data: &BTreeMap<String, Vec<u8>>,
    defaults: &Config,
    compiler: &TC,
    factory: &NF,
) -> SettingsResult<ResolvedSettings<TC::Compiled, NF::Notifier>>
where
    TC: TriggerCompiler,
    NF: NotifierFactory,
{
    debug!(
        "resolving notification settings from {} config map entries",
        config_map_data.len()
    );
    let (cluster, _warnings) = parse_config_map(config_map_data)?;
    let merged = defaults.merge(&cluster);
    debug!(
        "merged configuration has {} triggers, {} templates, {} context keys, {} subscriptions",
        merged.triggers.len(),
        merged.templates.len(),
        merged.context.len(),
        merged.subscriptions.len()
    );

    let triggers = compiler
        .compile(&merged.templates, &merged.triggers)
        .map_err(|source| SettingsError::Compilation { source })?;

    let notifier_config = parse_secret::<NF::Config>(secret_data)?;
    let notifiers = factory.build(notifier_config);

    info!(
        "resolved notification settings: {} triggers, {} notifiers",
        triggers.len(),
        notifiers.len()
    );
    Ok(ResolvedSettings {
        triggers,
        notifiers,
        config: merged,
    })
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
