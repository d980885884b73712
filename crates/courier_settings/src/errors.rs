//! Error types for notification settings resolution.

use thiserror::Error;

/// Errors that can occur while decoding and resolving notification
/// settings.
///
/// Decoding errors name the record that failed so operators can find
/// the offending config map entry without bisecting the whole map.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// A `template.<name>` config map entry did not decode as a
    /// notification template.
    #[error("failed to unmarshal template {name:?}: {source}")]
    TemplateDecode {
        /// Name derived from the config map key.
        name: String,
        /// The underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },

    /// A `trigger.<name>` config map entry did not decode as a
    /// notification trigger.
    #[error("failed to unmarshal trigger {name:?}: {source}")]
    TriggerDecode {
        /// Name derived from the config map key.
        name: String,
        /// The underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },

    /// The reserved `config.yaml` entry did not decode as a full
    /// configuration document.
    #[error("failed to unmarshal config.yaml: {source}")]
    ConfigYamlDecode {
        /// The underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },

    /// The `notifiers.yaml` secret entry did not decode as the
    /// notifier configuration type.
    #[error("failed to unmarshal notifiers.yaml: {source}")]
    NotifierDecode {
        /// The underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },

    /// The trigger compiler rejected the merged trigger set.
    #[error("failed to compile triggers: {source}")]
    Compilation {
        /// The error reported by the compiler.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for settings resolution operations.
pub type SettingsResult<T> = std::result::Result<T, SettingsError>;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;
