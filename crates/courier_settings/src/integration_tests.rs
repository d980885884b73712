//! End-to-end tests across decoding, merging and resolution.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::{
    parse_config_map, resolve, Config, NotificationTemplate, NotificationTrigger,
    NotifierFactory, SettingsError, TriggerCompiler, CONFIG_YAML_KEY, NOTIFIERS_YAML_KEY,
};

// ============================================================================
// Test Collaborators
// ============================================================================

/// Compiles each trigger to its condition text, rejecting references
/// to templates that are not part of the merged set.
struct ConditionCompiler;

impl TriggerCompiler for ConditionCompiler {
    type Compiled = String;

    fn compile(
        &self,
        templates: &[NotificationTemplate],
        triggers: &[NotificationTrigger],
    ) -> Result<BTreeMap<String, Self::Compiled>, Box<dyn std::error::Error + Send + Sync>> {
        let known: Vec<&str> = templates.iter().map(|t| t.name.as_str()).collect();
        let mut compiled = BTreeMap::new();
        for trigger in triggers {
            if !trigger.template.is_empty() && !known.contains(&trigger.template.as_str()) {
                return Err(format!(
                    "trigger {:?} references unknown template {:?}",
                    trigger.name, trigger.template
                )
                .into());
            }
            compiled.insert(trigger.name.clone(), trigger.condition.clone());
        }
        Ok(compiled)
    }
}

#[derive(Deserialize, Default)]
struct ServiceConfig {
    #[serde(default)]
    slack: BTreeMap<String, String>,
    #[serde(default)]
    email: BTreeMap<String, String>,
}

struct ServiceFactory;

impl NotifierFactory for ServiceFactory {
    type Config = ServiceConfig;
    type Notifier = &'static str;

    fn build(&self, config: Self::Config) -> BTreeMap<String, Self::Notifier> {
        let mut notifiers = BTreeMap::new();
        if !config.slack.is_empty() {
            notifiers.insert("slack".to_string(), "slack notifier");
        }
        if !config.email.is_empty() {
            notifiers.insert("email".to_string(), "email notifier");
        }
        notifiers
    }
}

fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_cluster_settings_end_to_end() {
    let defaults: Config = serde_yaml::from_str(
        r#"
triggers:
  - name: on-sync-failed
    condition: app.status.sync == 'Failed'
    template: sync-failed
templates:
  - name: sync-failed
    title: Sync failed
    body: Application {{app.name}} failed to sync
subscriptions:
  - recipients:
      - slack:platform-team
"#,
    )
    .unwrap();

    let config_map = BTreeMap::from([
        (
            CONFIG_YAML_KEY.to_string(),
            r#"
context:
  cluster: blue
subscriptions:
  - recipients:
      - email:oncall@example.com
    triggers:
      - on-sync-failed
    selector: env=prod
  - recipients:
      - slack:dev-channel
    selector: env!=prod
"#
            .to_string(),
        ),
        (
            "trigger.on-deployed".to_string(),
            "condition: app.status.phase == 'Deployed'\ntemplate: deployed\n".to_string(),
        ),
        (
            "template.deployed".to_string(),
            "title: Deployed\nbody: '{{app.name}} deployed'\n".to_string(),
        ),
    ]);

    let secret = BTreeMap::from([(
        NOTIFIERS_YAML_KEY.to_string(),
        b"slack:\n  token: xoxb-123\n".to_vec(),
    )]);

    let resolved = resolve(
        &config_map,
        &secret,
        &defaults,
        &ConditionCompiler,
        &ServiceFactory,
    )
    .unwrap();

    // Both the default and the cluster-added trigger compile.
    let trigger_names: Vec<&str> = resolved.triggers.keys().map(String::as_str).collect();
    assert_eq!(trigger_names, vec!["on-deployed", "on-sync-failed"]);

    // Only the configured service gets a notifier.
    assert_eq!(resolved.notifiers.len(), 1);
    assert!(resolved.notifiers.contains_key("slack"));

    // Context comes from the cluster document.
    assert_eq!(
        resolved.config.context.get("cluster"),
        Some(&"blue".to_string())
    );

    // Cluster subscriptions replace the default list wholesale.
    let subscriptions = &resolved.config.subscriptions;
    assert_eq!(subscriptions.len(), 2);
    assert_eq!(
        subscriptions.get_recipients("on-sync-failed", &labels(&[("env", "prod")])),
        vec!["email:oncall@example.com".to_string()]
    );
    assert_eq!(
        subscriptions.get_recipients("on-sync-failed", &labels(&[("env", "dev")])),
        vec!["slack:dev-channel".to_string()]
    );
    // The `env!=prod` subscription also matches objects without the
    // label at all.
    assert_eq!(
        subscriptions.get_recipients("on-deployed", &labels(&[])),
        vec!["slack:dev-channel".to_string()]
    );
}

#[test]
fn test_cluster_can_suppress_and_extend_default_records() {
    let defaults: Config = serde_yaml::from_str(
        r#"
triggers:
  - name: on-a
    condition: a
  - name: on-b
    condition: b
"#,
    )
    .unwrap();

    let config_map = BTreeMap::from([
        (
            CONFIG_YAML_KEY.to_string(),
            "triggers:\n  - name: on-a\n    $patch: delete\n".to_string(),
        ),
        ("trigger.on-c".to_string(), "condition: c\n".to_string()),
    ]);

    let resolved = resolve(
        &config_map,
        &BTreeMap::new(),
        &defaults,
        &ConditionCompiler,
        &ServiceFactory,
    )
    .unwrap();

    let names: Vec<&str> = resolved
        .config
        .triggers
        .iter()
        .map(|t| t.name.as_str())
        .collect();
    assert_eq!(names, vec!["on-b", "on-c"]);
}

#[test]
fn test_unknown_keys_warn_without_failing() {
    let config_map = BTreeMap::from([
        ("unrelated-key".to_string(), "whatever: data\n".to_string()),
        ("trigger.on-x".to_string(), "condition: x\n".to_string()),
    ]);
    let (config, warnings) = parse_config_map(&config_map).unwrap();
    assert_eq!(config.triggers.len(), 1);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].key, "unrelated-key");
}

#[test]
fn test_invalid_subscription_selector_fails_the_document() {
    let config_map = BTreeMap::from([(
        CONFIG_YAML_KEY.to_string(),
        "subscriptions:\n  - selector: runs-on=,\n".to_string(),
    )]);
    let result = parse_config_map(&config_map);
    assert!(matches!(result, Err(SettingsError::ConfigYamlDecode { .. })));
}
