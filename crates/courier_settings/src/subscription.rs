//! Default subscriptions: routing from triggers and labels to recipients.

use label_selector::{Labels, Selector};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Wire form of [`Subscription`]. The selector travels as its textual
/// representation and is parsed during deserialization.
#[derive(Deserialize, Serialize, Default)]
struct RawSubscription {
    #[serde(default)]
    recipients: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    triggers: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    selector: String,
}

/// A default subscription: recipients that receive notifications for
/// the given triggers, scoped to objects matching the selector.
///
/// An empty trigger list subscribes the recipients to every trigger,
/// and an empty selector matches every object.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Subscription {
    /// Recipients in `service:recipient` notation.
    pub recipients: Vec<String>,

    /// Trigger names this subscription listens to; empty means all.
    pub triggers: Vec<String>,

    /// Label selector restricting the objects this subscription
    /// applies to.
    pub selector: Selector,
}

impl Subscription {
    /// Returns whether this subscription listens to the given trigger.
    pub fn matches_trigger(&self, trigger: &str) -> bool {
        self.triggers.is_empty() || self.triggers.iter().any(|candidate| candidate == trigger)
    }
}

impl<'de> Deserialize<'de> for Subscription {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawSubscription::deserialize(deserializer)?;
        let selector = Selector::parse(&raw.selector).map_err(|error| {
            serde::de::Error::custom(format!(
                "invalid subscription selector {:?}: {}",
                raw.selector, error
            ))
        })?;
        Ok(Subscription {
            recipients: raw.recipients,
            triggers: raw.triggers,
            selector,
        })
    }
}

impl Serialize for Subscription {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let raw = RawSubscription {
            recipients: self.recipients.clone(),
            triggers: self.triggers.clone(),
            // An empty selector renders as "" and is omitted.
            selector: self.selector.to_string(),
        };
        raw.serialize(serializer)
    }
}

/// The cluster-wide default subscription list.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct DefaultSubscriptions(pub Vec<Subscription>);

impl DefaultSubscriptions {
    /// Returns whether no default subscriptions are configured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of configured subscriptions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Collects the recipients subscribed to the given trigger for an
    /// object carrying the given labels.
    ///
    /// Recipients are returned in subscription order; a recipient
    /// listed by several matching subscriptions appears once per
    /// listing.
    pub fn get_recipients(&self, trigger: &str, labels: &impl Labels) -> Vec<String> {
        let mut recipients = Vec::new();
        for subscription in &self.0 {
            if !subscription.matches_trigger(trigger) {
                continue;
            }
            if !subscription.selector.matches(labels) {
                continue;
            }
            recipients.extend(subscription.recipients.iter().cloned());
        }
        recipients
    }
}

impl From<Vec<Subscription>> for DefaultSubscriptions {
    fn from(subscriptions: Vec<Subscription>) -> Self {
        Self(subscriptions)
    }
}

#[cfg(test)]
#[path = "subscription_tests.rs"]
mod tests;
