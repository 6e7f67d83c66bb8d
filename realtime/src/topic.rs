use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of a real-time event.
///
/// The set is closed: a subscription for a topic that does not exist cannot
/// be expressed, and frames tagged with anything else are inert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Leads,
    Demandes,
    Paiements,
    Emails,
    Dashboard,
    Performance,
    Notifications,
    Contacts,
}

impl Topic {
    pub const ALL: [Topic; 8] = [
        Topic::Leads,
        Topic::Demandes,
        Topic::Paiements,
        Topic::Emails,
        Topic::Dashboard,
        Topic::Performance,
        Topic::Notifications,
        Topic::Contacts,
    ];

    /// Wire name, as carried in the envelope's `type` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Leads => "leads",
            Topic::Demandes => "demandes",
            Topic::Paiements => "paiements",
            Topic::Emails => "emails",
            Topic::Dashboard => "dashboard",
            Topic::Performance => "performance",
            Topic::Notifications => "notifications",
            Topic::Contacts => "contacts",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown topic '{0}'")]
pub struct UnknownTopic(pub String);

impl FromStr for Topic {
    type Err = UnknownTopic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topic::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownTopic(s.to_string()))
    }
}
