use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Resource group the refresh orchestrator targets.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Overview,
    System,
    Logs,
    Audit,
    Health,
}

impl Tab {
    /// Resolve any tab name; unknown names fall back to [`Tab::Overview`].
    pub fn from_name(name: &str) -> Self {
        name.trim().parse().unwrap_or_default()
    }
}
