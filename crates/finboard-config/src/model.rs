use serde::{de::Deserializer, Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::ConfigError;

/// Runtime configuration for a finboard session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<Uuid>,
    #[serde(default = "Config::default_trend_months")]
    pub trend_months: u32,
    #[serde(default = "Config::default_upcoming_days")]
    pub upcoming_days: u32,
    pub locale: String,
    pub currency: String,
    #[serde(default)]
    pub preferences: Preferences,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            owner_id: None,
            trend_months: Self::default_trend_months(),
            upcoming_days: Self::default_upcoming_days(),
            locale: "en-US".into(),
            currency: "USD".into(),
            preferences: Preferences::default(),
        }
    }
}

impl Config {
    pub fn default_trend_months() -> u32 {
        6
    }

    pub fn default_upcoming_days() -> u32 {
        7
    }

    pub fn owner(&self) -> Result<Uuid, ConfigError> {
        self.owner_id.ok_or(ConfigError::Missing("owner_id"))
    }

    /// Checks the values a session cannot start without.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trend_months == 0 {
            return Err(ConfigError::Invalid {
                field: "trend_months",
                message: "must be at least 1".into(),
            });
        }
        self.owner()?;
        Ok(())
    }
}

/// Endpoint and credential of the remote data store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl StoreConfig {
    pub fn endpoint(&self) -> Result<&str, ConfigError> {
        match self.endpoint_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Ok(url.trim_end_matches('/')),
            _ => Err(ConfigError::Missing("store.endpoint_url")),
        }
    }

    pub fn key(&self) -> Result<&str, ConfigError> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(ConfigError::Missing("store.api_key")),
        }
    }
}

/// User settings round-tripped through settings backups.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Preferences {
    pub display_name: String,
    pub email: String,
    pub currency: String,
    pub date_format: String,
    pub due_alert_days: u32,
    pub theme: Theme,
    pub notifications: NotificationSettings,
    pub auto_backup: bool,
    pub history_days: u32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            display_name: "User".into(),
            email: String::new(),
            currency: "USD".into(),
            date_format: "DD/MM/YYYY".into(),
            due_alert_days: Self::default_due_alert_days(),
            theme: Theme::default(),
            notifications: NotificationSettings::default(),
            auto_backup: false,
            history_days: Self::default_history_days(),
        }
    }
}

impl Preferences {
    pub fn default_due_alert_days() -> u32 {
        3
    }

    pub fn default_history_days() -> u32 {
        365
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct NotificationSettings {
    pub enabled: bool,
    pub due_dates: bool,
    pub budgets: bool,
    pub goals: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            due_dates: true,
            budgets: true,
            goals: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Auto,
}

impl Theme {
    fn from_value(value: Option<String>) -> Self {
        value
            .map(|v| Theme::parse(v.trim()))
            .unwrap_or_default()
    }

    /// Lenient parse; unknown names fall back to the light theme.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "dark" => Theme::Dark,
            "auto" | "system" => Theme::Auto,
            _ => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Auto => "auto",
        };
        f.write_str(label)
    }
}

impl<'de> Deserialize<'de> for Theme {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(Theme::from_value(value))
    }
}
