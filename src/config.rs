//! Page configuration.
//!
//! Read from an optional `<script type="application/json" id="casino-live-config">`
//! blob the server renders into the page. Every field has a default, so an
//! absent blob or a partial one is fine.

use serde::{Deserialize, Deserializer};

use crate::error::Error;

/// Id of the `<script>` element carrying the JSON config.
pub const CONFIG_ELEMENT_ID: &str = "casino-live-config";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RegionConfig {
    /// Selector of the paginated container.
    pub selector: String,
    /// Query parameter that carries the page number.
    pub page_param: String,
    /// Selector, relative to the container, of the pagination anchors.
    pub anchor_selector: String,
    pub refresh_interval_ms: u32,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            selector: "#salas-container".to_string(),
            page_param: "page".to_string(),
            anchor_selector: ".pagination a.page-link".to_string(),
            refresh_interval_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NotifierConfig {
    pub auto_dismiss_ms: u32,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            auto_dismiss_ms: 8000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub region: RegionConfig,
    pub notifier: NotifierConfig,
    pub balance_selector: String,
    /// Identity of the signed-in player; balance sync is off without it.
    #[serde(deserialize_with = "id_string")]
    pub player_id: Option<String>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region: RegionConfig::default(),
            notifier: NotifierConfig::default(),
            balance_selector: "#balance".to_string(),
            player_id: None,
            log_level: "info".to_string(),
        }
    }
}

/// Player ids are rendered either as JSON strings or bare numbers.
fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }
    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    }))
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(json)?)
    }

    pub fn log_level(&self) -> log::Level {
        match self.log_level.to_ascii_lowercase().as_str() {
            "error" => log::Level::Error,
            "warn" | "warning" => log::Level::Warn,
            "debug" => log::Level::Debug,
            "trace" => log::Level::Trace,
            _ => log::Level::Info,
        }
    }
}
