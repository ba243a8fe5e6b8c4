//! # Dashboard configuration — `studio.toml`
//!
//! Read once by the server at startup. Every section has production defaults,
//! so a missing or empty file is equivalent to the default configuration.
//!
//! ```toml
//! [studio]
//! name = "Victims of Ink"
//!
//! [session]
//! expiry_days = 7          # inactivity expiry for staff sessions
//!
//! [feed]
//! long_poll_secs = 25      # how long the artist feed waits for a change
//! ```

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StudioConfig {
    #[serde(default)]
    pub studio: StudioSection,
    #[serde(default)]
    pub session: SessionSection,
    #[serde(default)]
    pub feed: FeedSection,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StudioSection {
    #[serde(default = "default_studio_name")]
    pub name: String,
}

fn default_studio_name() -> String {
    "Victims of Ink".to_string()
}

impl Default for StudioSection {
    fn default() -> Self {
        Self {
            name: default_studio_name(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSection {
    #[serde(default = "default_expiry_days")]
    pub expiry_days: u32,
}

fn default_expiry_days() -> u32 {
    7
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            expiry_days: default_expiry_days(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedSection {
    #[serde(default = "default_long_poll_secs")]
    pub long_poll_secs: u64,
}

fn default_long_poll_secs() -> u64 {
    25
}

impl Default for FeedSection {
    fn default() -> Self {
        Self {
            long_poll_secs: default_long_poll_secs(),
        }
    }
}

impl StudioConfig {
    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "studio.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_default() {
        let config = StudioConfig::from_toml("").unwrap();
        assert_eq!(config, StudioConfig::default());
        assert_eq!(config.studio.name, "Victims of Ink");
        assert_eq!(config.session.expiry_days, 7);
        assert_eq!(config.feed.long_poll_secs, 25);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = StudioConfig::from_toml("[session]\nexpiry_days = 1\n").unwrap();
        assert_eq!(config.session.expiry_days, 1);
        assert_eq!(config.feed, FeedSection::default());
    }

    #[test]
    fn toml_roundtrip() {
        let mut config = StudioConfig::default();
        config.studio.name = "Ink Annex".to_string();
        config.feed.long_poll_secs = 5;
        let text = config.to_toml().unwrap();
        assert_eq!(StudioConfig::from_toml(&text).unwrap(), config);
    }
}
