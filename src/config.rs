//! Runtime configuration.
//!
//! Every field has a default matching the production site; `start_site_with_config`
//! accepts a (possibly partial) JSON object overriding any of them.

use serde::Deserialize;

use crate::error::Result;

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    pub loader: LoaderConfig,
    pub reveal: RevealConfig,
    pub stats: StatsConfig,
}

impl SiteConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Timings for the loading screen, all in milliseconds.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoaderConfig {
    pub min_load_ms: f64,
    pub max_load_ms: f64,
    /// Cap applied to `max_load_ms` once the window `load` event fires.
    pub loaded_max_ms: f64,
    /// Extra time past `max_load_ms` before the safety fallback force-completes.
    pub safety_margin_ms: f64,
    pub reveal_delay_ms: u32,
    pub cleanup_delay_ms: u32,
    pub first_type_ms: u32,
    pub type_ms: u32,
    pub final_type_ms: u32,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            min_load_ms: 3500.0,
            max_load_ms: 5000.0,
            loaded_max_ms: 2000.0,
            safety_margin_ms: 1000.0,
            reveal_delay_ms: 500,
            cleanup_delay_ms: 1500,
            first_type_ms: 40,
            type_ms: 20,
            final_type_ms: 10,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct RevealConfig {
    pub threshold: f64,
    pub stagger_step_ms: u32,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self { threshold: 0.1, stagger_step_ms: 100 }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct StatsConfig {
    pub storage_key: String,
    pub session_key: String,
    pub max_logs: usize,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            storage_key: "kalyan_stats".to_string(),
            session_key: "visited_this_session".to_string(),
            max_logs: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let cfg = SiteConfig::from_json("{}").unwrap();
        assert_eq!(cfg, SiteConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let json = r#"{"loader":{"min_load_ms":100.0},"stats":{"max_logs":5}}"#;
        let cfg = SiteConfig::from_json(json).unwrap();
        assert_eq!(cfg.loader.min_load_ms, 100.0);
        assert_eq!(cfg.loader.max_load_ms, 5000.0);
        assert_eq!(cfg.stats.max_logs, 5);
        assert_eq!(cfg.stats.storage_key, "kalyan_stats");
        assert_eq!(cfg.reveal, RevealConfig::default());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(SiteConfig::from_json("{loader:").is_err());
    }
}
