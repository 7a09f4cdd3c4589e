use std::path::Path;
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::window::{TimeWindow, DEFAULT_LOOKBACK_HOURS};

pub const DEFAULT_ENDPOINT: &str = "https://www.streamer-summaries.com:443/v1.0/clip";
pub const DEFAULT_PARENT_DOMAIN: &str = "www.streamer-summaries.com";
pub const CONFIG_FILE_NAME: &str = "clipgallery.toml";

/// Which body the endpoint returns. Not negotiated; the caller picks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ResponseShape {
    /// `{"clips": [...]}`: measure thumbnails, sort, click to play
    #[default]
    Clips,
    /// `{"clip_urls": [...]}`: render players directly
    #[value(name = "urls")]
    ClipUrls,
}

/// What a single failed thumbnail does to the rest of the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    #[default]
    SkipFailed,
    AbortAll,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub endpoint: String,
    pub parent_domain: String,
    pub lookback_hours: i64,
    pub shape: ResponseShape,
    pub failure_policy: FailurePolicy,
    pub request_timeout_secs: Option<u64>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            parent_domain: DEFAULT_PARENT_DOMAIN.to_string(),
            lookback_hours: DEFAULT_LOOKBACK_HOURS,
            shape: ResponseShape::default(),
            failure_policy: FailurePolicy::default(),
            request_timeout_secs: None,
        }
    }
}

impl LoaderConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> { toml::from_str(s).context("invalid loader config") }

    pub fn from_file(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path).with_context(|| format!("failed to read config: {}", path.display()))?;
        Self::from_toml_str(&s).with_context(|| format!("in {}", path.display()))
    }

    /// Defaults, then the explicit file (or `clipgallery.toml` in the working
    /// directory if present), then `CLIPGALLERY_*` environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut cfg = match explicit {
            Some(p) => Self::from_file(p)?,
            None => {
                let local = Path::new(CONFIG_FILE_NAME);
                if local.exists() { Self::from_file(local)? } else { Self::default() }
            }
        };
        cfg.apply_env(|k| std::env::var(k).ok());
        cfg.validate()?;
        Ok(cfg)
    }

    /// Rejects values that cannot produce a query window.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            TimeWindow::trailing_hours(Utc::now(), self.lookback_hours).is_some(),
            "lookback_hours = {} is out of range", self.lookback_hours
        );
        Ok(())
    }

    pub(crate) fn apply_env<F: Fn(&str) -> Option<String>>(&mut self, get: F) {
        if let Some(v) = get("CLIPGALLERY_ENDPOINT").filter(|s| !s.trim().is_empty()) { self.endpoint = v; }
        if let Some(v) = get("CLIPGALLERY_PARENT").filter(|s| !s.trim().is_empty()) { self.parent_domain = v; }
        if let Some(v) = get("CLIPGALLERY_LOOKBACK_HOURS").and_then(|s| s.trim().parse().ok()) { self.lookback_hours = v; }
        if let Some(v) = get("CLIPGALLERY_TIMEOUT_SECS").and_then(|s| s.trim().parse().ok()) { self.request_timeout_secs = Some(v); }
    }

    pub fn request_timeout(&self) -> Option<Duration> { self.request_timeout_secs.map(Duration::from_secs) }
}
