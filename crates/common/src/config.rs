//! Suite configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::error::{Error, Result};

/// Environment variable pointing at a TOML config file
pub const CONFIG_ENV: &str = "PRACTICE_QA_CONFIG";

/// Default site hosting the login page
pub const DEFAULT_BASE_URL: &str = "https://practicetestautomation.com";

/// Default resource API
pub const DEFAULT_API_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Top-level configuration for a suite run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Origin that relative page paths resolve against
    pub base_url: String,

    /// Resource API origin
    pub api_base_url: String,

    /// Browser viewport
    pub viewport: Viewport,

    /// How long a single command may wait for its condition
    pub command_timeout_ms: u64,

    /// Capture a full-page screenshot when a run fails
    pub screenshot_on_failure: bool,

    /// Record video (accepted for compatibility, Playwright scripts never record)
    pub video: bool,

    pub browser: Browser,

    pub headless: bool,

    /// Where failure screenshots are written
    pub screenshot_dir: PathBuf,

    pub report: ReportConfig,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            viewport: Viewport::default(),
            command_timeout_ms: 10_000,
            screenshot_on_failure: true,
            video: false,
            browser: Browser::default(),
            headless: true,
            screenshot_dir: PathBuf::from("test-results/screenshots"),
            report: ReportConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl Browser {
    pub fn as_str(&self) -> &'static str {
        match self {
            Browser::Chromium => "chromium",
            Browser::Firefox => "firefox",
            Browser::Webkit => "webkit",
        }
    }
}

impl std::str::FromStr for Browser {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "chromium" | "chrome" => Ok(Browser::Chromium),
            "firefox" => Ok(Browser::Firefox),
            "webkit" => Ok(Browser::Webkit),
            other => Err(Error::InvalidConfig(format!("unknown browser '{}'", other))),
        }
    }
}

/// Result report output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub dir: PathBuf,

    /// Reuse one result file instead of writing a timestamped file per run
    pub overwrite: bool,

    /// Also write an HTML summary
    pub html: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("test-results"),
            overwrite: false,
            html: true,
        }
    }
}

impl SuiteConfig {
    /// Parse a config from a TOML string; missing keys take their defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading suite config from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Config from `PRACTICE_QA_CONFIG` when set, defaults otherwise
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }

    /// Reject settings no run could use
    pub fn validate(&self) -> Result<()> {
        if self.command_timeout_ms == 0 {
            return Err(Error::InvalidConfig(
                "command_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(Error::InvalidConfig("viewport must not be empty".to_string()));
        }
        for (key, url) in [("base_url", &self.base_url), ("api_base_url", &self.api_base_url)] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(Error::InvalidConfig(format!(
                    "{} must be an http(s) URL, got '{}'",
                    key, url
                )));
            }
        }
        Ok(())
    }
}
