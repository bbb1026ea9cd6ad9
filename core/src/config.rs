//! Session settings, read from an optional JSON file.
//!
//! Every field has a default, so an empty object (or no file at all) gives the
//! stock PSEKP setup. Secrets never live here; providers read them from the
//! environment.
//!
//! ```json
//! {
//!     "data_path": "data/kepegawaian.xlsx",
//!     "providers": ["openrouter", "openai"],
//!     "web": { "urls": ["https://example.com"], "cache_ttl_secs": 600 }
//! }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::roster::DEFAULT_SHEET;

pub const DEFAULT_DATA_PATH: &str = "data/kepegawaian.xlsx";
pub const DEFAULT_MAX_CONTEXT_ROWS: usize = 100;
pub const DEFAULT_MAX_WEB_SNIPPETS: usize = 3;
pub const DEFAULT_SNIPPETS_PER_PAGE: usize = 2;
pub const DEFAULT_URLS: [&str; 3] = [
    "https://psekp.setjen.pertanian.go.id/web/",
    "https://psekp.setjen.pertanian.go.id/web/?page_id=396",
    "https://psekp.setjen.pertanian.go.id/web/?page_id=594",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file `{0}`: {1}")]
    Io(PathBuf, #[source] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Completion providers that can be named in [`Settings::providers`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenRouter,
    OpenAI,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub data_path: PathBuf,
    pub sheet: String,
    pub max_context_rows: usize,
    pub max_web_snippets: usize,
    pub snippets_per_page: usize,
    /// Tried in order; later entries are fallbacks.
    pub providers: Vec<ProviderKind>,
    pub web: WebSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            sheet: DEFAULT_SHEET.to_string(),
            max_context_rows: DEFAULT_MAX_CONTEXT_ROWS,
            max_web_snippets: DEFAULT_MAX_WEB_SNIPPETS,
            snippets_per_page: DEFAULT_SNIPPETS_PER_PAGE,
            providers: vec![ProviderKind::OpenRouter],
            web: WebSettings::default(),
        }
    }
}

/// Page fetching parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WebSettings {
    pub urls: Vec<String>,
    pub cache_ttl_secs: u64,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Lines of this many characters or fewer are dropped.
    pub min_line_chars: usize,
    pub max_lines: usize,
}

impl Default for WebSettings {
    fn default() -> Self {
        Self {
            urls: DEFAULT_URLS.iter().map(ToString::to_string).collect(),
            cache_ttl_secs: 3600,
            timeout_secs: 20,
            user_agent: "Mozilla/5.0".to_string(),
            min_line_chars: 40,
            max_lines: 1000,
        }
    }
}

impl WebSettings {
    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Settings {
    /// Parse settings from a JSON string.
    ///
    /// # Errors
    /// Malformed JSON, unknown fields and unknown provider names are rejected.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read settings from `path`, or use the defaults when `path` is `None`.
    ///
    /// # Errors
    /// See [`Settings::from_json`]; an unreadable file is an error too.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_json(&json)
    }
}
