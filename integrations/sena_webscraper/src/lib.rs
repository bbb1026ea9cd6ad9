//! A web scraper implementing the `sena::pages::PageSource` trait.
//!
//! `WebScraper` fetches a page with a plain GET, strips the markup that never
//! carries content (scripts, styles, navigation, headers and footers), keeps the
//! longer lines of text, and caches the result per URL for a fixed time.

use std::time::Duration;

use async_trait::async_trait;
use scraper::{ElementRef, Html, Node};
use sena::config::WebSettings;
use sena::pages::{ExpiringCache, PageSource};
use tracing::{debug, instrument, warn};

/// Elements whose whole subtree is dropped before text extraction.
const SKIPPED_ELEMENTS: [&str; 5] = ["script", "style", "nav", "footer", "header"];

/// Text extraction limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extraction {
    /// Lines of this many characters or fewer are discarded
    pub min_line_chars: usize,
    pub max_lines: usize,
}

impl Default for Extraction {
    fn default() -> Self {
        Self {
            min_line_chars: 40,
            max_lines: 1000,
        }
    }
}

/// Cached HTTP page source.
///
/// ```rust,no_run
/// use sena::config::WebSettings;
/// use sena::pages::PageSource;
/// use sena_webscraper::WebScraper;
///
/// # async fn run() -> Result<(), reqwest::Error> {
/// let scraper = WebScraper::new(&WebSettings::default())?;
/// let text = scraper.page_text("https://example.com").await;
/// # Ok(())
/// # }
/// ```
pub struct WebScraper {
    client: reqwest::Client,
    cache: ExpiringCache<String, String>,
    extraction: Extraction,
}

impl WebScraper {
    /// Creates a new `WebScraper` from the web section of the settings.
    ///
    /// # Errors
    /// Fails if the HTTP client can't be built.
    pub fn new(settings: &WebSettings) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(settings.timeout())
            .build()?;
        Ok(Self {
            client,
            cache: ExpiringCache::new(settings.cache_ttl()),
            extraction: Extraction {
                min_line_chars: settings.min_line_chars,
                max_lines: settings.max_lines,
            },
        })
    }

    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        self.cache.ttl()
    }

    /// Fetches a page and extracts its text, empty on any failure.
    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Option<String> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Page fetch failed");
                return None;
            }
        };
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            warn!(%status, "Page fetch returned non-200 status");
            return None;
        }
        let html = match response.text().await {
            Ok(html) => html,
            Err(e) => {
                warn!(error = %e, "Failed to read page body");
                return None;
            }
        };
        let text = extract_text(&html, self.extraction);
        debug!(chars = text.len(), "Page text extracted");
        Some(text)
    }
}

#[async_trait]
impl PageSource for WebScraper {
    async fn page_text(&self, url: &str) -> String {
        let key = url.to_string();
        if let Some(text) = self.cache.get(&key) {
            return text;
        }
        match self.fetch(url).await {
            Some(text) => {
                self.cache.insert(key, text.clone());
                text
            }
            None => String::new(),
        }
    }
}

/// Visible text of an HTML document, one paragraph per kept line.
///
/// Every text node is split into trimmed lines; lines of `min_line_chars`
/// characters or fewer are dropped and at most `max_lines` are kept. The kept
/// lines are separated by blank lines.
#[must_use]
pub fn extract_text(html: &str, extraction: Extraction) -> String {
    let document = Html::parse_document(html);
    let mut lines = Vec::new();
    collect_lines(document.root_element(), &mut lines);
    lines
        .into_iter()
        .filter(|line| line.chars().count() > extraction.min_line_chars)
        .take(extraction.max_lines)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn collect_lines<'a>(element: ElementRef<'a>, lines: &mut Vec<&'a str>) {
    if SKIPPED_ELEMENTS.contains(&element.value().name()) {
        return;
    }
    for child in element.children() {
        match child.value() {
            Node::Text(text) => lines.extend(
                text.lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty()),
            ),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    collect_lines(child, lines);
                }
            }
            _ => {}
        }
    }
}
