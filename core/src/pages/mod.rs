//! Web page text used as a second context source.

mod cache;

use std::collections::HashMap;

use async_trait::async_trait;

pub use cache::ExpiringCache;

/// Something that can hand out the plain text of a page.
///
/// Failures are not errors here: an unreachable or unusable page yields an
/// empty string, and the query carries on with the other sources.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn page_text(&self, url: &str) -> String;
}

/// Fixed page texts, keyed by URL.
#[derive(Debug, Clone, Default)]
pub struct StaticPages(HashMap<String, String>);

impl StaticPages {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_page(mut self, url: impl Into<String>, text: impl Into<String>) -> Self {
        self.0.insert(url.into(), text.into());
        self
    }
}

#[async_trait]
impl PageSource for StaticPages {
    async fn page_text(&self, url: &str) -> String {
        self.0.get(url).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_pages() {
        let pages = StaticPages::new().with_page("https://a", "profil");
        assert_eq!(pages.page_text("https://a").await, "profil");
        assert_eq!(pages.page_text("https://b").await, "");
    }
}
