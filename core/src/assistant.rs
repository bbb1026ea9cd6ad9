//! One query at a time: select context, prompt the model, return its answer.

use tracing::{debug, info, instrument};

use crate::completion::{CompletionModel, Message};
use crate::config::Settings;
use crate::context::{self, Context, NO_DATA, SYSTEM_PROMPT};
use crate::error::Error;
use crate::pages::PageSource;
use crate::roster::Roster;
use crate::selector::{select_passages, select_records, Page};

/// Reply to a single query.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    /// Model output, or [`NO_DATA`] when the model returned nothing
    pub text: String,
    /// Context the answer was grounded on
    pub context: Context,
}

/// Owns everything a session needs: the roster, where pages come from, the
/// completion model and the settings.
pub struct Assistant<P: PageSource, M: CompletionModel> {
    roster: Roster,
    pages: P,
    model: M,
    settings: Settings,
}

impl<P: PageSource, M: CompletionModel> Assistant<P, M> {
    pub fn new(roster: Roster, pages: P, model: M, settings: Settings) -> Self {
        Self {
            roster,
            pages,
            model,
            settings,
        }
    }

    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Fetch every configured page, in order. Unusable pages come back empty.
    async fn fetch_pages(&self) -> Vec<Page> {
        let mut pages = Vec::with_capacity(self.settings.web.urls.len());
        for url in &self.settings.web.urls {
            let text = self.pages.page_text(url).await;
            debug!(%url, chars = text.len(), "Page text ready");
            pages.push(Page {
                url: url.clone(),
                text,
            });
        }
        pages
    }

    /// Select records and passages for `query` and assemble the context block.
    ///
    /// # Errors
    /// Only fails if the roster rows can't be serialized.
    #[instrument(skip(self))]
    pub async fn context(&self, query: &str) -> Result<Context, Error> {
        let records = select_records(&self.roster, query);
        let pages = self.fetch_pages().await;
        let passages = select_passages(
            query,
            &pages,
            self.settings.snippets_per_page,
            self.settings.max_web_snippets,
        );
        let context = context::assemble(query, &records, passages, self.settings.max_context_rows)?;
        info!(
            records = context.records,
            passages = context.passages.len(),
            mode = ?context.mode,
            "Context assembled"
        );
        Ok(context)
    }

    /// Answer `query` from the roster and pages.
    ///
    /// Blank queries do nothing and return `Ok(None)`. The model is called once;
    /// a failed call is returned as is and leaves the assistant usable.
    ///
    /// # Errors
    /// Returns [`Error::Completion`] when the model call fails.
    #[instrument(skip(self), fields(provider = self.model.name()))]
    pub async fn ask(&self, query: &str) -> Result<Option<Answer>, Error> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }
        let context = self.context(query).await?;
        let messages = [
            Message::Preamble(SYSTEM_PROMPT.to_string()),
            Message::User(context.user_prompt(query)),
        ];
        let (reply, _usage) = self
            .model
            .send(&messages, context.mode.temperature(), None)
            .await?;

        let text = reply.content();
        let text = if text.trim().is_empty() { NO_DATA } else { text }.to_string();
        Ok(Some(Answer { text, context }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::{CompletionError, TokenUsage};
    use crate::context::{ContextMode, EMPTY_CONTEXT};
    use crate::pages::StaticPages;
    use crate::roster::Record;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording {
        reply: String,
        fail: bool,
        seen: Mutex<Vec<(Vec<Message>, f64)>>,
    }

    #[async_trait]
    impl CompletionModel for Recording {
        fn name(&self) -> &str {
            "recording"
        }

        async fn send(
            &self,
            messages: &[Message],
            temperature: f64,
            _max_tokens: Option<usize>,
        ) -> Result<(Message, TokenUsage), CompletionError> {
            self.seen
                .lock()
                .unwrap()
                .push((messages.to_vec(), temperature));
            if self.fail {
                return Err(CompletionError::ProviderError(503, "unavailable".to_string()));
            }
            Ok((Message::Assistant(self.reply.clone()), TokenUsage::default()))
        }
    }

    fn roster() -> Roster {
        Roster::from_records(vec![
            Record {
                nip: "199001012020031001".to_string(),
                name: Some("Restu Wibowo".to_string()),
                ..Default::default()
            },
            Record {
                nip: "198502022010011002".to_string(),
                name: Some("Siti Aminah".to_string()),
                ..Default::default()
            },
        ])
    }

    fn settings() -> Settings {
        let mut settings = Settings::default();
        settings.web.urls = vec!["https://a".to_string(), "https://b".to_string()];
        settings
    }

    fn pages() -> StaticPages {
        StaticPages::new()
            .with_page("https://a", "Sejarah singkat pusat.\n\nLayanan data dan layanan informasi.")
            .with_page("https://b", "Visi dan misi.")
    }

    fn assistant(model: Recording) -> Assistant<StaticPages, Recording> {
        Assistant::new(roster(), pages(), model, settings())
    }

    #[tokio::test]
    async fn test_roster_query_is_prompted_with_csv_context() {
        let assistant = assistant(Recording {
            reply: "Restu Wibowo [Excel]".to_string(),
            ..Default::default()
        });
        let answer = assistant.ask("  nip restu  ").await.unwrap().unwrap();
        assert_eq!(answer.text, "Restu Wibowo [Excel]");
        assert_eq!(answer.context.mode, ContextMode::Roster);
        assert_eq!(answer.context.records, 1);

        let seen = assistant.model.seen.lock().unwrap();
        let (messages, temperature) = &seen[0];
        assert_eq!(*temperature, 0.35);
        assert_eq!(messages[0], Message::Preamble(SYSTEM_PROMPT.to_string()));
        let prompt = messages[1].content();
        assert!(prompt.contains("199001012020031001,Restu Wibowo"));
        assert!(!prompt.contains("Siti"));
        assert!(prompt.ends_with("PERTANYAAN:\nnip restu"));
    }

    #[tokio::test]
    async fn test_org_query_uses_web_passages() {
        let assistant = assistant(Recording {
            reply: "Layanan data [Web]".to_string(),
            ..Default::default()
        });
        let context = assistant.context("layanan apa saja?").await.unwrap();
        assert_eq!(context.mode, ContextMode::Website);
        assert_eq!(context.passages.len(), 1);
        assert_eq!(
            context.block,
            "Sumber: [Web]\nLayanan data dan layanan informasi."
        );
    }

    #[tokio::test]
    async fn test_no_match_gives_empty_context_and_fallback_answer() {
        let assistant = assistant(Recording::default());
        let answer = assistant.ask("cuaca besok").await.unwrap().unwrap();
        assert_eq!(answer.context.block, EMPTY_CONTEXT);
        assert_eq!(answer.text, NO_DATA);
    }

    #[tokio::test]
    async fn test_reply_is_returned_verbatim() {
        let padded = assistant(Recording {
            reply: "  - Restu Wibowo [Excel]\n".to_string(),
            ..Default::default()
        });
        let answer = padded.ask("nip restu").await.unwrap().unwrap();
        assert_eq!(answer.text, "  - Restu Wibowo [Excel]\n");

        let blank = assistant(Recording {
            reply: " \n\t".to_string(),
            ..Default::default()
        });
        let answer = blank.ask("nip restu").await.unwrap().unwrap();
        assert_eq!(answer.text, NO_DATA);
    }

    #[tokio::test]
    async fn test_blank_query_does_nothing() {
        let assistant = assistant(Recording::default());
        assert!(assistant.ask("   ").await.unwrap().is_none());
        assert!(assistant.model.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_model_failure_is_per_query() {
        let assistant = assistant(Recording {
            fail: true,
            ..Default::default()
        });
        let result = assistant.ask("restu").await;
        assert!(matches!(
            result,
            Err(Error::Completion(CompletionError::ProviderError(503, _)))
        ));
        // the roster and pages are untouched; the next query still selects
        let context = assistant.context("siti").await.unwrap();
        assert_eq!(context.records, 1);
    }
}
