//! # SENA - Core API Documentation
//!
//! SENA answers questions about an office's staff and its public web pages by
//! grounding a hosted chat model on a small, deterministically selected context.
//!
//! ## Pipeline
//!
//! - **Roster**: the employee table, loaded once from a workbook or CSV file
//! - **Selector**: picks the rows (full NIP, NIP prefix, name token) and the page
//!   paragraphs (token occurrence score) relevant to a query
//! - **Context**: serializes the selection into a tagged context block
//! - **Completion models**: OpenRouter, OpenAI, or an ordered fallback chain
//! - **Assistant**: ties the above together, one query at a time
//!
//! ## Example
//!
//! ```rust,no_run
//! use sena::assistant::Assistant;
//! use sena::config::Settings;
//! use sena::pages::StaticPages;
//! use sena::providers::completions::OpenRouter;
//! use sena::roster::Roster;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sena::error::Error> {
//!     let settings = Settings::default();
//!     let roster = Roster::load(&settings.data_path, &settings.sheet)?;
//!     let model = OpenRouter::new(None).expect("valid config");
//!     let assistant = Assistant::new(roster, StaticPages::new(), model, settings);
//!
//!     if let Some(answer) = assistant.ask("nip restu wibowo").await? {
//!         println!("{}", answer.text);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Page scraping lives in the `sena_webscraper` crate, which implements
//! [`pages::PageSource`] over HTTP.

/// Query resolution: context selection, prompting and answer post-processing
pub mod assistant;

/// Language model completion abstraction
pub mod completion;

/// Session settings
pub mod config;

/// Context block assembly and prompts
pub mod context;

/// Error types for all library operations
pub mod error;

/// Page text sources and their cache
pub mod pages;

/// Builtin completion model providers
pub mod providers;

/// Employee roster loading
pub mod roster;

/// Record and passage selection
pub mod selector;
