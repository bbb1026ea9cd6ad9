//! Deterministic selection of the roster rows and page passages relevant to a query.
//!
//! Record matching is the union of three independent rules (full NIP, NIP prefix,
//! name token). Passage matching scores blank-line separated paragraphs by token
//! occurrence counts.

mod passages;
mod records;
mod tokens;

pub use passages::{score, select_passages, split_paragraphs, Page, Passage};
pub use records::{
    full_identifier_matches, identifier_prefix_matches, name_matches, select_records,
};
pub use tokens::{focus_tokens, query_tokens, STOPWORDS};
