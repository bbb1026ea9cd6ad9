use std::sync::LazyLock;

use regex::Regex;

/// Words never used as name or passage tokens.
pub const STOPWORDS: &[&str] = &["nip"];

const MIN_TOKEN_LEN: usize = 3;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z]+").expect("valid regex"));

// "nip budi santoso" style lookups: the stopword followed by a name
static FOCUS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bnip\s+([a-z][a-z\s\-']+)").expect("valid regex")
});

fn is_token(word: &str) -> bool {
    word.len() >= MIN_TOKEN_LEN && !STOPWORDS.contains(&word)
}

/// Lower-cased alphabetic runs of at least three letters, stopwords removed.
#[must_use]
pub fn query_tokens(query: &str) -> Vec<String> {
    let lowered = query.to_lowercase();
    WORD.find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|w| is_token(w))
        .map(str::to_string)
        .collect()
}

/// Tokens of the name following the stopword, e.g. `budi` and `santoso` in
/// "nip budi santoso berapa?".
///
/// Stopwords are dropped here too, so "nip budi nip" focuses on `budi` only and
/// never matches names that merely contain "nip".
#[must_use]
pub fn focus_tokens(query: &str) -> Vec<String> {
    let lowered = query.to_lowercase();
    FOCUS
        .captures(&lowered)
        .and_then(|caps| caps.get(1))
        .map(|m| query_tokens(m.as_str()))
        .unwrap_or_default()
}

/// Focus tokens first, then the remaining query tokens, without duplicates.
pub(crate) fn name_tokens(query: &str) -> Vec<String> {
    let mut tokens = focus_tokens(query);
    for token in query_tokens(query) {
        if !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    tokens
}
