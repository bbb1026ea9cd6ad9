use std::sync::LazyLock;

use regex::Regex;

use super::tokens::query_tokens;

static BLANK_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("valid regex"));

/// Text of one fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub url: String,
    pub text: String,
}

/// A scored paragraph and the page it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passage {
    pub source: String,
    pub text: String,
    pub score: usize,
}

#[must_use]
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    BLANK_LINE
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Sum of the non-overlapping occurrence counts of every token in `paragraph`.
#[must_use]
pub fn score(paragraph: &str, tokens: &[String]) -> usize {
    let lowered = paragraph.to_lowercase();
    tokens
        .iter()
        .map(|t| lowered.matches(t.as_str()).count())
        .sum()
}

fn best_of_page(page: &Page, tokens: &[String], per_page: usize) -> Vec<Passage> {
    let mut scored: Vec<Passage> = split_paragraphs(&page.text)
        .into_iter()
        .map(|p| Passage {
            source: page.url.clone(),
            text: p.to_string(),
            score: score(p, tokens),
        })
        .collect();
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(per_page);
    scored.retain(|p| p.score > 0);
    scored
}

/// Best `per_page` paragraphs of each page, then the best `max` overall.
///
/// Ties keep page order and paragraph order. A query without tokens selects
/// nothing.
#[must_use]
pub fn select_passages(query: &str, pages: &[Page], per_page: usize, max: usize) -> Vec<Passage> {
    let tokens = query_tokens(query);
    if tokens.is_empty() {
        return Vec::new();
    }
    let mut passages: Vec<Passage> = pages
        .iter()
        .filter(|page| !page.text.is_empty())
        .flat_map(|page| best_of_page(page, &tokens, per_page))
        .collect();
    passages.sort_by(|a, b| b.score.cmp(&a.score));
    passages.truncate(max);
    passages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(url: &str, text: &str) -> Page {
        Page {
            url: url.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_split_paragraphs() {
        let text = "first line\nstill first\n\n  \n second \n\n\n";
        assert_eq!(split_paragraphs(text), vec!["first line\nstill first", "second"]);
    }

    #[test]
    fn test_score_counts_occurrences() {
        let tokens = vec!["visi".to_string(), "misi".to_string()];
        assert_eq!(score("Visi dan Misi: visi kami", &tokens), 3);
        assert_eq!(score("tidak ada", &tokens), 0);
    }

    #[test]
    fn test_more_occurrences_rank_higher() {
        let pages = [page(
            "https://a",
            "layanan publik\n\nlayanan layanan layanan\n\nlain",
        )];
        let passages = select_passages("layanan", &pages, 2, 3);
        assert_eq!(passages.len(), 2);
        assert_eq!(passages[0].text, "layanan layanan layanan");
        assert_eq!(passages[0].score, 3);
        assert_eq!(passages[1].score, 1);
    }

    #[test]
    fn test_at_most_two_per_page() {
        let text = (0..6).map(|i| format!("profil {i}")).collect::<Vec<_>>().join("\n\n");
        let pages = [page("https://a", &text)];
        let passages = select_passages("profil", &pages, 2, 10);
        assert_eq!(passages.len(), 2);
        assert_eq!(passages[0].text, "profil 0");
        assert_eq!(passages[1].text, "profil 1");
    }

    #[test]
    fn test_overall_cap_across_pages() {
        let pages = [
            page("https://a", "sejarah\n\nsejarah sejarah"),
            page("https://b", "sejarah sejarah sejarah\n\nkosong"),
            page("https://c", ""),
        ];
        let passages = select_passages("sejarah", &pages, 2, 2);
        assert_eq!(passages.len(), 2);
        assert_eq!(passages[0].source, "https://b");
        assert_eq!(passages[1].source, "https://a");
        assert_eq!(passages[1].score, 2);
    }

    #[test]
    fn test_no_tokens_no_passages() {
        let pages = [page("https://a", "12 34 ab")];
        assert!(select_passages("12 ab", &pages, 2, 3).is_empty());
    }
}
