//! Keyword matcher shared by the static domains.

use async_trait::async_trait;

use ardi_core::Error;
use ardi_core::knowledge::{KnowledgeResult, KnowledgeSource};

/// Highest confidence a keyword match can reach.
const MAX_CONFIDENCE: f64 = 0.95;

/// One answer and the keywords that select it.
///
/// Keywords are lowercase and may span several words.
#[derive(Debug, Clone)]
pub struct Entry {
    pub keywords: &'static [&'static str],
    pub category: &'static str,
    pub content: &'static str,
    pub table: Option<&'static str>,
}

/// A domain backed by a fixed list of entries.
#[derive(Debug)]
pub struct StaticDomain {
    name: String,
    entries: Vec<Entry>,
}

impl StaticDomain {
    pub fn new(name: impl Into<String>, entries: Vec<Entry>) -> Self {
        Self { name: name.into(), entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry with the most keyword hits and its hit count.
    fn best_match(&self, query: &str) -> Option<(&Entry, usize)> {
        let haystack = format!(" {} ", tokenize(query));
        let mut best: Option<(&Entry, usize)> = None;
        for entry in &self.entries {
            let hits = entry.keywords.iter().filter(|k| haystack.contains(&format!(" {k} "))).count();
            if hits > 0 && best.is_none_or(|(_, top)| hits > top) {
                best = Some((entry, hits));
            }
        }
        best
    }
}

#[async_trait]
impl KnowledgeSource for StaticDomain {
    async fn search(&self, query: &str) -> Result<Option<KnowledgeResult>, Error> {
        Ok(self.best_match(query).map(|(entry, hits)| {
            let result = KnowledgeResult::new(entry.content, self.name.as_str(), entry.category)
                .with_confidence(confidence(hits));
            match entry.table {
                Some(table) => result.with_table(table),
                None => result,
            }
        }))
    }
}

/// Lowercase words of `text`, punctuation treated as a word break.
pub fn tokenize(text: &str) -> String {
    let spaced: String =
        text.chars().map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { ' ' }).collect();
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn confidence(hits: usize) -> f64 {
    (0.6 + 0.1 * hits.saturating_sub(1) as f64).min(MAX_CONFIDENCE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain() -> StaticDomain {
        StaticDomain::new(
            "test",
            vec![
                Entry { keywords: &["um", "uninsured"], category: "um", content: "UM answer", table: None },
                Entry {
                    keywords: &["um", "uim", "underinsured", "stacking"],
                    category: "uim",
                    content: "UIM answer",
                    table: Some("| a | b |"),
                },
                Entry {
                    keywords: &["statute of limitations", "deadline"],
                    category: "sol",
                    content: "SOL answer",
                    table: None,
                },
            ],
        )
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("UM/UIM coverage?"), "um uim coverage");
        assert_eq!(tokenize("  What's   PIP "), "what s pip");
    }

    #[test]
    fn test_confidence() {
        assert!((confidence(1) - 0.6).abs() < 1e-9);
        assert!((confidence(3) - 0.8).abs() < 1e-9);
        assert!((confidence(10) - MAX_CONFIDENCE).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_most_hits_wins() {
        let result = domain().search("UM/UIM stacking").await.unwrap().unwrap();
        assert_eq!(result.content, "UIM answer");
        assert_eq!(result.table_content.as_deref(), Some("| a | b |"));
        assert!((result.confidence.unwrap() - 0.8).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_first_entry_wins_ties() {
        let result = domain().search("what is um").await.unwrap().unwrap();
        assert_eq!(result.content, "UM answer");
        assert_eq!(result.source, "test");
    }

    #[tokio::test]
    async fn test_whole_words_only() {
        assert!(domain().search("museum umbrella").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_multi_word_keyword() {
        let result = domain().search("When is the statute of limitations?").await.unwrap().unwrap();
        assert_eq!(result.category, "sol");
    }
}
