//! Values returned by knowledge domain searches.

use serde::{Deserialize, Serialize};

/// How a result was produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultMetadata {
    /// Wall time spent producing the result, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<u64>,

    /// `parallel`, `sequential` or `fallback`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_method: Option<String>,

    /// Whether the result came out of the response cache.
    #[serde(default)]
    pub cache_hit: bool,

    /// Times the cached entry has been served, including this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hit_count: Option<u64>,

    /// Age of the cached entry when served, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_age_ms: Option<i64>,

    /// Number of domains consulted for this result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domains_searched: Option<usize>,

    /// Whether a fallback strategy produced this result.
    #[serde(default)]
    pub fallback_used: bool,

    /// Name of the fallback strategy, when one was used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_strategy: Option<String>,
}

/// A single answer from a knowledge domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeResult {
    /// Markdown answer text.
    pub content: String,

    /// Optional markdown table rendered below the answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_content: Option<String>,

    /// Domain (or strategy) that produced the answer.
    pub source: String,

    /// Topic label within the source.
    pub category: String,

    /// Match confidence in 0.0..=1.0, when the source scores its matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    #[serde(default)]
    pub metadata: ResultMetadata,
}

impl KnowledgeResult {
    /// Create an unscored result with empty metadata.
    pub fn new(content: impl Into<String>, source: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            table_content: None,
            source: source.into(),
            category: category.into(),
            confidence: None,
            metadata: ResultMetadata::default(),
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence.clamp(0.0, 1.0));
        self
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table_content = Some(table.into());
        self
    }

    /// Confidence used for filtering and ranking.
    ///
    /// Results without a score count as `unscored`.
    pub fn effective_confidence(&self, unscored: f64) -> f64 {
        self.confidence.unwrap_or(unscored)
    }
}
