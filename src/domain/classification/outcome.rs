//! Result of classifying one query

use serde::{Deserialize, Serialize};

use super::ContextLabel;

/// Which branch of the classifier produced the label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationSource {
    CacheExact,
    CacheFuzzy,
    LlmClassification,
}

impl ClassificationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CacheExact => "cache_exact",
            Self::CacheFuzzy => "cache_fuzzy",
            Self::LlmClassification => "llm_classification",
        }
    }
}

/// A label plus how it was obtained
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: ContextLabel,
    pub source: ClassificationSource,
    /// Similarity of the matched cache entry, fuzzy branch only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl Classification {
    pub fn exact(label: ContextLabel) -> Self {
        Self {
            label,
            source: ClassificationSource::CacheExact,
            score: None,
        }
    }

    pub fn fuzzy(label: ContextLabel, score: f32) -> Self {
        Self {
            label,
            source: ClassificationSource::CacheFuzzy,
            score: Some(score),
        }
    }

    pub fn oracle(label: ContextLabel) -> Self {
        Self {
            label,
            source: ClassificationSource::LlmClassification,
            score: None,
        }
    }

    pub fn is_in_context(&self) -> bool {
        self.label.is_in_context()
    }

    /// Human readable provenance shown next to an answer
    pub fn provenance(&self) -> String {
        match (self.source, self.score) {
            (ClassificationSource::CacheExact, _) => "Exact match".to_string(),
            (ClassificationSource::CacheFuzzy, Some(score)) => {
                format!("Fuzzy match (score: {:.2})", score)
            }
            (ClassificationSource::CacheFuzzy, None) => "Fuzzy match".to_string(),
            (ClassificationSource::LlmClassification, _) => "LLM classification".to_string(),
        }
    }
}
