//! Embedding request types

use serde::{Deserialize, Serialize};

/// Request to embed one query text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    model: String,
    texts: Vec<String>,
}

impl EmbeddingRequest {
    pub fn query(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            texts: vec![text.into()],
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_request() {
        let request = EmbeddingRequest::query("embed-english-v3.0", "What are joins in SQL?");

        assert_eq!(request.model(), "embed-english-v3.0");
        assert_eq!(request.texts(), ["What are joins in SQL?".to_string()]);
    }
}
