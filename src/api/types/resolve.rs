//! Resolve and log endpoint payloads

use serde::{Deserialize, Serialize};

use crate::domain::audit::ClassificationLogEntry;
use crate::domain::classification::Classification;
use crate::domain::conversation::ChatTurn;
use crate::infrastructure::services::{Resolution, ResolutionOrigin};

/// POST /v1/resolve body
#[derive(Debug, Clone, Deserialize)]
pub struct ResolveRequest {
    pub query: String,
    /// Prior turns, oldest first, not including `query`
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OriginKind {
    Refused,
    Memory,
    Generated,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolveResponse {
    pub response: String,
    pub provenance: String,
    pub classification: Classification,
    pub origin: OriginKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_score: Option<f32>,
}

impl From<Resolution> for ResolveResponse {
    fn from(resolution: Resolution) -> Self {
        let provenance = resolution.provenance();
        let (origin, memory_score) = match resolution.origin {
            ResolutionOrigin::Refused => (OriginKind::Refused, None),
            ResolutionOrigin::Memory { score } => (OriginKind::Memory, Some(score)),
            ResolutionOrigin::Generated => (OriginKind::Generated, None),
        };

        Self {
            response: resolution.text,
            provenance,
            classification: resolution.classification,
            origin,
            memory_score,
        }
    }
}

/// GET /v1/classification-logs body
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationLogList {
    pub object: &'static str,
    pub data: Vec<ClassificationLogEntry>,
}

impl ClassificationLogList {
    pub fn new(data: Vec<ClassificationLogEntry>) -> Self {
        Self {
            object: "list",
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ContextLabel;

    #[test]
    fn test_request_history_defaults_empty() {
        let request: ResolveRequest =
            serde_json::from_str(r#"{"query": "What is a join?"}"#).unwrap();

        assert!(request.history.is_empty());
    }

    #[test]
    fn test_request_with_history() {
        let request: ResolveRequest = serde_json::from_str(
            r#"{"query": "And SQL?", "history": [
                {"type": "HumanMessage", "content": "Python tips?"},
                {"type": "AIMessage", "content": "Practice."}
            ]}"#,
        )
        .unwrap();

        assert_eq!(request.history, vec![ChatTurn::human("Python tips?"), ChatTurn::ai("Practice.")]);
    }

    #[test]
    fn test_memory_response_shape() {
        let resolution = Resolution {
            text: "cached".to_string(),
            classification: Classification::fuzzy(ContextLabel::InContext, 0.9),
            origin: ResolutionOrigin::Memory { score: 0.875 },
        };

        let json = serde_json::to_value(ResolveResponse::from(resolution)).unwrap();

        assert_eq!(json["origin"], "memory");
        assert_eq!(json["memory_score"], 0.875);
        assert_eq!(json["provenance"], "Fuzzy match (score: 0.90)");
        assert_eq!(json["classification"]["source"], "cache_fuzzy");
        assert_eq!(json["classification"]["label"], "in_context");
    }

    #[test]
    fn test_refused_response_omits_memory_score() {
        let resolution = Resolution {
            text: "no".to_string(),
            classification: Classification::exact(ContextLabel::OutOfContext),
            origin: ResolutionOrigin::Refused,
        };

        let json = serde_json::to_value(ResolveResponse::from(resolution)).unwrap();

        assert_eq!(json["origin"], "refused");
        assert!(json.get("memory_score").is_none());
        assert!(json["classification"].get("score").is_none());
    }
}
