//! Conversation transcript - the ordered turns of one chat session

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;
use crate::domain::llm::Message;

/// System instruction opening every coaching conversation
pub const COACH_SYSTEM_INSTRUCTION: &str = "You are an AI interview coach helping users prepare for tech interviews in data, AI, and software roles.";

/// One turn of the conversation
///
/// Persisted as `{"type": "HumanMessage", "content": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ChatTurn {
    #[serde(rename = "SystemMessage")]
    System { content: String },
    #[serde(rename = "HumanMessage")]
    Human { content: String },
    #[serde(rename = "AIMessage")]
    Ai { content: String },
}

impl ChatTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self::System {
            content: content.into(),
        }
    }

    pub fn human(content: impl Into<String>) -> Self {
        Self::Human {
            content: content.into(),
        }
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self::Ai {
            content: content.into(),
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Self::System { content } | Self::Human { content } | Self::Ai { content } => content,
        }
    }

    pub fn is_system(&self) -> bool {
        matches!(self, Self::System { .. })
    }

    /// Convert into a provider message
    pub fn to_message(&self) -> Message {
        match self {
            Self::System { content } => Message::system(content.clone()),
            Self::Human { content } => Message::user(content.clone()),
            Self::Ai { content } => Message::assistant(content.clone()),
        }
    }
}

/// Transcript every new session starts from
pub fn initial_transcript() -> Vec<ChatTurn> {
    vec![ChatTurn::system(COACH_SYSTEM_INSTRUCTION)]
}

/// Persisted transcript, rewritten in full on every turn
#[async_trait]
pub trait TranscriptRepository: Send + Sync + Debug {
    /// Stored transcript, `None` when nothing was saved yet
    async fn load(&self) -> Result<Option<Vec<ChatTurn>>, DomainError>;

    async fn save(&self, turns: &[ChatTurn]) -> Result<(), DomainError>;

    /// Stored transcript or the initial one
    async fn load_or_initial(&self) -> Result<Vec<ChatTurn>, DomainError> {
        Ok(self.load().await?.unwrap_or_else(initial_transcript))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::MessageRole;

    #[test]
    fn test_turn_serialization_uses_message_class_tags() {
        let turns = vec![
            ChatTurn::system("sys"),
            ChatTurn::human("What is Big O notation?"),
            ChatTurn::ai("It describes growth."),
        ];

        let json = serde_json::to_value(&turns).unwrap();

        assert_eq!(
            json,
            serde_json::json!([
                {"type": "SystemMessage", "content": "sys"},
                {"type": "HumanMessage", "content": "What is Big O notation?"},
                {"type": "AIMessage", "content": "It describes growth."}
            ])
        );
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let result: Result<ChatTurn, _> =
            serde_json::from_str(r#"{"type": "ToolMessage", "content": "x"}"#);

        assert!(result.is_err());
    }

    #[test]
    fn test_to_message_roles() {
        assert_eq!(ChatTurn::system("a").to_message().role, MessageRole::System);
        assert_eq!(ChatTurn::human("b").to_message().role, MessageRole::User);
        assert_eq!(ChatTurn::ai("c").to_message().role, MessageRole::Assistant);
    }

    #[test]
    fn test_initial_transcript() {
        let transcript = initial_transcript();

        assert_eq!(transcript.len(), 1);
        assert!(transcript[0].is_system());
        assert_eq!(transcript[0].content(), COACH_SYSTEM_INSTRUCTION);
    }
}
