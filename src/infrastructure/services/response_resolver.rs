//! Query resolution: classify, then answer from memory or generate
//!
//! Out-of-context queries get a fixed refusal without touching memory or
//! the generator. In-context queries reuse a remembered answer when one is
//! similar enough, otherwise the generator is called exactly once and its
//! answer is remembered.

use std::sync::Arc;

use tracing::info;

use super::{ChatModel, ContextClassifier, ResponseMemory};
use crate::domain::audit::{AuditLog, AuditSource, ClassificationLogEntry, ResponseType};
use crate::domain::classification::{Classification, ContextLabel};
use crate::domain::conversation::{COACH_SYSTEM_INSTRUCTION, ChatTurn};
use crate::domain::DomainError;
use crate::domain::llm::Message;
use crate::infrastructure::observability::record_resolution;

pub const REFUSAL_MESSAGE: &str = "🛑 This chatbot is designed to help with career and interview-related questions. Please ask something relevant to job preparation.";

/// How the answer text was produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolutionOrigin {
    Refused,
    Memory { score: f32 },
    Generated,
}

impl ResolutionOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Refused => "refused",
            Self::Memory { .. } => "memory",
            Self::Generated => "generated",
        }
    }
}

/// Answer to one query plus its provenance
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub text: String,
    pub classification: Classification,
    pub origin: ResolutionOrigin,
}

impl Resolution {
    /// Human readable source of the classification
    pub fn provenance(&self) -> String {
        self.classification.provenance()
    }
}

/// Annotate a remembered answer with its similarity
pub fn annotate_memory_response(response: &str, score: f32) -> String {
    format!(
        "{}\n\n💾 (_Matched from previous chat, similarity: {:.2}_)",
        response, score
    )
}

#[derive(Debug, Clone)]
pub struct ResponseResolver {
    classifier: ContextClassifier,
    memory: ResponseMemory,
    generator: ChatModel,
    audit_log: Arc<dyn AuditLog>,
}

impl ResponseResolver {
    pub fn new(
        classifier: ContextClassifier,
        memory: ResponseMemory,
        generator: ChatModel,
        audit_log: Arc<dyn AuditLog>,
    ) -> Self {
        Self {
            classifier,
            memory,
            generator,
            audit_log,
        }
    }

    /// Resolve `query` given the prior turns of the conversation
    ///
    /// `history` excludes the query itself. System turns in it are ignored;
    /// the coach instruction is always sent first.
    pub async fn resolve(
        &self,
        query: &str,
        history: &[ChatTurn],
    ) -> Result<Resolution, DomainError> {
        if query.trim().is_empty() {
            return Err(DomainError::validation("Query must not be empty"));
        }

        let classification = self.classifier.classify(query).await?;

        if classification.label != ContextLabel::InContext {
            info!(source = classification.source.as_str(), "Refusing out-of-context query");
            return Ok(self.finish(REFUSAL_MESSAGE.to_string(), classification, ResolutionOrigin::Refused));
        }

        let lookup = self.memory.find_similar(query).await?;

        if let Some(hit) = lookup.hit {
            info!(score = hit.score, matched = %hit.query, "Answering from response memory");
            self.audit(query, AuditSource::EmbeddingMemory, Some(hit.score), ResponseType::MemoryFuzzy)
                .await?;

            return Ok(self.finish(
                annotate_memory_response(&hit.response, hit.score),
                classification,
                ResolutionOrigin::Memory { score: hit.score },
            ));
        }

        info!(history_turns = history.len(), "Generating answer");
        let answer = self
            .generator
            .complete("generate", generation_messages(query, history))
            .await?;

        self.memory.append(query, answer.clone(), lookup.embedding).await?;
        self.audit(query, AuditSource::LlmGenerated, None, ResponseType::LlmGenerated)
            .await?;

        Ok(self.finish(answer, classification, ResolutionOrigin::Generated))
    }

    async fn audit(
        &self,
        query: &str,
        source: AuditSource,
        score: Option<f32>,
        response_type: ResponseType,
    ) -> Result<(), DomainError> {
        let entry = ClassificationLogEntry::new(
            query,
            ContextLabel::InContext,
            source,
            score,
            Some(response_type),
        );
        self.audit_log.append(&entry).await
    }

    fn finish(
        &self,
        text: String,
        classification: Classification,
        origin: ResolutionOrigin,
    ) -> Resolution {
        record_resolution(origin.as_str());

        Resolution {
            text,
            classification,
            origin,
        }
    }
}

fn generation_messages(query: &str, history: &[ChatTurn]) -> Vec<Message> {
    std::iter::once(Message::system(COACH_SYSTEM_INSTRUCTION))
        .chain(
            history
                .iter()
                .filter(|turn| !turn.is_system())
                .map(ChatTurn::to_message),
        )
        .chain(std::iter::once(Message::user(query)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::classification::{CachedClassification, ClassificationSource};
    use crate::domain::embedding::MockEmbeddingProvider;
    use crate::domain::llm::{MessageRole, MockLlmProvider};
    use crate::domain::memory::{MemoryEntry, ResponseMemoryRepository};
    use crate::infrastructure::audit::InMemoryAuditLog;
    use crate::infrastructure::services::{ClassificationCache, TextEmbedder};
    use crate::infrastructure::storage::{InMemoryClassificationCache, InMemoryResponseMemory};

    const MODEL: &str = "claude-3-5-sonnet-20240620";
    const BIG_O: &str = "What is Big O notation?";

    struct Fixture {
        resolver: ResponseResolver,
        embedder: Arc<MockEmbeddingProvider>,
        oracle: Arc<MockLlmProvider>,
        generator: Arc<MockLlmProvider>,
        memory: Arc<InMemoryResponseMemory>,
        audit_log: Arc<InMemoryAuditLog>,
    }

    fn fixture(
        cache: InMemoryClassificationCache,
        memory: InMemoryResponseMemory,
        embedder: MockEmbeddingProvider,
        oracle: MockLlmProvider,
        generator: MockLlmProvider,
    ) -> Fixture {
        let embedder = Arc::new(embedder);
        let oracle = Arc::new(oracle);
        let generator = Arc::new(generator);
        let memory = Arc::new(memory);
        let audit_log = Arc::new(InMemoryAuditLog::new());
        let text_embedder = TextEmbedder::with_default_model(embedder.clone());

        let classifier = ContextClassifier::new(
            ClassificationCache::new(Arc::new(cache), text_embedder.clone()),
            ChatModel::new(oracle.clone(), MODEL),
            audit_log.clone(),
        );
        let resolver = ResponseResolver::new(
            classifier,
            ResponseMemory::new(memory.clone(), text_embedder),
            ChatModel::new(generator.clone(), MODEL),
            audit_log.clone(),
        );

        Fixture {
            resolver,
            embedder,
            oracle,
            generator,
            memory,
            audit_log,
        }
    }

    fn out_of_context_cache(key: &str) -> InMemoryClassificationCache {
        InMemoryClassificationCache::with_entries([(
            key.to_string(),
            CachedClassification::new(ContextLabel::OutOfContext, vec![0.0, 1.0]),
        )])
    }

    #[tokio::test]
    async fn test_out_of_context_short_circuits() {
        let f = fixture(
            out_of_context_cache("should i drink tea before my interview?"),
            InMemoryResponseMemory::new(),
            MockEmbeddingProvider::new("mock", 2),
            MockLlmProvider::new("oracle"),
            MockLlmProvider::new("generator"),
        );

        let resolution = f
            .resolver
            .resolve("Should I drink tea before my interview?", &[])
            .await
            .unwrap();

        assert_eq!(resolution.text, REFUSAL_MESSAGE);
        assert_eq!(resolution.origin, ResolutionOrigin::Refused);
        assert_eq!(resolution.provenance(), "Exact match");
        assert_eq!(f.embedder.call_count(), 0);
        assert_eq!(f.generator.call_count(), 0);
        assert_eq!(f.memory.len().await.unwrap(), 0);
        assert_eq!(f.audit_log.read_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_oracle_refusal_never_touches_memory() {
        let f = fixture(
            InMemoryClassificationCache::new(),
            InMemoryResponseMemory::new(),
            MockEmbeddingProvider::new("mock", 2).with_vector("tell me about your family.", vec![0.0, 1.0]),
            MockLlmProvider::new("oracle").with_reply("OUT_OF_CONTEXT"),
            MockLlmProvider::new("generator"),
        );

        let resolution = f.resolver.resolve("Tell me about your family.", &[]).await.unwrap();

        assert_eq!(resolution.text, REFUSAL_MESSAGE);
        assert_eq!(resolution.provenance(), "LLM classification");
        // only the cache-recording embedding, no memory lookup
        assert_eq!(f.embedder.call_count(), 1);
        assert_eq!(f.generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_first_big_o_query_generates_and_remembers() {
        let f = fixture(
            InMemoryClassificationCache::new(),
            InMemoryResponseMemory::new(),
            MockEmbeddingProvider::new("mock", 3).with_vector(BIG_O, vec![0.1, 0.7, 0.7]),
            MockLlmProvider::new("oracle").with_reply("IN_CONTEXT"),
            MockLlmProvider::new("generator").with_reply("Big O describes growth rate."),
        );

        let resolution = f.resolver.resolve(BIG_O, &[]).await.unwrap();

        assert_eq!(resolution.text, "Big O describes growth rate.");
        assert_eq!(resolution.origin, ResolutionOrigin::Generated);
        assert_eq!(resolution.classification.source, ClassificationSource::LlmClassification);
        assert_eq!(f.oracle.call_count(), 1);
        assert_eq!(f.generator.call_count(), 1);

        let remembered = f.memory.list().await.unwrap();
        assert_eq!(
            remembered,
            vec![MemoryEntry::new(BIG_O, "Big O describes growth rate.", vec![0.1, 0.7, 0.7])]
        );

        let logs = f.audit_log.read_all().await.unwrap();
        let tags: Vec<(AuditSource, Option<ResponseType>)> =
            logs.iter().map(|e| (e.source, e.response_type)).collect();
        assert_eq!(
            tags,
            vec![
                (AuditSource::LlmClassification, Some(ResponseType::LlmClassified)),
                (AuditSource::LlmGenerated, Some(ResponseType::LlmGenerated)),
            ]
        );
    }

    #[tokio::test]
    async fn test_repeated_big_o_query_answers_from_memory() {
        let f = fixture(
            InMemoryClassificationCache::new(),
            InMemoryResponseMemory::new(),
            MockEmbeddingProvider::new("mock", 3).with_vector(BIG_O, vec![0.1, 0.7, 0.7]),
            MockLlmProvider::new("oracle").with_reply("IN_CONTEXT"),
            MockLlmProvider::new("generator").with_reply("Big O describes growth rate."),
        );

        f.resolver.resolve(BIG_O, &[]).await.unwrap();
        let second = f.resolver.resolve(BIG_O, &[]).await.unwrap();

        let ResolutionOrigin::Memory { score } = second.origin else {
            panic!("expected a memory answer, got {:?}", second.origin);
        };
        assert!((score - 1.0).abs() < 1e-5);
        assert_eq!(
            second.text,
            "Big O describes growth rate.\n\n💾 (_Matched from previous chat, similarity: 1.00_)"
        );
        assert_eq!(second.provenance(), "Exact match");
        assert_eq!(f.oracle.call_count(), 1);
        assert_eq!(f.generator.call_count(), 1);
        assert_eq!(f.memory.len().await.unwrap(), 1);

        let last = f.audit_log.read_all().await.unwrap().pop().unwrap();
        assert_eq!(last.source, AuditSource::EmbeddingMemory);
        assert_eq!(last.response_type, Some(ResponseType::MemoryFuzzy));
        assert_eq!(last.classification, ContextLabel::InContext);
        assert!(last.score.is_some());
    }

    #[tokio::test]
    async fn test_generation_prompt_includes_history() {
        let f = fixture(
            InMemoryClassificationCache::with_entries([(
                "and for sql?".to_string(),
                CachedClassification::new(ContextLabel::InContext, vec![1.0, 0.0]),
            )]),
            InMemoryResponseMemory::new(),
            MockEmbeddingProvider::new("mock", 2).with_vector("And for SQL?", vec![1.0, 0.0]),
            MockLlmProvider::new("oracle"),
            MockLlmProvider::new("generator").with_reply("Practice joins."),
        );
        let history = vec![
            ChatTurn::system(COACH_SYSTEM_INSTRUCTION),
            ChatTurn::human("How do I prepare for Python rounds?"),
            ChatTurn::ai("Solve problems daily."),
        ];

        f.resolver.resolve("And for SQL?", &history).await.unwrap();

        let request = &f.generator.requests()[0];
        let roles: Vec<MessageRole> = request.messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                MessageRole::System,
                MessageRole::User,
                MessageRole::Assistant,
                MessageRole::User
            ]
        );
        assert_eq!(request.messages[0].content_text(), COACH_SYSTEM_INSTRUCTION);
        assert_eq!(request.last_user_text(), Some("And for SQL?"));
    }

    #[tokio::test]
    async fn test_generation_failure_leaves_memory_untouched() {
        let f = fixture(
            InMemoryClassificationCache::with_entries([(
                "what is a join?".to_string(),
                CachedClassification::new(ContextLabel::InContext, vec![1.0, 0.0]),
            )]),
            InMemoryResponseMemory::new(),
            MockEmbeddingProvider::new("mock", 2).with_vector("what is a join?", vec![1.0, 0.0]),
            MockLlmProvider::new("oracle"),
            MockLlmProvider::new("generator").with_error("HTTP 500"),
        );

        let err = f.resolver.resolve("What is a join?", &[]).await.unwrap_err();

        assert!(err.is_transport());
        assert_eq!(f.memory.len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_blank_query_rejected() {
        let f = fixture(
            InMemoryClassificationCache::new(),
            InMemoryResponseMemory::new(),
            MockEmbeddingProvider::new("mock", 2),
            MockLlmProvider::new("oracle"),
            MockLlmProvider::new("generator"),
        );

        let err = f.resolver.resolve("   ", &[]).await.unwrap_err();

        assert!(matches!(err, DomainError::Validation { .. }));
        assert_eq!(f.oracle.call_count(), 0);
    }

    #[test]
    fn test_annotation_format() {
        assert_eq!(
            annotate_memory_response("Answer", 0.934),
            "Answer\n\n💾 (_Matched from previous chat, similarity: 0.93_)"
        );
    }
}
