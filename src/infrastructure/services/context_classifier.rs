//! Context classification: exact cache, fuzzy cache, then the LLM oracle
//!
//! Each call emits exactly one audit record describing the branch taken.

use std::sync::Arc;

use tracing::info;

use super::{ChatModel, ClassificationCache};
use crate::domain::audit::{AuditLog, AuditSource, ClassificationLogEntry, ResponseType};
use crate::domain::classification::{
    Classification, ContextLabel, classification_prompt, normalize_query, parse_verdict,
};
use crate::domain::DomainError;
use crate::domain::llm::Message;
use crate::infrastructure::observability::record_classification;

#[derive(Debug, Clone)]
pub struct ContextClassifier {
    cache: ClassificationCache,
    oracle: ChatModel,
    audit_log: Arc<dyn AuditLog>,
}

impl ContextClassifier {
    /// The oracle is always sampled at temperature 0
    pub fn new(cache: ClassificationCache, oracle: ChatModel, audit_log: Arc<dyn AuditLog>) -> Self {
        Self {
            cache,
            oracle: oracle.with_temperature(0.0),
            audit_log,
        }
    }

    pub async fn classify(&self, query: &str) -> Result<Classification, DomainError> {
        let key = normalize_query(query);

        if let Some(label) = self.cache.lookup_exact(&key).await? {
            info!(label = %label, "Classification cache exact hit");
            return self
                .finish(query, Classification::exact(label), ResponseType::MemoryExact)
                .await;
        }

        let fuzzy = self.cache.lookup_fuzzy(&key).await?;
        if let Some(matched) = fuzzy.matched {
            info!(label = %matched.label, score = matched.score, matched = %matched.key, "Classification cache fuzzy hit");
            return self
                .finish(
                    query,
                    Classification::fuzzy(matched.label, matched.score),
                    ResponseType::MemoryFuzzy,
                )
                .await;
        }

        info!("Classification cache miss, asking the oracle");
        let label = self.ask_oracle(query).await?;

        // entries keep the embedding of the query as typed; the lookup vector is of the key
        let embedding = match fuzzy.embedding {
            Some(embedding) if query == key => embedding,
            _ => self.cache.embedder().embed(query).await?,
        };
        self.cache.record(key, label, embedding).await?;

        self.finish(query, Classification::oracle(label), ResponseType::LlmClassified)
            .await
    }

    async fn ask_oracle(&self, query: &str) -> Result<ContextLabel, DomainError> {
        let reply = self
            .oracle
            .complete("classify", vec![Message::user(classification_prompt(query))])
            .await?;

        let label = parse_verdict(&reply);
        info!(label = %label, reply = %reply.trim(), "Oracle classification");

        Ok(label)
    }

    async fn finish(
        &self,
        query: &str,
        classification: Classification,
        response_type: ResponseType,
    ) -> Result<Classification, DomainError> {
        let entry = ClassificationLogEntry::new(
            query,
            classification.label,
            AuditSource::from(classification.source),
            classification.score,
            Some(response_type),
        );
        self.audit_log.append(&entry).await?;
        record_classification(classification.source.as_str());

        Ok(classification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::classification::{CachedClassification, ClassificationCacheRepository, ClassificationSource};
    use crate::domain::embedding::MockEmbeddingProvider;
    use crate::domain::llm::MockLlmProvider;
    use crate::infrastructure::audit::InMemoryAuditLog;
    use crate::infrastructure::services::TextEmbedder;
    use crate::infrastructure::storage::InMemoryClassificationCache;

    struct Fixture {
        classifier: ContextClassifier,
        embedder: Arc<MockEmbeddingProvider>,
        oracle: Arc<MockLlmProvider>,
        repository: Arc<InMemoryClassificationCache>,
        audit_log: Arc<InMemoryAuditLog>,
    }

    fn fixture(
        repository: InMemoryClassificationCache,
        embedder: MockEmbeddingProvider,
        oracle: MockLlmProvider,
    ) -> Fixture {
        let repository = Arc::new(repository);
        let embedder = Arc::new(embedder);
        let oracle = Arc::new(oracle);
        let audit_log = Arc::new(InMemoryAuditLog::new());

        let cache = ClassificationCache::new(
            repository.clone(),
            TextEmbedder::with_default_model(embedder.clone()),
        );
        let classifier = ContextClassifier::new(
            cache,
            ChatModel::new(oracle.clone(), "claude-3-5-sonnet-20240620").with_temperature(0.7),
            audit_log.clone(),
        );

        Fixture {
            classifier,
            embedder,
            oracle,
            repository,
            audit_log,
        }
    }

    fn cached(key: &str, label: ContextLabel, vector: Vec<f32>) -> (String, CachedClassification) {
        (key.to_string(), CachedClassification::new(label, vector))
    }

    #[tokio::test]
    async fn test_exact_hit_skips_oracle_and_embedder() {
        let f = fixture(
            InMemoryClassificationCache::with_entries([cached(
                "what shoes should i wear?",
                ContextLabel::OutOfContext,
                vec![0.0, 1.0],
            )]),
            MockEmbeddingProvider::new("mock", 2),
            MockLlmProvider::new("mock"),
        );

        let result = f.classifier.classify("  What shoes should I wear? ").await.unwrap();

        assert_eq!(result, Classification::exact(ContextLabel::OutOfContext));
        assert_eq!(f.oracle.call_count(), 0);
        assert_eq!(f.embedder.call_count(), 0);

        let logs = f.audit_log.read_all().await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].query, "  What shoes should I wear? ");
        assert_eq!(logs[0].source, AuditSource::CacheExact);
        assert_eq!(logs[0].response_type, Some(ResponseType::MemoryExact));
        assert_eq!(logs[0].score, None);
    }

    #[tokio::test]
    async fn test_fuzzy_hit_returns_cached_label_with_score() {
        let f = fixture(
            InMemoryClassificationCache::with_entries([cached(
                "what is big o notation?",
                ContextLabel::InContext,
                vec![1.0, 0.0],
            )]),
            MockEmbeddingProvider::new("mock", 2).with_vector("explain big o", vec![0.96, 0.28]),
            MockLlmProvider::new("mock"),
        );

        let result = f.classifier.classify("Explain Big O").await.unwrap();

        assert_eq!(result.label, ContextLabel::InContext);
        assert_eq!(result.source, ClassificationSource::CacheFuzzy);
        assert!((result.score.unwrap() - 0.96).abs() < 1e-5);
        assert_eq!(result.provenance(), "Fuzzy match (score: 0.96)");
        assert_eq!(f.oracle.call_count(), 0);

        let logs = f.audit_log.read_all().await.unwrap();
        assert_eq!(logs[0].source, AuditSource::CacheFuzzy);
        assert_eq!(logs[0].response_type, Some(ResponseType::MemoryFuzzy));
        assert_eq!(logs[0].score, Some(0.96));
    }

    #[tokio::test]
    async fn test_oracle_records_then_exact_hit() {
        let f = fixture(
            InMemoryClassificationCache::with_entries([cached(
                "best pizza in town",
                ContextLabel::OutOfContext,
                vec![0.0, 1.0],
            )]),
            MockEmbeddingProvider::new("mock", 2).with_vector("tips for hr interview?", vec![1.0, 0.0]),
            MockLlmProvider::new("mock").with_reply("  in_context \n"),
        );

        let first = f.classifier.classify("Tips for HR interview?").await.unwrap();
        let second = f.classifier.classify("tips for hr interview?").await.unwrap();

        assert_eq!(first, Classification::oracle(ContextLabel::InContext));
        assert_eq!(second, Classification::exact(ContextLabel::InContext));
        assert_eq!(f.oracle.call_count(), 1);
        // the key for the fuzzy lookup, then the query as typed for the new entry
        assert_eq!(f.embedder.call_count(), 2);

        let stored = f.repository.get("tips for hr interview?").await.unwrap().unwrap();
        assert_eq!(stored.embedding(), Some(&[1.0, 0.0][..]));

        let request = &f.oracle.requests()[0];
        assert_eq!(request.temperature, Some(0.0));
        assert!(request.last_user_text().unwrap().contains("\"Tips for HR interview?\""));

        let sources: Vec<AuditSource> = f
            .audit_log
            .read_all()
            .await
            .unwrap()
            .iter()
            .map(|e| e.source)
            .collect();
        assert_eq!(sources, vec![AuditSource::LlmClassification, AuditSource::CacheExact]);
    }

    #[tokio::test]
    async fn test_empty_cache_embeds_once_for_recording() {
        let f = fixture(
            InMemoryClassificationCache::new(),
            MockEmbeddingProvider::new("mock", 2).with_vector("weather today", vec![0.0, 1.0]),
            MockLlmProvider::new("mock").with_reply("OUT_OF_CONTEXT"),
        );

        let result = f.classifier.classify("Weather today").await.unwrap();

        assert_eq!(result.label, ContextLabel::OutOfContext);
        assert_eq!(f.embedder.call_count(), 1);
        assert_eq!(f.repository.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_recorded_embedding_is_of_query_as_typed() {
        let f = fixture(
            InMemoryClassificationCache::with_entries([cached(
                "best pizza in town",
                ContextLabel::OutOfContext,
                vec![0.0, 1.0],
            )]),
            MockEmbeddingProvider::new("mock", 2),
            MockLlmProvider::new("mock").with_reply("IN_CONTEXT"),
        );

        f.classifier.classify("  What is a B-TREE? ").await.unwrap();

        let stored = f.repository.get("what is a b-tree?").await.unwrap().unwrap();
        let raw = f.classifier.cache.embedder().embed("  What is a B-TREE? ").await.unwrap();
        let normalized = f.classifier.cache.embedder().embed("what is a b-tree?").await.unwrap();
        assert_eq!(stored.embedding(), Some(&raw[..]));
        assert_ne!(raw, normalized);
    }

    #[tokio::test]
    async fn test_unexpected_verdict_is_out_of_context() {
        let f = fixture(
            InMemoryClassificationCache::new(),
            MockEmbeddingProvider::new("mock", 2).with_vector("hmm", vec![1.0, 1.0]),
            MockLlmProvider::new("mock").with_reply("UNCERTAIN"),
        );

        let result = f.classifier.classify("hmm").await.unwrap();

        assert_eq!(result.label, ContextLabel::OutOfContext);
    }

    #[tokio::test]
    async fn test_oracle_failure_records_nothing() {
        let f = fixture(
            InMemoryClassificationCache::new(),
            MockEmbeddingProvider::new("mock", 2),
            MockLlmProvider::new("mock").with_error("HTTP 529: overloaded"),
        );

        let err = f.classifier.classify("anything").await.unwrap_err();

        assert!(err.is_transport());
        assert_eq!(f.repository.len().await.unwrap(), 0);
        assert!(f.audit_log.read_all().await.unwrap().is_empty());
    }
}
