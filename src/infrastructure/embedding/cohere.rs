//! Cohere embedding provider implementation

use async_trait::async_trait;
use serde::Deserialize;

use super::HttpClientTrait;
use crate::domain::DomainError;
use crate::domain::embedding::{Embedding, EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};

const DEFAULT_COHERE_BASE_URL: &str = "https://api.cohere.ai";
const DEFAULT_COHERE_MODEL: &str = "embed-english-v3.0";
// v3 models require an input type; every text embedded here is a query
const INPUT_TYPE: &str = "search_query";

/// Cohere `/v1/embed` provider
#[derive(Debug)]
pub struct CohereEmbeddingProvider<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    base_url: String,
}

impl<C: HttpClientTrait> CohereEmbeddingProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_COHERE_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let auth_header = format!("Bearer {}", api_key.into());
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            auth_header,
            base_url,
        }
    }

    fn embed_url(&self) -> String {
        format!("{}/v1/embed", self.base_url)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    fn build_request(&self, request: &EmbeddingRequest) -> serde_json::Value {
        serde_json::json!({
            "model": request.model(),
            "texts": request.texts(),
            "input_type": INPUT_TYPE,
        })
    }

    fn parse_response(
        &self,
        model: &str,
        expected: usize,
        json: serde_json::Value,
    ) -> Result<EmbeddingResponse, DomainError> {
        let response: CohereEmbedResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("cohere", format!("Failed to parse embedding response: {}", e))
        })?;

        if response.embeddings.len() != expected {
            return Err(DomainError::provider(
                "cohere",
                format!(
                    "Expected {} embeddings, received {}",
                    expected,
                    response.embeddings.len()
                ),
            ));
        }

        let data = response
            .embeddings
            .into_iter()
            .enumerate()
            .map(|(index, vector)| Embedding::new(index, vector))
            .collect();

        Ok(EmbeddingResponse::new(model, data))
    }
}

#[async_trait]
impl<C: HttpClientTrait> EmbeddingProvider for CohereEmbeddingProvider<C> {
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError> {
        let url = self.embed_url();
        let body = self.build_request(&request);

        let response = self
            .client
            .post_json(&url, self.headers(), &body)
            .await
            .map_err(|e| match e {
                DomainError::Provider { message, .. } => DomainError::provider("cohere", message),
                other => other,
            })?;

        self.parse_response(request.model(), request.texts().len(), response)
    }

    fn provider_name(&self) -> &'static str {
        "cohere"
    }

    fn default_model(&self) -> &'static str {
        DEFAULT_COHERE_MODEL
    }
}

#[derive(Debug, Deserialize)]
struct CohereEmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::llm::{HttpClient, MockHttpClient};
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TEST_URL: &str = "https://api.cohere.ai/v1/embed";

    #[tokio::test]
    async fn test_embed_query() {
        let client = MockHttpClient::new().with_response(
            TEST_URL,
            serde_json::json!({
                "id": "abc",
                "embeddings": [[0.1, 0.2, 0.3]],
                "texts": ["how do i prepare?"],
                "meta": {"api_version": {"version": "1"}}
            }),
        );
        let provider = CohereEmbeddingProvider::new(client, "co-key");

        let response = provider
            .embed(EmbeddingRequest::query(DEFAULT_COHERE_MODEL, "how do i prepare?"))
            .await
            .unwrap();

        assert_eq!(response.model(), DEFAULT_COHERE_MODEL);
        assert_eq!(response.first().unwrap().vector(), &[0.1, 0.2, 0.3]);

        let body = &provider.client.sent_bodies()[0];
        assert_eq!(body["input_type"], "search_query");
        assert_eq!(body["texts"], serde_json::json!(["how do i prepare?"]));
    }

    #[tokio::test]
    async fn test_count_mismatch_is_provider_error() {
        let client = MockHttpClient::new()
            .with_response(TEST_URL, serde_json::json!({"embeddings": []}));
        let provider = CohereEmbeddingProvider::new(client, "co-key");

        let err = provider
            .embed(EmbeddingRequest::query(DEFAULT_COHERE_MODEL, "x"))
            .await
            .unwrap_err();

        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_against_http_server() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embed"))
            .and(header("Authorization", "Bearer co-key"))
            .and(body_json(serde_json::json!({
                "model": DEFAULT_COHERE_MODEL,
                "texts": ["tell me a joke"],
                "input_type": "search_query"
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"embeddings": [[1.0, 0.0]]})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let provider = CohereEmbeddingProvider::with_base_url(HttpClient::new(), "co-key", server.uri());
        let vector = provider
            .embed(EmbeddingRequest::query(DEFAULT_COHERE_MODEL, "tell me a joke"))
            .await
            .unwrap()
            .into_first_vector()
            .unwrap();

        assert_eq!(vector, vec![1.0, 0.0]);
    }
}
