use serde_json::{Value, json};
use tracing::debug;
use ureq::Agent;
use uuid::Uuid;

use super::{
    EmbeddingBatch, EmbeddingProvider, GigaChatConfig, ProviderError,
    envelope::{extract_vector, validate_batch},
};

/// GigaChat hosted embeddings.
///
/// Exchanges the Basic credential for a short-lived bearer token
/// (`POST {base}/oauth`), then sends one `POST {base}/embeddings` per text.
/// Any failure aborts the whole batch.
pub struct GigaChatEmbedder {
    config: GigaChatConfig,
    agent: Agent,
}

impl GigaChatEmbedder {
    pub fn new(config: GigaChatConfig) -> Self {
        let agent_config = Agent::config_builder()
            .timeout_global(Some(config.timeout))
            .build();
        let agent = Agent::new_with_config(agent_config);
        Self { config, agent }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url.trim_end_matches('/'))
    }

    fn fetch_token(&self, api_key: &str) -> Result<String, ProviderError> {
        let form = format!("scope={}", self.config.scope);
        let payload: Value = self
            .agent
            .post(&self.endpoint("oauth"))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .header("Accept", "application/json")
            .header("RqUID", Uuid::new_v4().to_string())
            .header("Authorization", format!("Basic {api_key}"))
            .send(form.as_str())?
            .body_mut()
            .read_json()?;

        payload
            .get("access_token")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ProviderError::Auth("oauth response has no access_token".into()))
    }

    fn embed_one(&self, token: &str, text: &str) -> Result<Vec<f32>, ProviderError> {
        let body = json!({
            "model": self.config.model,
            "input": text,
        });
        let payload: Value = self
            .agent
            .post(&self.endpoint("embeddings"))
            .header("Accept", "application/json")
            .header("Authorization", format!("Bearer {token}"))
            .send_json(&body)?
            .body_mut()
            .read_json()?;

        extract_vector(&payload)
            .ok_or_else(|| ProviderError::Malformed("gigachat: no embedding in response".into()))
    }
}

impl EmbeddingProvider for GigaChatEmbedder {
    fn name(&self) -> &'static str {
        "gigachat"
    }

    fn embed(&self, batch: &[String]) -> Result<EmbeddingBatch, ProviderError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingCredential("gigachat"))?;

        if batch.is_empty() {
            return Ok(EmbeddingBatch::empty(self.name()));
        }

        let token = self.fetch_token(api_key)?;
        let vectors = batch
            .iter()
            .map(|text| self.embed_one(&token, text))
            .collect::<Result<Vec<_>, _>>()?;
        let vectors = validate_batch(self.name(), batch.len(), vectors)?;

        debug!(
            backend = self.name(),
            model = %self.config.model,
            batch_size = batch.len(),
            dimension = vectors.first().map_or(0, Vec::len),
            "gigachat embeddings received"
        );

        Ok(EmbeddingBatch::new(vectors, self.name()))
    }
}
