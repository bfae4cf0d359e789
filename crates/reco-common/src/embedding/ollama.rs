use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use ureq::Agent;

use super::{
    EmbeddingBatch, EmbeddingProvider, OllamaConfig, ProviderError,
    envelope::{extract_vector, validate_batch},
};

#[derive(Serialize)]
struct OllamaEmbedRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

/// Local Ollama server (`POST {base}/api/embeddings`, one text per request).
pub struct OllamaEmbedder {
    url: String,
    config: OllamaConfig,
    agent: Agent,
}

impl OllamaEmbedder {
    pub fn new(config: OllamaConfig) -> Self {
        let url = format!("{}/api/embeddings", config.base_url.trim_end_matches('/'));
        let agent_config = Agent::config_builder()
            .timeout_global(Some(config.timeout))
            .build();
        let agent = Agent::new_with_config(agent_config);
        Self { url, config, agent }
    }

    fn embed_one(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let body = OllamaEmbedRequest {
            model: &self.config.model,
            prompt: text,
        };
        let payload: Value = self
            .agent
            .post(&self.url)
            .send_json(&body)?
            .body_mut()
            .read_json()?;

        extract_vector(&payload)
            .ok_or_else(|| ProviderError::Malformed("ollama: no embedding in response".into()))
    }
}

impl EmbeddingProvider for OllamaEmbedder {
    fn name(&self) -> &'static str {
        "ollama"
    }

    fn embed(&self, batch: &[String]) -> Result<EmbeddingBatch, ProviderError> {
        if !self.config.enabled {
            return Err(ProviderError::Disabled("ollama"));
        }
        if batch.is_empty() {
            return Ok(EmbeddingBatch::empty(self.name()));
        }

        debug!(
            batch_size = batch.len(),
            url = %self.url,
            model = %self.config.model,
            "sending embedding requests to ollama"
        );

        let vectors = batch
            .iter()
            .map(|text| self.embed_one(text))
            .collect::<Result<Vec<_>, _>>()?;
        let vectors = validate_batch(self.name(), batch.len(), vectors)?;

        Ok(EmbeddingBatch::new(vectors, self.name()))
    }
}
