pub mod cascade;
pub mod config;
pub mod envelope;
pub mod gigachat;
pub mod ollama;
pub mod similarity;
pub mod tfidf;

pub use cascade::CascadingEmbedder;
pub use config::{EmbeddingConfig, GigaChatConfig, OllamaConfig};
pub use gigachat::GigaChatEmbedder;
pub use ollama::OllamaEmbedder;
pub use similarity::cosine_similarity;
pub use tfidf::StatisticalEmbedder;

use thiserror::Error;

/// Text → vector backend.
///
/// Implementations:
/// - GigaChatEmbedder: hosted API, OAuth handshake then one request per text
/// - OllamaEmbedder: local inference server, one request per text
/// - StatisticalEmbedder: TF-IDF over the batch itself, never fails
/// - CascadingEmbedder: tries the above in order
///
/// A batch is all-or-nothing: either every input gets a vector (in input
/// order, equal dimension) or the call fails.
pub trait EmbeddingProvider: Send + Sync {
    /// Backend name ("gigachat", "ollama", "tfidf", "cascade").
    fn name(&self) -> &'static str;

    fn embed(&self, batch: &[String]) -> Result<EmbeddingBatch, ProviderError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingBatch {
    pub vectors: Vec<Vec<f32>>,
    /// Name of the backend that actually produced the vectors.
    pub backend: &'static str,
}

impl EmbeddingBatch {
    pub fn new(vectors: Vec<Vec<f32>>, backend: &'static str) -> Self {
        Self { vectors, backend }
    }

    pub fn empty(backend: &'static str) -> Self {
        Self::new(Vec::new(), backend)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.vectors.first().map_or(0, Vec::len)
    }

    /// Cosine similarity between rows `a` and `b`; 0.0 if either row is missing.
    pub fn similarity(&self, a: usize, b: usize) -> f64 {
        match (self.vectors.get(a), self.vectors.get(b)) {
            (Some(va), Some(vb)) => cosine_similarity(va, vb),
            _ => 0.0,
        }
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{0} backend is disabled")]
    Disabled(&'static str),
    #[error("{0} backend has no credential configured")]
    MissingCredential(&'static str),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected http status {0}")]
    Status(u16),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<ureq::Error> for ProviderError {
    fn from(value: ureq::Error) -> Self {
        match value {
            ureq::Error::StatusCode(code) => ProviderError::Status(code),
            other => ProviderError::Transport(other.to_string()),
        }
    }
}
