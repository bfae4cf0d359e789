use tracing::{debug, info};

use super::{
    EmbeddingBatch, EmbeddingConfig, EmbeddingProvider, GigaChatEmbedder, OllamaEmbedder,
    ProviderError, StatisticalEmbedder,
};

/// Tries each configured backend in order and falls back to TF-IDF.
///
/// Backend errors are logged and swallowed; the statistical fallback makes
/// `embed` infallible in practice. With `debug` set in the config the chosen
/// backend is reported at info level on every batch.
pub struct CascadingEmbedder {
    providers: Vec<Box<dyn EmbeddingProvider>>,
    fallback: StatisticalEmbedder,
    report_backend: bool,
}

impl CascadingEmbedder {
    /// GigaChat → Ollama → TF-IDF, or TF-IDF alone when the config forces it.
    pub fn from_config(config: &EmbeddingConfig) -> Self {
        if config.force_statistical {
            return Self::new(config, Vec::new());
        }

        let mut providers: Vec<Box<dyn EmbeddingProvider>> = Vec::new();
        if config.gigachat.api_key.is_some() {
            providers.push(Box::new(GigaChatEmbedder::new(config.gigachat.clone())));
        } else {
            debug!(backend = "gigachat", "no api key configured; skipping backend");
        }
        if config.ollama.enabled {
            providers.push(Box::new(OllamaEmbedder::new(config.ollama.clone())));
        }

        Self::new(config, providers)
    }

    /// Cascade over explicit providers. A forcing config drops them unused.
    pub fn new(config: &EmbeddingConfig, providers: Vec<Box<dyn EmbeddingProvider>>) -> Self {
        let providers = if config.force_statistical {
            debug!(
                skipped = providers.len(),
                "statistical backend forced; remote backends bypassed"
            );
            Vec::new()
        } else {
            providers
        };

        Self {
            providers,
            fallback: StatisticalEmbedder::new(),
            report_backend: config.debug,
        }
    }

    pub fn statistical_only() -> Self {
        Self::new(&EmbeddingConfig::statistical_only(), Vec::new())
    }

    /// Backend names in the order they are attempted.
    pub fn backends(&self) -> Vec<&'static str> {
        self.providers
            .iter()
            .map(|p| p.name())
            .chain(std::iter::once(self.fallback.name()))
            .collect()
    }

    /// Whether each batch logs its chosen backend at info level.
    pub fn reports_backend(&self) -> bool {
        self.report_backend
    }

    fn selected(&self, backend: &'static str, batch_size: usize, dimension: usize) {
        if self.report_backend {
            info!(backend, batch_size, dimension, "embedding backend selected");
        } else {
            debug!(backend, batch_size, dimension, "embedding backend selected");
        }
    }
}

impl EmbeddingProvider for CascadingEmbedder {
    fn name(&self) -> &'static str {
        "cascade"
    }

    fn embed(&self, batch: &[String]) -> Result<EmbeddingBatch, ProviderError> {
        for provider in &self.providers {
            match provider.embed(batch) {
                Ok(result) if result.len() == batch.len() => {
                    self.selected(result.backend, batch.len(), result.dimension());
                    return Ok(result);
                }
                Ok(result) => {
                    debug!(
                        backend = provider.name(),
                        expected = batch.len(),
                        received = result.len(),
                        "backend returned a partial batch; trying next"
                    );
                }
                Err(err) => {
                    debug!(
                        backend = provider.name(),
                        error = %err,
                        "embedding backend failed; trying next"
                    );
                }
            }
        }

        let result = self.fallback.embed(batch)?;
        self.selected(result.backend, batch.len(), result.dimension());
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;

    struct PanickingProvider;

    impl EmbeddingProvider for PanickingProvider {
        fn name(&self) -> &'static str {
            "must-not-be-called"
        }

        fn embed(&self, _batch: &[String]) -> Result<EmbeddingBatch, ProviderError> {
            panic!("remote backend contacted while statistical backend was forced");
        }
    }

    struct FailingProvider {
        calls: Arc<AtomicUsize>,
    }

    impl EmbeddingProvider for FailingProvider {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn embed(&self, _batch: &[String]) -> Result<EmbeddingBatch, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ProviderError::Transport("connection refused".into()))
        }
    }

    struct FixedProvider {
        rows: usize,
    }

    impl EmbeddingProvider for FixedProvider {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn embed(&self, _batch: &[String]) -> Result<EmbeddingBatch, ProviderError> {
            Ok(EmbeddingBatch::new(vec![vec![1.0, 0.0]; self.rows], "fixed"))
        }
    }

    fn batch() -> Vec<String> {
        vec!["action comedy".to_string(), "action thriller".to_string()]
    }

    #[test]
    fn forced_statistical_never_contacts_remote_backends() {
        let mut config = EmbeddingConfig::statistical_only();
        config.gigachat.api_key = Some("configured-secret".into());

        let cascade = CascadingEmbedder::new(&config, vec![Box::new(PanickingProvider)]);
        let result = cascade.embed(&batch()).unwrap();

        assert_eq!(result.backend, "tfidf");
        assert_eq!(cascade.backends(), vec!["tfidf"]);
    }

    #[test]
    fn forced_config_builds_no_network_backends() {
        let mut config = EmbeddingConfig::statistical_only();
        config.gigachat.api_key = Some("configured-secret".into());

        let cascade = CascadingEmbedder::from_config(&config);
        assert_eq!(cascade.backends(), vec!["tfidf"]);
    }

    #[test]
    fn failures_cascade_to_next_backend() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cascade = CascadingEmbedder::new(
            &EmbeddingConfig::default(),
            vec![
                Box::new(FailingProvider {
                    calls: Arc::clone(&calls),
                }),
                Box::new(FixedProvider { rows: 2 }),
            ],
        );

        let result = cascade.embed(&batch()).unwrap();
        assert_eq!(result.backend, "fixed");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn partial_batches_are_not_accepted() {
        let cascade = CascadingEmbedder::new(
            &EmbeddingConfig::default(),
            vec![Box::new(FixedProvider { rows: 1 })],
        );

        let result = cascade.embed(&batch()).unwrap();
        assert_eq!(result.backend, "tfidf");
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn all_failures_end_in_statistical_fallback() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cascade = CascadingEmbedder::new(
            &EmbeddingConfig::default(),
            vec![
                Box::new(FailingProvider {
                    calls: Arc::clone(&calls),
                }),
                Box::new(FailingProvider {
                    calls: Arc::clone(&calls),
                }),
            ],
        );

        let result = cascade.embed(&batch()).unwrap();
        assert_eq!(result.backend, "tfidf");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn debug_config_reports_selected_backend() {
        let mut config = EmbeddingConfig::statistical_only();
        config.debug = true;

        let cascade = CascadingEmbedder::from_config(&config);
        assert!(cascade.reports_backend());
        assert_eq!(cascade.embed(&batch()).unwrap().backend, "tfidf");

        assert!(!CascadingEmbedder::statistical_only().reports_backend());
    }

    #[test]
    fn missing_credentials_skip_gigachat() {
        let mut config = EmbeddingConfig::default();
        config.ollama.enabled = false;

        let cascade = CascadingEmbedder::from_config(&config);
        assert_eq!(cascade.backends(), vec!["tfidf"]);
    }
}
