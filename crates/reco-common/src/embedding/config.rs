use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: f64 = 8.0;

/// Embedding backend settings, read once and handed to the providers.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingConfig {
    /// Skip every network backend and use TF-IDF directly.
    pub force_statistical: bool,
    /// Report the answering backend at info level on every batch. The CLI
    /// also raises the crate's log filter to debug from the same flag.
    pub debug: bool,
    pub gigachat: GigaChatConfig,
    pub ollama: OllamaConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GigaChatConfig {
    pub base_url: String,
    /// Pre-encoded Basic credential; `None` disables the backend.
    pub api_key: Option<String>,
    pub model: String,
    pub scope: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OllamaConfig {
    pub enabled: bool,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for GigaChatConfig {
    fn default() -> Self {
        Self {
            base_url: "https://ngw.devices.sberbank.ru:9443/api/v2".into(),
            api_key: None,
            model: "GigaChat:latest".into(),
            scope: "GIGACHAT_API_PERS".into(),
            timeout: Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "http://127.0.0.1:11434".into(),
            model: "bge-m3".into(),
            timeout: Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            force_statistical: false,
            debug: false,
            gigachat: GigaChatConfig::default(),
            ollama: OllamaConfig::default(),
        }
    }
}

impl EmbeddingConfig {
    /// TF-IDF only; no backend is ever contacted.
    pub fn statistical_only() -> Self {
        Self {
            force_statistical: true,
            ..Self::default()
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source (environment, file, test map).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let timeout = |key: &str| {
            get(key)
                .and_then(|raw| raw.parse::<f64>().ok())
                .filter(|secs| secs.is_finite() && *secs > 0.0)
                .map(Duration::from_secs_f64)
                .unwrap_or_else(|| Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS))
        };

        let giga_defaults = GigaChatConfig::default();
        let ollama_defaults = OllamaConfig::default();

        let giga_model = get("GIGACHAT_EMBED_MODEL").unwrap_or(giga_defaults.model);
        let force_statistical = get("RECO_EMBED_BACKEND")
            .is_some_and(|value| is_statistical_override(&value))
            || is_disabled_value(&giga_model);

        Self {
            force_statistical,
            debug: get("RECO_DEBUG").is_some_and(|value| parse_flag(&value)),
            gigachat: GigaChatConfig {
                base_url: get("GIGACHAT_BASE_URL")
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or(giga_defaults.base_url),
                api_key: get("GIGACHAT_API_KEY"),
                model: giga_model,
                scope: get("GIGACHAT_SCOPE").unwrap_or(giga_defaults.scope),
                timeout: timeout("GIGACHAT_EMBED_TIMEOUT_S"),
            },
            ollama: OllamaConfig {
                enabled: get("RECO_OLLAMA_ENABLED").is_none_or(|value| parse_flag(&value)),
                base_url: get("OLLAMA_URL")
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or(ollama_defaults.base_url),
                model: get("OLLAMA_EMBED_MODEL").unwrap_or(ollama_defaults.model),
                timeout: timeout("OLLAMA_EMBED_TIMEOUT_S"),
            },
        }
    }
}

fn is_disabled_value(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "off" | "disabled" | "none" | "0"
    )
}

fn is_statistical_override(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("tfidf") || is_disabled_value(value)
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "no" | "off"
    )
}
