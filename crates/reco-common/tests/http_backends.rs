use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use reco_common::embedding::{
    CascadingEmbedder, EmbeddingConfig, EmbeddingProvider, GigaChatConfig, GigaChatEmbedder,
    OllamaConfig, OllamaEmbedder, ProviderError,
};

/// One canned reply per expected connection; every reply closes the socket.
struct FakeServer {
    base_url: String,
    handle: JoinHandle<Vec<String>>,
}

impl FakeServer {
    fn start(replies: Vec<(u16, &'static str)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let mut requests = Vec::new();
            for (status, body) in replies {
                let (mut stream, _) = listener.accept().unwrap();
                requests.push(read_request(&mut stream));
                let reason = if status == 200 { "OK" } else { "Error" };
                let response = format!(
                    "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\n\
                     Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                stream.write_all(response.as_bytes()).unwrap();
                stream.flush().unwrap();
            }
            requests
        });

        Self { base_url, handle }
    }

    fn requests(self) -> Vec<String> {
        self.handle.join().unwrap()
    }
}

fn read_request(stream: &mut TcpStream) -> String {
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();

    let mut buffer = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).unwrap();
        if n == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buffer).to_string();
        let Some(header_end) = text.find("\r\n\r\n") else {
            continue;
        };
        let content_length = text[..header_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.trim()
                    .eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())?
            })
            .unwrap_or(0);
        if buffer.len() >= header_end + 4 + content_length {
            break;
        }
    }

    String::from_utf8_lossy(&buffer).to_string()
}

fn texts(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn ollama_at(base_url: &str) -> OllamaEmbedder {
    OllamaEmbedder::new(OllamaConfig {
        base_url: base_url.to_string(),
        timeout: Duration::from_secs(5),
        ..OllamaConfig::default()
    })
}

#[test]
fn ollama_accepts_known_envelopes() {
    let server = FakeServer::start(vec![
        (200, r#"{"embedding": [1.0, 0.0]}"#),
        (200, r#"{"embeddings": [[0.0, 1.0]]}"#),
        (200, r#"{"embeddings": [0.6, 0.8]}"#),
        (200, r#"{"data": [{"embedding": [1.0, 0.0]}]}"#),
    ]);

    let batch = ollama_at(&server.base_url)
        .embed(&texts(&["a", "b", "c", "d"]))
        .unwrap();

    assert_eq!(batch.backend, "ollama");
    assert_eq!(batch.vectors[0], vec![1.0, 0.0]);
    assert_eq!(batch.vectors[1], vec![0.0, 1.0]);
    assert!((batch.similarity(0, 3) - 1.0).abs() < 1e-9);

    let requests = server.requests();
    assert_eq!(requests.len(), 4);
    assert!(requests[0].starts_with("POST /api/embeddings"));
    assert!(requests[0].contains(r#""model":"bge-m3""#));
    assert!(requests[0].contains(r#""prompt":"a""#));
    assert!(requests[3].contains(r#""prompt":"d""#));
}

#[test]
fn ollama_rejects_unknown_envelope() {
    let server = FakeServer::start(vec![(200, r#"{"vector": [1.0]}"#)]);

    let err = ollama_at(&server.base_url)
        .embed(&texts(&["a", "b"]))
        .unwrap_err();
    assert!(matches!(err, ProviderError::Malformed(_)));
    assert_eq!(server.requests().len(), 1);
}

#[test]
fn ollama_rejects_mixed_dimensions() {
    let server = FakeServer::start(vec![
        (200, r#"{"embedding": [1.0, 0.0]}"#),
        (200, r#"{"embedding": [1.0, 0.0, 0.0]}"#),
    ]);

    let err = ollama_at(&server.base_url)
        .embed(&texts(&["a", "b"]))
        .unwrap_err();
    assert!(matches!(err, ProviderError::Malformed(_)));
    server.requests();
}

#[test]
fn server_error_status_is_reported() {
    let server = FakeServer::start(vec![(500, r#"{"error": "model not loaded"}"#)]);

    let err = ollama_at(&server.base_url)
        .embed(&texts(&["a"]))
        .unwrap_err();
    assert!(matches!(err, ProviderError::Status(500)));
    server.requests();
}

#[test]
fn cascade_falls_back_when_local_backend_is_malformed() {
    let server = FakeServer::start(vec![(200, r#"{"unexpected": true}"#)]);
    let config = EmbeddingConfig {
        ollama: OllamaConfig {
            base_url: server.base_url.clone(),
            timeout: Duration::from_secs(5),
            ..OllamaConfig::default()
        },
        ..EmbeddingConfig::default()
    };

    let cascade = CascadingEmbedder::from_config(&config);
    assert_eq!(cascade.backends(), vec!["ollama", "tfidf"]);

    let batch = cascade.embed(&texts(&["same text", "same text"])).unwrap();
    assert_eq!(batch.backend, "tfidf");
    assert!((batch.similarity(0, 1) - 1.0).abs() < 1e-6);
    assert_eq!(server.requests().len(), 1);
}

#[test]
fn out_of_range_components_fall_back_to_tfidf() {
    let server = FakeServer::start(vec![(200, r#"{"embedding": [1e39, 1.0]}"#)]);
    let config = EmbeddingConfig {
        ollama: OllamaConfig {
            base_url: server.base_url.clone(),
            timeout: Duration::from_secs(5),
            ..OllamaConfig::default()
        },
        ..EmbeddingConfig::default()
    };

    let batch = CascadingEmbedder::from_config(&config)
        .embed(&texts(&["python docker", "python aws"]))
        .unwrap();
    assert_eq!(batch.backend, "tfidf");
    let similarity = batch.similarity(0, 1);
    assert!(similarity.is_finite() && (0.0..=1.0).contains(&similarity));
    assert_eq!(server.requests().len(), 1);
}

#[test]
fn cascade_skips_unreachable_backends() {
    let unused = TcpListener::bind("127.0.0.1:0").unwrap();
    let dead_url = format!("http://{}", unused.local_addr().unwrap());
    drop(unused);

    let config = EmbeddingConfig {
        gigachat: GigaChatConfig {
            base_url: dead_url.clone(),
            api_key: Some("secret".into()),
            timeout: Duration::from_secs(2),
            ..GigaChatConfig::default()
        },
        ollama: OllamaConfig {
            base_url: dead_url,
            timeout: Duration::from_secs(2),
            ..OllamaConfig::default()
        },
        ..EmbeddingConfig::default()
    };

    let cascade = CascadingEmbedder::from_config(&config);
    assert_eq!(cascade.backends(), vec!["gigachat", "ollama", "tfidf"]);

    let batch = cascade.embed(&texts(&["python docker", "python aws"])).unwrap();
    assert_eq!(batch.backend, "tfidf");
}

#[test]
fn gigachat_exchanges_token_then_embeds() {
    let server = FakeServer::start(vec![
        (200, r#"{"access_token": "tok", "expires_at": 1700000000000}"#),
        (200, r#"{"data": [{"embedding": [0.0, 1.0], "index": 0}]}"#),
        (200, r#"{"data": [{"embedding": [0.0, 2.0], "index": 0}]}"#),
    ]);

    let embedder = GigaChatEmbedder::new(GigaChatConfig {
        base_url: server.base_url.clone(),
        api_key: Some("c2VjcmV0".into()),
        timeout: Duration::from_secs(5),
        ..GigaChatConfig::default()
    });

    let batch = embedder.embed(&texts(&["first", "second"])).unwrap();
    assert_eq!(batch.backend, "gigachat");
    assert!((batch.similarity(0, 1) - 1.0).abs() < 1e-9);

    let requests = server.requests();
    let oauth = requests[0].to_lowercase();
    assert!(oauth.starts_with("post /oauth"));
    assert!(oauth.contains("authorization: basic c2vjcmv0"));
    assert!(oauth.contains("rquid: "));
    assert!(requests[0].ends_with("scope=GIGACHAT_API_PERS"));

    let embed = requests[1].to_lowercase();
    assert!(embed.starts_with("post /embeddings"));
    assert!(embed.contains("authorization: bearer tok"));
    assert!(requests[1].contains(r#""input":"first""#));
    assert!(requests[1].contains(r#""model":"GigaChat:latest""#));
}

#[test]
fn gigachat_without_token_is_auth_error() {
    let server = FakeServer::start(vec![(200, r#"{"expires_at": 0}"#)]);

    let embedder = GigaChatEmbedder::new(GigaChatConfig {
        base_url: server.base_url.clone(),
        api_key: Some("secret".into()),
        timeout: Duration::from_secs(5),
        ..GigaChatConfig::default()
    });

    let err = embedder.embed(&texts(&["text"])).unwrap_err();
    assert!(matches!(err, ProviderError::Auth(_)));
    assert_eq!(server.requests().len(), 1);
}
