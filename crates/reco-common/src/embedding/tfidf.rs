use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use super::{EmbeddingBatch, EmbeddingProvider, ProviderError};

static RE_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

/// TF-IDF vectors computed from the batch alone.
///
/// - vocabulary and document frequency come from the batch, in first-seen order
/// - `tf = 0.5 + 0.5 * count / max_count_in_doc`
/// - `idf = ln((N + 1) / (df + 1)) + 1`
/// - rows are L2-normalized; documents without tokens stay all-zero
///
/// No external corpus and no I/O, so this backend never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatisticalEmbedder;

impl StatisticalEmbedder {
    pub fn new() -> Self {
        Self
    }

    pub fn vectors(&self, texts: &[String]) -> Vec<Vec<f32>> {
        tfidf_vectors(texts)
    }
}

impl EmbeddingProvider for StatisticalEmbedder {
    fn name(&self) -> &'static str {
        "tfidf"
    }

    fn embed(&self, batch: &[String]) -> Result<EmbeddingBatch, ProviderError> {
        Ok(EmbeddingBatch::new(tfidf_vectors(batch), self.name()))
    }
}

fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    RE_WORD
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

pub fn tfidf_vectors(texts: &[String]) -> Vec<Vec<f32>> {
    let docs: Vec<Vec<String>> = texts.iter().map(|t| tokenize(t)).collect();

    let mut vocab: HashMap<&str, usize> = HashMap::new();
    let mut doc_freq: Vec<usize> = Vec::new();
    for tokens in &docs {
        let mut seen = HashSet::new();
        for token in tokens {
            if !seen.insert(token.as_str()) {
                continue;
            }
            let next = vocab.len();
            let idx = *vocab.entry(token.as_str()).or_insert(next);
            if idx == doc_freq.len() {
                doc_freq.push(0);
            }
            doc_freq[idx] += 1;
        }
    }

    let n_docs = texts.len().max(1) as f64;
    let idf: Vec<f64> = doc_freq
        .iter()
        .map(|df| ((n_docs + 1.0) / (*df as f64 + 1.0)).ln() + 1.0)
        .collect();

    docs.iter()
        .map(|tokens| {
            let mut row = vec![0.0f64; vocab.len()];
            let mut counts: HashMap<&str, usize> = HashMap::new();
            for token in tokens {
                *counts.entry(token.as_str()).or_insert(0) += 1;
            }

            let max_tf = counts.values().copied().max().unwrap_or(0);
            if max_tf > 0 {
                for (token, tf) in &counts {
                    if let Some(&j) = vocab.get(token) {
                        let tf_norm = 0.5 + 0.5 * (*tf as f64 / max_tf as f64);
                        row[j] = tf_norm * idf[j];
                    }
                }
            }

            let norm = row.iter().map(|x| x * x).sum::<f64>().sqrt();
            if norm > 0.0 {
                for v in &mut row {
                    *v /= norm;
                }
            }

            row.into_iter().map(|v| v as f32).collect()
        })
        .collect()
}
