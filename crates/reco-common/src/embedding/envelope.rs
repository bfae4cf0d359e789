//! Response envelope parsing shared by the HTTP backends.
//!
//! Servers disagree on where the vector lives. Accepted shapes:
//! - `{"embedding": [f, ...]}`
//! - `{"embeddings": [[f, ...]]}` or `{"embeddings": [f, ...]}`
//! - `{"data": [{"embedding": [f, ...]}, ...]}` (first entry)

use serde_json::Value;

use super::ProviderError;

/// Pulls a single embedding vector out of a response body.
pub fn extract_vector(payload: &Value) -> Option<Vec<f32>> {
    let object = payload.as_object()?;

    if let Some(embedding) = object.get("embedding") {
        return numeric_vector(embedding);
    }

    if let Some(embeddings) = object.get("embeddings") {
        let rows = embeddings.as_array()?;
        return match rows.first()? {
            Value::Array(_) if rows.len() == 1 => numeric_vector(&rows[0]),
            Value::Number(_) => numeric_vector(embeddings),
            _ => None,
        };
    }

    if let Some(data) = object.get("data") {
        let first = data.as_array()?.first()?;
        return numeric_vector(first.get("embedding")?);
    }

    None
}

fn numeric_vector(value: &Value) -> Option<Vec<f32>> {
    let items = value.as_array()?;
    if items.is_empty() {
        return None;
    }
    items
        .iter()
        .map(|item| {
            item.as_f64()
                .map(|v| v as f32)
                .filter(|v| v.is_finite())
        })
        .collect()
}

/// Checks the all-or-nothing batch contract: one non-empty vector per input,
/// all with the same dimension.
pub fn validate_batch(
    backend: &'static str,
    expected: usize,
    vectors: Vec<Vec<f32>>,
) -> Result<Vec<Vec<f32>>, ProviderError> {
    if vectors.len() != expected {
        return Err(ProviderError::Malformed(format!(
            "{backend}: expected {expected} vectors, got {}",
            vectors.len()
        )));
    }

    if let Some(first) = vectors.first() {
        let dimension = first.len();
        if dimension == 0 || vectors.iter().any(|v| v.len() != dimension) {
            return Err(ProviderError::Malformed(format!(
                "{backend}: inconsistent vector dimensions"
            )));
        }
    }

    Ok(vectors)
}
