//! Per-factor similarity functions.
//!
//! Every function is total and returns a value in 0.0〜1.0. Absent inputs map
//! to a fixed neutral value (`NEUTRAL`, `STALE`) or to 0.0, never to an error.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;

use crate::embedding::EmbeddingProvider;
use crate::normalize::{lower_list, normalize_genres, normalize_skills};

/// "No preference stated" score for scalar and semantic factors.
pub const NEUTRAL: f64 = 0.5;
/// Freshness of a posting whose age is unknown.
pub const STALE: f64 = 0.3;

const DECADE_STEP: f64 = 0.2;
const SECONDS_PER_DAY: f64 = 86_400.0;

fn as_set(items: &[String]) -> HashSet<&str> {
    items.iter().map(String::as_str).collect()
}

/// `|A ∩ B| / |A ∪ B|`; 0.0 if either side is empty.
pub fn jaccard(a: &[String], b: &[String]) -> f64 {
    let a = as_set(a);
    let b = as_set(b);
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(&b).count();
    let union = a.union(&b).count();
    intersection as f64 / union as f64
}

/// `|A ∩ B| / max(|A|, |B|)`; 0.0 if either side is empty.
pub fn overlap_ratio(a: &[String], b: &[String]) -> f64 {
    let a = as_set(a);
    let b = as_set(b);
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(&b).count();
    intersection as f64 / a.len().max(b.len()) as f64
}

pub fn genre_similarity(preferred: &[String], genres: &[String]) -> f64 {
    jaccard(&normalize_genres(preferred), &normalize_genres(genres))
}

pub fn skills_overlap(profile: &[String], required: &[String]) -> f64 {
    overlap_ratio(&normalize_skills(profile), &normalize_skills(required))
}

/// `max(0, 1 - |a - b|)` for values already on a common 0..1 scale.
pub fn scalar_proximity(a: f64, b: f64) -> f64 {
    (1.0 - (a - b).abs()).max(0.0)
}

fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

/// Ratings on a 0..10 scale.
pub fn rating_similarity(preferred: Option<f64>, rating: Option<f64>) -> f64 {
    match (present(preferred), present(rating)) {
        (Some(p), Some(r)) => {
            let scale = |v: f64| (v / 10.0).clamp(0.0, 1.0);
            scalar_proximity(scale(p), scale(r))
        }
        _ => NEUTRAL,
    }
}

/// Offer against expectation, both scaled by the expectation with the offer
/// capped at 1.0, so an offer at or above expectation scores 1.0.
pub fn salary_similarity(expectation: Option<f64>, offer: Option<f64>) -> f64 {
    match (expectation, offer) {
        (Some(expected), Some(offered)) if expected > 0.0 && offered > 0.0 => {
            scalar_proximity(1.0, (offered / expected).min(1.0))
        }
        _ => NEUTRAL,
    }
}

/// Year proximity by decade, 0.2 lost per decade apart.
pub fn decade_similarity(preferred: Option<f64>, year: Option<f64>) -> f64 {
    match (present(preferred), present(year)) {
        (Some(p), Some(y)) => {
            let decades = ((p / 10.0).floor() - (y / 10.0).floor()).abs();
            (1.0 - DECADE_STEP * decades).max(0.0)
        }
        _ => NEUTRAL,
    }
}

fn clean(value: Option<&str>) -> Option<String> {
    value
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
}

/// Case-insensitive: exact 1.0, containment either way 0.5, else 0.0.
pub fn categorical_match(a: Option<&str>, b: Option<&str>) -> f64 {
    let (Some(a), Some(b)) = (clean(a), clean(b)) else {
        return 0.0;
    };
    if a == b {
        1.0
    } else if a.contains(&b) || b.contains(&a) {
        0.5
    } else {
        0.0
    }
}

/// Decode a posting time: epoch seconds (number or numeric string) or RFC 3339.
pub fn parse_posted_at(value: &Value) -> Option<DateTime<Utc>> {
    let from_seconds = |secs: f64| {
        if !secs.is_finite() || secs <= 0.0 {
            return None;
        }
        DateTime::from_timestamp_millis((secs * 1000.0) as i64)
    };

    match value {
        Value::Number(n) => n.as_f64().and_then(from_seconds),
        Value::String(s) => {
            let s = s.trim();
            match s.parse::<f64>() {
                Ok(secs) => from_seconds(secs),
                Err(_) => DateTime::parse_from_rfc3339(s)
                    .ok()
                    .map(|dt| dt.with_timezone(&Utc)),
            }
        }
        _ => None,
    }
}

/// Step decay by posting age; future postings count as brand new.
pub fn freshness_similarity(posted: Option<&Value>, now: DateTime<Utc>) -> f64 {
    let Some(posted_at) = posted.and_then(parse_posted_at) else {
        return STALE;
    };

    let age_secs = (now - posted_at).num_milliseconds() as f64 / 1000.0;
    let days = (age_secs / SECONDS_PER_DAY).max(0.0);

    if days <= 3.0 {
        1.0
    } else if days <= 7.0 {
        0.8
    } else if days <= 30.0 {
        0.6
    } else {
        STALE
    }
}

/// Share of `keywords` found inside any of `entities`, case-insensitive.
pub fn keyword_presence(keywords: &[String], entities: &[String]) -> f64 {
    let keywords = lower_list(keywords);
    let entities = lower_list(entities);
    if keywords.is_empty() || entities.is_empty() {
        return 0.0;
    }

    let found = keywords
        .iter()
        .filter(|k| entities.iter().any(|e| e.contains(k.as_str())))
        .count();
    (found as f64 / keywords.len() as f64).min(1.0)
}

/// Cosine between the embeddings of two texts from one batch; `NEUTRAL` when
/// the provider fails or returns the wrong number of rows.
pub fn semantic_similarity(provider: &dyn EmbeddingProvider, left: &str, right: &str) -> f64 {
    match provider.embed(&[left.to_string(), right.to_string()]) {
        Ok(batch) if batch.len() == 2 => batch.similarity(0, 1),
        Ok(batch) => {
            debug!(rows = batch.len(), "embedding returned wrong row count; using neutral score");
            NEUTRAL
        }
        Err(err) => {
            debug!(error = %err, "embedding failed; using neutral score");
            NEUTRAL
        }
    }
}
