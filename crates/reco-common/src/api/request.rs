use std::fmt::Display;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use thiserror::Error;

use super::{Domain, RankedResult};
use crate::matching::Ranker;
use crate::{JobProfile, Movie, MovieProfile, Vacancy};

/// Top-level input problems; the only failures a ranking run can report.
#[derive(Debug, Error)]
pub enum RecoError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("{0} must be a JSON object")]
    NotAnObject(&'static str),
    #[error("{0} must be a JSON array")]
    NotAList(&'static str),
    #[error("candidate #{index} must be a JSON object")]
    InvalidCandidate { index: usize },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// `{"error": "<message>"}`
pub fn error_body(err: &dyn Display) -> Value {
    json!({ "error": err.to_string() })
}

/// A validated profile plus its candidates for one domain.
#[derive(Debug, Clone, PartialEq)]
pub enum RecoRequest {
    Movies {
        profile: MovieProfile,
        movies: Vec<Movie>,
    },
    Vacancies {
        profile: JobProfile,
        vacancies: Vec<Vacancy>,
    },
}

fn profile_object(value: Option<Value>) -> Result<Map<String, Value>, RecoError> {
    match value {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(RecoError::NotAnObject("profile")),
    }
}

fn candidate_list<T: DeserializeOwned>(value: Option<Value>) -> Result<Vec<T>, RecoError> {
    let items = match value {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(RecoError::NotAList("candidates")),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(_) => Ok(serde_json::from_value(item)?),
            _ => Err(RecoError::InvalidCandidate { index }),
        })
        .collect()
}

impl RecoRequest {
    fn build(domain: Domain, profile: Option<Value>, candidates: Option<Value>) -> Result<Self, RecoError> {
        let profile = Value::Object(profile_object(profile)?);
        Ok(match domain {
            Domain::Movies => RecoRequest::Movies {
                profile: serde_json::from_value(profile)?,
                movies: candidate_list(candidates)?,
            },
            Domain::Vacancies => RecoRequest::Vacancies {
                profile: serde_json::from_value(profile)?,
                vacancies: candidate_list(candidates)?,
            },
        })
    }

    /// Envelope form: `{"user": {...}, "movies"|"vacancies": [...]}`.
    /// Missing keys mean an empty profile or an empty candidate list.
    pub fn from_payload(domain: Domain, payload: &str) -> Result<Self, RecoError> {
        let Value::Object(mut envelope) = serde_json::from_str::<Value>(payload)? else {
            return Err(RecoError::NotAnObject("payload"));
        };
        let profile = envelope.remove("user");
        let candidates = envelope.remove(domain.candidates_key());
        Self::build(domain, profile, candidates)
    }

    /// Separate documents: a profile object and a candidate array.
    pub fn from_documents(domain: Domain, profile: &str, candidates: &str) -> Result<Self, RecoError> {
        let profile: Value = serde_json::from_str(profile)?;
        let candidates: Value = serde_json::from_str(candidates)?;
        if !profile.is_object() {
            return Err(RecoError::NotAnObject("profile"));
        }
        if !candidates.is_array() {
            return Err(RecoError::NotAList("candidates"));
        }
        Self::build(domain, Some(profile), Some(candidates))
    }

    pub fn domain(&self) -> Domain {
        match self {
            RecoRequest::Movies { .. } => Domain::Movies,
            RecoRequest::Vacancies { .. } => Domain::Vacancies,
        }
    }

    pub fn rank(&self, ranker: &Ranker<'_>) -> Vec<RankedResult> {
        match self {
            RecoRequest::Movies { profile, movies } => ranker.rank_movies(profile, movies),
            RecoRequest::Vacancies { profile, vacancies } => {
                ranker.rank_vacancies(profile, vacancies)
            }
        }
    }
}
