use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;

use super::{
    explanation::{explain_movie, explain_vacancy},
    scoring::{JobScorer, MovieScorer},
};
use crate::api::{Domain, RankedResult};
use crate::embedding::EmbeddingProvider;
use crate::{JobProfile, Movie, MovieProfile, Vacancy};

/// Aggregate rounded to 4 decimal places.
pub fn round_score(score: f64) -> f64 {
    (score * 10_000.0).round() / 10_000.0
}

/// Stable sort by score descending; ties keep input order.
pub fn sort_ranked(results: &mut [RankedResult]) {
    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
}

fn candidate_id(id: &Option<Value>) -> Value {
    id.clone().unwrap_or(Value::Null)
}

/// Scores every candidate against one profile and orders the results.
pub struct Ranker<'a> {
    provider: &'a dyn EmbeddingProvider,
    now: DateTime<Utc>,
}

impl<'a> Ranker<'a> {
    pub fn new(provider: &'a dyn EmbeddingProvider) -> Self {
        Self::with_now(provider, Utc::now())
    }

    /// Fixes the reference time used for vacancy freshness.
    pub fn with_now(provider: &'a dyn EmbeddingProvider, now: DateTime<Utc>) -> Self {
        Self { provider, now }
    }

    pub fn rank_movies(&self, profile: &MovieProfile, movies: &[Movie]) -> Vec<RankedResult> {
        let scorer = MovieScorer::new(self.provider);

        let mut results: Vec<RankedResult> = movies
            .iter()
            .map(|movie| {
                let (total, factors) = scorer.score(profile, movie);
                RankedResult {
                    domain: Domain::Movies,
                    id: candidate_id(&movie.id),
                    title: movie.title.clone(),
                    score: round_score(total),
                    explanation: explain_movie(profile, movie, &factors),
                    details: factors.details(),
                }
            })
            .collect();

        sort_ranked(&mut results);
        debug!(candidates = results.len(), "movies ranked");
        results
    }

    pub fn rank_vacancies(&self, profile: &JobProfile, vacancies: &[Vacancy]) -> Vec<RankedResult> {
        let scorer = JobScorer::new(self.provider, self.now);

        let mut results: Vec<RankedResult> = vacancies
            .iter()
            .map(|vacancy| {
                let (total, factors) = scorer.score(profile, vacancy);
                RankedResult {
                    domain: Domain::Vacancies,
                    id: candidate_id(&vacancy.id),
                    title: None,
                    score: round_score(total),
                    explanation: explain_vacancy(profile, vacancy),
                    details: factors.details(),
                }
            })
            .collect();

        sort_ranked(&mut results);
        debug!(candidates = results.len(), "vacancies ranked");
        results
    }
}
