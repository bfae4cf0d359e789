use chrono::{DateTime, Utc};
use tracing::debug;

use super::factors::{
    NEUTRAL, categorical_match, decade_similarity, freshness_similarity, genre_similarity,
    keyword_presence, rating_similarity, salary_similarity, semantic_similarity, skills_overlap,
};
use super::weights::{JOB_WEIGHTS, JobWeights, MOVIE_WEIGHTS, MovieWeights};
use crate::embedding::EmbeddingProvider;
use crate::normalize::lower_list;
use crate::{JobProfile, Movie, MovieProfile, Vacancy};

/// Share of the skills-text cosine inside the semantic skills signal; the
/// remainder goes to the description cosine.
const SKILLS_TEXT_SHARE: f64 = 0.6;
/// Share of the semantic signal in the skills factor; the remainder goes to
/// the discrete overlap ratio.
const SEMANTIC_SHARE: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovieFactors {
    pub genre: f64,
    pub plot: f64,
    pub rating: f64,
    pub year: f64,
    pub cast: f64,
}

impl MovieFactors {
    pub fn aggregate(&self, weights: &MovieWeights) -> f64 {
        self.genre * weights.genre
            + self.plot * weights.plot
            + self.rating * weights.rating
            + self.year * weights.year
            + self.cast * weights.cast
    }

    /// Named factor scores in output order.
    pub fn details(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("genre_sim", self.genre),
            ("plot_sim", self.plot),
            ("rating_sim", self.rating),
            ("year_sim", self.year),
            ("cast_sim", self.cast),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JobFactors {
    pub skills: f64,
    pub experience: f64,
    pub level: f64,
    pub location: f64,
    pub salary: f64,
    pub freshness: f64,
}

impl JobFactors {
    pub fn aggregate(&self, weights: &JobWeights) -> f64 {
        self.skills * weights.skills
            + self.experience * weights.experience
            + self.level * weights.level
            + self.location * weights.location
            + self.salary * weights.salary
            + self.freshness * weights.freshness
    }

    pub fn details(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("skills_sim", self.skills),
            ("exp_sim", self.experience),
            ("level_sim", self.level),
            ("location_sim", self.location),
            ("salary_sim", self.salary),
            ("freshness_sim", self.freshness),
        ]
    }
}

fn join_non_empty<'a>(parts: impl IntoIterator<Item = &'a str>, sep: &str) -> String {
    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}

/// Preferred genres followed by preferred themes.
pub fn movie_profile_text(profile: &MovieProfile) -> String {
    join_non_empty(
        profile
            .preferred_genres
            .iter()
            .chain(&profile.preferred_themes)
            .map(String::as_str),
        " ",
    )
}

/// Title, plot and genres of a movie.
pub fn movie_text(movie: &Movie) -> String {
    let genres = movie.genres.join(" ");
    join_non_empty(
        [
            movie.title.as_deref().unwrap_or(""),
            movie.plot.as_deref().unwrap_or(""),
            genres.as_str(),
        ],
        " ",
    )
}

pub fn skills_text(skills: &[String]) -> String {
    lower_list(skills).join(", ")
}

/// `skill:years` pairs, years truncated to whole numbers.
pub fn experience_text<'a>(experience: impl IntoIterator<Item = (&'a str, f64)>) -> String {
    experience
        .into_iter()
        .map(|(skill, years)| format!("{}:{}", skill.trim(), years.trunc() as i64))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Vacancy skills encoded as one year each, mirroring the profile's
/// `skill:years` text so both sides embed in the same shape.
pub fn required_experience_text(skills: &[String]) -> String {
    let mut seen = std::collections::HashSet::new();
    experience_text(
        skills
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty() && seen.insert(*s))
            .map(|s| (s, 1.0)),
    )
}

pub fn profile_description_text(profile: &JobProfile) -> String {
    let experience = experience_text(profile.experience.iter().map(|(k, v)| (k.as_str(), *v)));
    format!(
        "{} | {} | {}",
        profile.position.as_deref().unwrap_or("").trim(),
        skills_text(&profile.skills),
        experience
    )
}

pub fn vacancy_description_text(vacancy: &Vacancy) -> String {
    format!(
        "{} | {} | {}",
        vacancy.title.as_deref().unwrap_or("").trim(),
        vacancy.description.as_deref().unwrap_or("").trim(),
        skills_text(&vacancy.skills)
    )
}

/// Computes movie factor scores; the provider is only used for the plot factor.
pub struct MovieScorer<'a> {
    provider: &'a dyn EmbeddingProvider,
    weights: MovieWeights,
}

impl<'a> MovieScorer<'a> {
    pub fn new(provider: &'a dyn EmbeddingProvider) -> Self {
        Self {
            provider,
            weights: MOVIE_WEIGHTS,
        }
    }

    pub fn weights(&self) -> &MovieWeights {
        &self.weights
    }

    pub fn factors(&self, profile: &MovieProfile, movie: &Movie) -> MovieFactors {
        let plot = semantic_similarity(
            self.provider,
            &movie_profile_text(profile),
            &movie_text(movie),
        );

        MovieFactors {
            genre: genre_similarity(&profile.preferred_genres, &movie.genres),
            plot,
            rating: rating_similarity(profile.preferred_rating, movie.rating),
            year: decade_similarity(profile.preferred_year, movie.year),
            cast: keyword_presence(&profile.favorite_actors, &movie.cast),
        }
    }

    pub fn score(&self, profile: &MovieProfile, movie: &Movie) -> (f64, MovieFactors) {
        let factors = self.factors(profile, movie);
        (factors.aggregate(&self.weights), factors)
    }
}

/// Cosines over the six-text job batch.
struct JobSemantics {
    skills: f64,
    experience: f64,
    description: f64,
}

impl JobSemantics {
    fn neutral() -> Self {
        Self {
            skills: NEUTRAL,
            experience: NEUTRAL,
            description: NEUTRAL,
        }
    }
}

/// Computes vacancy factor scores relative to a fixed `now`.
pub struct JobScorer<'a> {
    provider: &'a dyn EmbeddingProvider,
    weights: JobWeights,
    now: DateTime<Utc>,
}

impl<'a> JobScorer<'a> {
    pub fn new(provider: &'a dyn EmbeddingProvider, now: DateTime<Utc>) -> Self {
        Self {
            provider,
            weights: JOB_WEIGHTS,
            now,
        }
    }

    pub fn weights(&self) -> &JobWeights {
        &self.weights
    }

    fn semantics(&self, profile: &JobProfile, vacancy: &Vacancy) -> JobSemantics {
        let batch = [
            skills_text(&profile.skills),
            skills_text(&vacancy.skills),
            experience_text(profile.experience.iter().map(|(k, v)| (k.as_str(), *v))),
            required_experience_text(&vacancy.skills),
            profile_description_text(profile),
            vacancy_description_text(vacancy),
        ];

        match self.provider.embed(&batch) {
            Ok(vectors) if vectors.len() == batch.len() => JobSemantics {
                skills: vectors.similarity(0, 1),
                experience: vectors.similarity(2, 3),
                description: vectors.similarity(4, 5),
            },
            Ok(vectors) => {
                debug!(
                    expected = batch.len(),
                    received = vectors.len(),
                    "job embedding batch incomplete; using neutral scores"
                );
                JobSemantics::neutral()
            }
            Err(err) => {
                debug!(error = %err, "job embedding failed; using neutral scores");
                JobSemantics::neutral()
            }
        }
    }

    pub fn factors(&self, profile: &JobProfile, vacancy: &Vacancy) -> JobFactors {
        let semantics = self.semantics(profile, vacancy);
        let semantic_skills = SKILLS_TEXT_SHARE * semantics.skills
            + (1.0 - SKILLS_TEXT_SHARE) * semantics.description;
        let overlap = skills_overlap(&profile.skills, &vacancy.skills);

        JobFactors {
            skills: SEMANTIC_SHARE * semantic_skills + (1.0 - SEMANTIC_SHARE) * overlap,
            experience: semantics.experience,
            level: categorical_match(profile.level.as_deref(), vacancy.level.as_deref()),
            location: categorical_match(profile.location.as_deref(), vacancy.location.as_deref()),
            salary: salary_similarity(profile.salary_expectation, vacancy.salary),
            freshness: freshness_similarity(vacancy.posted_ts.as_ref(), self.now),
        }
    }

    pub fn score(&self, profile: &JobProfile, vacancy: &Vacancy) -> (f64, JobFactors) {
        let factors = self.factors(profile, vacancy);
        (factors.aggregate(&self.weights), factors)
    }
}
