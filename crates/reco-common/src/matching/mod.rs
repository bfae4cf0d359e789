pub mod explanation;
pub mod factors;
pub mod pipeline;
pub mod scoring;
pub mod weights;

pub use pipeline::{Ranker, round_score};
pub use scoring::{JobFactors, JobScorer, MovieFactors, MovieScorer};
pub use weights::{JOB_WEIGHTS, JobWeights, MOVIE_WEIGHTS, MovieWeights};
