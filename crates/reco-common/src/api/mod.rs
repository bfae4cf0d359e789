pub mod request;
pub mod response;

pub use request::{RecoError, RecoRequest, error_body};
pub use response::RankedResult;

/// Which pipeline instantiation a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Movies,
    Vacancies,
}

impl Domain {
    /// Result key carrying the candidate id.
    pub fn id_key(self) -> &'static str {
        match self {
            Domain::Movies => "movie_id",
            Domain::Vacancies => "vacancy_id",
        }
    }

    /// Payload key holding the candidate list.
    pub fn candidates_key(self) -> &'static str {
        match self {
            Domain::Movies => "movies",
            Domain::Vacancies => "vacancies",
        }
    }

    /// Movie results echo the title; vacancy results do not.
    pub fn carries_title(self) -> bool {
        matches!(self, Domain::Movies)
    }
}
