/// Movie ranking weights. Genre and plot carry most of the signal.
pub const MOVIE_WEIGHTS: MovieWeights = MovieWeights {
    genre: 0.40,
    plot: 0.30,
    rating: 0.15,
    year: 0.10,
    cast: 0.05,
};

/// Vacancy ranking weights. Skills dominate; freshness breaks near-ties.
pub const JOB_WEIGHTS: JobWeights = JobWeights {
    skills: 0.60,
    experience: 0.15,
    level: 0.07,
    location: 0.06,
    salary: 0.02,
    freshness: 0.10,
};

#[derive(Debug, Clone, Copy)]
pub struct MovieWeights {
    pub genre: f64,
    pub plot: f64,
    pub rating: f64,
    pub year: f64,
    pub cast: f64,
}

impl MovieWeights {
    pub fn sum(&self) -> f64 {
        self.genre + self.plot + self.rating + self.year + self.cast
    }
}

#[derive(Debug, Clone, Copy)]
pub struct JobWeights {
    pub skills: f64,
    pub experience: f64,
    pub level: f64,
    pub location: f64,
    pub salary: f64,
    pub freshness: f64,
}

impl JobWeights {
    pub fn sum(&self) -> f64 {
        self.skills + self.experience + self.level + self.location + self.salary + self.freshness
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_sum_to_one() {
        assert!((MOVIE_WEIGHTS.sum() - 1.0).abs() < 1e-9);
        assert!((JOB_WEIGHTS.sum() - 1.0).abs() < 1e-9);
    }
}
