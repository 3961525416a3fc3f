// Matching engine: skill extraction, sub-scores, TF-IDF similarity,
// score combination, ranking, and batch insights.
// Everything here is synchronous and free of I/O.

use thiserror::Error;

pub mod combiner;
pub mod export;
pub mod handlers;
pub mod insights;
pub mod matcher;
pub mod ranker;
pub mod skills;
pub mod stopwords;
pub mod subscores;
pub mod tfidf;

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("vocabulary is empty after stop-word filtering")]
    EmptyVocabulary,

    #[error("invalid n-gram range ({min}, {max})")]
    InvalidNgramRange { min: usize, max: usize },

    #[error("max_features must be at least 1")]
    ZeroMaxFeatures,

    #[error("{0} weight must be a non-negative number")]
    InvalidWeight(&'static str),

    #[error("malformed job posting: {0}")]
    MalformedJob(String),

    #[error("{0} score is not a finite number")]
    NonFiniteScore(&'static str),
}
