use std::str::FromStr;

use anyhow::{Context, Result};

use crate::matching::combiner::ScoringWeights;
use crate::matching::matcher::MatcherConfig;
use crate::matching::tfidf::TfidfConfig;

/// Application configuration loaded from environment variables.
/// Every variable has a default; a present but unparseable value fails startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub default_top_n: usize,
    pub default_min_score: f64,
    pub matcher: MatcherConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. `from_env` passes the process
    /// environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ScoringWeights::default();
        let weights = ScoringWeights {
            skills: parse_or(&lookup, "MATCH_WEIGHT_SKILLS", defaults.skills)?,
            title: parse_or(&lookup, "MATCH_WEIGHT_TITLE", defaults.title)?,
            description: parse_or(&lookup, "MATCH_WEIGHT_DESCRIPTION", defaults.description)?,
            experience: parse_or(&lookup, "MATCH_WEIGHT_EXPERIENCE", defaults.experience)?,
            location: parse_or(&lookup, "MATCH_WEIGHT_LOCATION", defaults.location)?,
        };

        let tfidf_defaults = TfidfConfig::default();
        let tfidf = TfidfConfig {
            ngram_range: (
                parse_or(&lookup, "TFIDF_NGRAM_MIN", tfidf_defaults.ngram_range.0)?,
                parse_or(&lookup, "TFIDF_NGRAM_MAX", tfidf_defaults.ngram_range.1)?,
            ),
            max_features: parse_or(&lookup, "TFIDF_MAX_FEATURES", tfidf_defaults.max_features)?,
        };

        Ok(Config {
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            default_top_n: parse_or(&lookup, "MATCH_TOP_N", 10)?,
            default_min_score: parse_or(&lookup, "MATCH_MIN_SCORE", 0.0)?,
            matcher: MatcherConfig { weights, tfidf },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        None => Ok(default),
    }
}
