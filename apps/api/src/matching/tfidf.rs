//! TF-IDF vectorizer and cosine similarity for the description-similarity term.
//!
//! The vectorizer is fitted per match request over every job document plus the
//! resume, so IDF reflects the batch being ranked. All maps are ordered, which
//! keeps the floating-point summation order, and therefore the scores, stable.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::matching::stopwords::is_stop_word;
use crate::matching::MatchError;

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TfidfConfig {
    /// Inclusive (min, max) n-gram lengths.
    pub ngram_range: (usize, usize),
    pub max_features: usize,
}

impl Default for TfidfConfig {
    fn default() -> Self {
        Self {
            ngram_range: (1, 2),
            max_features: 5000,
        }
    }
}

/// Sparse, L2-normalized document vector keyed by vocabulary index.
pub type SparseVector = BTreeMap<usize, f64>;

#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    config: TfidfConfig,
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Learns vocabulary and smoothed IDF weights from `documents`.
    ///
    /// Fails with `EmptyVocabulary` when no document yields a single
    /// non-stop-word term.
    pub fn fit(documents: &[&str], config: TfidfConfig) -> Result<Self, MatchError> {
        let (min_n, max_n) = config.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(MatchError::InvalidNgramRange { min: min_n, max: max_n });
        }
        if config.max_features == 0 {
            return Err(MatchError::ZeroMaxFeatures);
        }

        let mut corpus_frequency: BTreeMap<String, usize> = BTreeMap::new();
        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();

        for doc in documents {
            let counts = term_counts(doc, config.ngram_range);
            for (term, count) in counts {
                *corpus_frequency.entry(term.clone()).or_insert(0) += count;
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        if corpus_frequency.is_empty() {
            return Err(MatchError::EmptyVocabulary);
        }

        let mut ranked: Vec<(&String, &usize)> = corpus_frequency.iter().collect();
        if ranked.len() > config.max_features {
            ranked.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
            ranked.truncate(config.max_features);
        }
        let mut kept: Vec<String> = ranked.into_iter().map(|(term, _)| term.clone()).collect();
        kept.sort();

        let n_docs = documents.len() as f64;
        let idf = kept
            .iter()
            .map(|term| {
                let df = document_frequency.get(term).copied().unwrap_or(0) as f64;
                ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0
            })
            .collect();

        let vocabulary = kept
            .into_iter()
            .enumerate()
            .map(|(index, term)| (term, index))
            .collect();

        Ok(Self {
            config,
            vocabulary,
            idf,
        })
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    /// TF-IDF vector of `document` over the fitted vocabulary. A document with
    /// no known terms maps to the empty vector.
    pub fn transform(&self, document: &str) -> SparseVector {
        let mut vector = SparseVector::new();
        for (term, count) in term_counts(document, self.config.ngram_range) {
            if let Some(&index) = self.vocabulary.get(&term) {
                vector.insert(index, count as f64 * self.idf[index]);
            }
        }

        let norm = vector.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for weight in vector.values_mut() {
                *weight /= norm;
            }
        }
        vector
    }
}

/// Cosine similarity in [0, 1]. Zero vectors are dissimilar to everything.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let norm_a = a.values().map(|w| w * w).sum::<f64>().sqrt();
    let norm_b = b.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let dot: f64 = a
        .iter()
        .filter_map(|(index, wa)| b.get(index).map(|wb| wa * wb))
        .sum();
    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}

/// Resume-vs-job description similarity for a whole batch, scaled to 0–100.
pub fn description_similarities(
    resume_text: &str,
    job_documents: &[String],
    config: TfidfConfig,
) -> Result<Vec<f64>, MatchError> {
    let mut corpus: Vec<&str> = job_documents.iter().map(String::as_str).collect();
    corpus.push(resume_text);

    let vectorizer = TfidfVectorizer::fit(&corpus, config)?;
    debug!(
        "TF-IDF fitted over {} documents: {} terms",
        corpus.len(),
        vectorizer.vocabulary_len()
    );
    let resume_vector = vectorizer.transform(resume_text);

    Ok(job_documents
        .iter()
        .map(|doc| cosine_similarity(&resume_vector, &vectorizer.transform(doc)) * 100.0)
        .collect())
}

/// Lower-cased word tokens with stop words removed.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|token| !is_stop_word(token))
        .map(str::to_string)
        .collect()
}

fn term_counts(text: &str, (min_n, max_n): (usize, usize)) -> BTreeMap<String, usize> {
    let tokens = tokenize(text);
    let mut counts = BTreeMap::new();
    for n in min_n..=max_n {
        if n == 0 || tokens.len() < n {
            continue;
        }
        for window in tokens.windows(n) {
            *counts.entry(window.join(" ")).or_insert(0) += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_drops_stop_words_and_single_chars() {
        let tokens = tokenize("The engineer will build a Rust API");
        assert_eq!(tokens, vec!["engineer", "build", "rust", "api"]);
    }

    #[test]
    fn test_term_counts_include_bigrams() {
        let counts = term_counts("data pipelines data pipelines", (1, 2));
        assert_eq!(counts.get("data"), Some(&2));
        assert_eq!(counts.get("data pipelines"), Some(&2));
        assert_eq!(counts.get("pipelines data"), Some(&1));
    }

    #[test]
    fn test_fit_empty_vocabulary_errors() {
        let result = TfidfVectorizer::fit(&["the and of", ""], TfidfConfig::default());
        assert!(matches!(result, Err(MatchError::EmptyVocabulary)));
    }

    #[test]
    fn test_fit_rejects_bad_ngram_range() {
        let config = TfidfConfig {
            ngram_range: (2, 1),
            max_features: 10,
        };
        let result = TfidfVectorizer::fit(&["rust services"], config);
        assert!(matches!(result, Err(MatchError::InvalidNgramRange { .. })));
    }

    #[test]
    fn test_fit_rejects_zero_max_features() {
        let config = TfidfConfig {
            ngram_range: (1, 1),
            max_features: 0,
        };
        let result = TfidfVectorizer::fit(&["rust services"], config);
        assert!(matches!(result, Err(MatchError::ZeroMaxFeatures)));
    }

    #[test]
    fn test_max_features_caps_vocabulary() {
        let config = TfidfConfig {
            ngram_range: (1, 1),
            max_features: 2,
        };
        let vectorizer =
            TfidfVectorizer::fit(&["rust rust rust python python kafka"], config).unwrap();
        assert_eq!(vectorizer.vocabulary_len(), 2);
        assert!(vectorizer.transform("kafka").is_empty());
    }

    #[test]
    fn test_identical_documents_are_fully_similar() {
        let docs = ["rust distributed systems", "python data pipelines"];
        let vectorizer = TfidfVectorizer::fit(&docs, TfidfConfig::default()).unwrap();
        let a = vectorizer.transform(docs[0]);
        let b = vectorizer.transform(docs[0]);
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_disjoint_documents_have_zero_similarity() {
        let docs = ["rust distributed systems", "python data pipelines"];
        let vectorizer = TfidfVectorizer::fit(&docs, TfidfConfig::default()).unwrap();
        let a = vectorizer.transform(docs[0]);
        let b = vectorizer.transform(docs[1]);
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_zero_vector_similarity_is_zero() {
        let empty = SparseVector::new();
        let mut other = SparseVector::new();
        other.insert(0, 1.0);
        assert_eq!(cosine_similarity(&empty, &other), 0.0);
    }

    #[test]
    fn test_description_similarities_ranks_overlap_higher() {
        let resume = "Rust engineer building distributed systems and Kafka pipelines";
        let jobs = vec![
            "Distributed systems engineer, Rust and Kafka".to_string(),
            "Front-end designer for marketing websites".to_string(),
        ];
        let scores = description_similarities(resume, &jobs, TfidfConfig::default()).unwrap();
        assert_eq!(scores.len(), 2);
        assert!(scores[0] > scores[1]);
        assert!(scores.iter().all(|s| (0.0..=100.0).contains(s)));
    }

    #[test]
    fn test_description_similarities_is_deterministic() {
        let resume = "python sql airflow snowflake";
        let jobs = vec![
            "airflow and snowflake data engineer".to_string(),
            "sql analyst".to_string(),
        ];
        let first = description_similarities(resume, &jobs, TfidfConfig::default()).unwrap();
        let second = description_similarities(resume, &jobs, TfidfConfig::default()).unwrap();
        assert_eq!(first, second);
    }
}
