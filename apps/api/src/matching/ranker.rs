//! Ranker — threshold filter, stable descending sort, truncation, rank labels.

use crate::models::match_result::{MatchCategory, MatchResult};

/// Drops results under `min_score`, orders the rest by score (ties keep their
/// input order), keeps the first `top_n`, then numbers them 1..n.
pub fn rank_results(mut results: Vec<MatchResult>, top_n: usize, min_score: f64) -> Vec<MatchResult> {
    results.retain(|r| r.score >= min_score);
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    results.truncate(top_n);

    for (index, result) in results.iter_mut().enumerate() {
        result.rank = index as u32 + 1;
        result.category = MatchCategory::from_score(result.score);
        result.category_label = result.category.label().to_string();
    }
    results
}
