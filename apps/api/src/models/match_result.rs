use serde::{Deserialize, Serialize};

use crate::matching::combiner::ScoreBreakdown;
use crate::models::job::JobPosting;

/// Qualitative tier derived from the final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchCategory {
    Excellent,
    Strong,
    Good,
    Fair,
    Basic,
}

impl MatchCategory {
    /// Excellent ≥85, Strong ≥70, Good ≥55, Fair ≥40, Basic otherwise.
    pub fn from_score(score: f64) -> Self {
        if score >= 85.0 {
            Self::Excellent
        } else if score >= 70.0 {
            Self::Strong
        } else if score >= 55.0 {
            Self::Good
        } else if score >= 40.0 {
            Self::Fair
        } else {
            Self::Basic
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent Match",
            Self::Strong => "Strong Match",
            Self::Good => "Good Match",
            Self::Fair => "Fair Match",
            Self::Basic => "Basic Match",
        }
    }
}

/// A posting annotated with its score, rank, and tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    /// 1-based position in the ranked output.
    pub rank: u32,
    pub score: f64,
    pub category: MatchCategory,
    /// Display form of `category`, e.g. "Good Match".
    #[serde(default)]
    pub category_label: String,
    pub breakdown: ScoreBreakdown,
    pub job: JobPosting,
    pub job_skills: Vec<String>,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_thresholds() {
        assert_eq!(MatchCategory::from_score(100.0), MatchCategory::Excellent);
        assert_eq!(MatchCategory::from_score(85.0), MatchCategory::Excellent);
        assert_eq!(MatchCategory::from_score(84.9), MatchCategory::Strong);
        assert_eq!(MatchCategory::from_score(70.0), MatchCategory::Strong);
        assert_eq!(MatchCategory::from_score(69.9), MatchCategory::Good);
        assert_eq!(MatchCategory::from_score(55.0), MatchCategory::Good);
        assert_eq!(MatchCategory::from_score(40.0), MatchCategory::Fair);
        assert_eq!(MatchCategory::from_score(39.9), MatchCategory::Basic);
        assert_eq!(MatchCategory::from_score(0.0), MatchCategory::Basic);
    }

    #[test]
    fn test_category_serde_snake_case() {
        let json = serde_json::to_string(&MatchCategory::Excellent).unwrap();
        assert_eq!(json, r#""excellent""#);
    }

    #[test]
    fn test_category_label() {
        assert_eq!(MatchCategory::Good.label(), "Good Match");
    }
}
