//! Score Combiner — weighted sum of the sub-scores plus a bounded skill bonus.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::matching::skills::skill_key;

/// Skills worth extra points when both sides have them.
const HIGH_DEMAND_SKILLS: &[&str] = &[
    "Python",
    "AWS",
    "Kubernetes",
    "Docker",
    "Machine Learning",
    "React",
    "SQL",
    "TypeScript",
    "Go",
    "Rust",
    "Spark",
    "Snowflake",
    "Azure",
    "GCP",
    "Terraform",
];
const HIGH_DEMAND_POINTS: f64 = 2.0;
const HIGH_DEMAND_CAP: f64 = 10.0;
const OVERLAP_BONUS_3: f64 = 3.0;
const OVERLAP_BONUS_5: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub skills: f64,
    pub title: f64,
    pub description: f64,
    pub experience: f64,
    pub location: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            skills: 0.40,
            title: 0.20,
            description: 0.25,
            experience: 0.10,
            location: 0.05,
        }
    }
}

/// Per-term sub-scores (0–100 each) plus the bonus and the final score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub skills: f64,
    pub title: f64,
    pub description: f64,
    pub experience: f64,
    pub location: f64,
    pub bonus: f64,
    pub total: f64,
}

/// Bonus for shared skills: +2 per shared high-demand skill (max +10), then
/// +3 for three or four overlapping skills or +5 for five or more.
pub fn skill_bonus(matched_skills: &[String]) -> f64 {
    let matched: HashSet<String> = matched_skills.iter().map(|s| skill_key(s)).collect();

    let high_demand = HIGH_DEMAND_SKILLS
        .iter()
        .filter(|skill| matched.contains(&skill_key(skill)))
        .count() as f64
        * HIGH_DEMAND_POINTS;

    let overlap = if matched.len() >= 5 {
        OVERLAP_BONUS_5
    } else if matched.len() >= 3 {
        OVERLAP_BONUS_3
    } else {
        0.0
    };

    high_demand.min(HIGH_DEMAND_CAP) + overlap
}

/// Σ(weight × sub-score) + bonus, clamped to [0, 100] and rounded to 0.1.
pub fn combine(breakdown: &mut ScoreBreakdown, weights: &ScoringWeights) -> f64 {
    let weighted = weights.skills * breakdown.skills
        + weights.title * breakdown.title
        + weights.description * breakdown.description
        + weights.experience * breakdown.experience
        + weights.location * breakdown.location;

    let total = round_one_decimal((weighted + breakdown.bonus).clamp(0.0, 100.0));
    breakdown.total = total;
    total
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        let w = ScoringWeights::default();
        let sum = w.skills + w.title + w.description + w.experience + w.location;
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_bonus_counts_high_demand_skills() {
        assert_eq!(skill_bonus(&skills(&["Python", "AWS"])), 4.0);
    }

    #[test]
    fn test_bonus_overlap_tiers() {
        // Three shared, two high-demand: 4 + 3
        assert_eq!(skill_bonus(&skills(&["Python", "SQL", "Excel"])), 7.0);
        // Six shared, all high-demand: capped 10 + 5
        assert_eq!(
            skill_bonus(&skills(&["Python", "AWS", "Docker", "SQL", "React", "Rust"])),
            15.0
        );
    }

    #[test]
    fn test_bonus_empty_is_zero() {
        assert_eq!(skill_bonus(&[]), 0.0);
    }

    #[test]
    fn test_combine_weighted_sum() {
        let mut breakdown = ScoreBreakdown {
            skills: 80.0,
            title: 50.0,
            description: 40.0,
            experience: 100.0,
            location: 100.0,
            ..Default::default()
        };
        // 32 + 10 + 10 + 10 + 5
        let total = combine(&mut breakdown, &ScoringWeights::default());
        assert!((total - 67.0).abs() < 1e-9, "Total was {total}");
        assert_eq!(breakdown.total, total);
    }

    #[test]
    fn test_combine_clamped_to_100() {
        let mut breakdown = ScoreBreakdown {
            skills: 100.0,
            title: 100.0,
            description: 100.0,
            experience: 100.0,
            location: 100.0,
            bonus: 15.0,
            total: 0.0,
        };
        assert_eq!(combine(&mut breakdown, &ScoringWeights::default()), 100.0);
    }

    #[test]
    fn test_combine_rounds_to_one_decimal() {
        let mut breakdown = ScoreBreakdown {
            skills: 33.333,
            ..Default::default()
        };
        // 0.4 * 33.333 = 13.3332
        assert_eq!(combine(&mut breakdown, &ScoringWeights::default()), 13.3);
    }
}
