//! Batch insights over ranked matches, resume gap analysis, and keyword
//! extraction for previewing what the matcher sees in a text.

use std::collections::{BTreeMap, HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::matching::skills::{extract_skills, skill_key, SKILL_WORDS};
use crate::matching::stopwords::is_stop_word;
use crate::models::match_result::MatchResult;
use crate::models::resume::Resume;

/// Results at or above this score count as high matches.
const HIGH_MATCH_THRESHOLD: f64 = 75.0;
const TOP_SKILLS_LIMIT: usize = 10;

static KEYWORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[a-zA-Z]{3,}\b").unwrap());

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDemand {
    pub skill: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchInsights {
    pub total_matches: usize,
    pub average_score: f64,
    pub best_score: f64,
    pub high_matches: usize,
    pub top_skills_demanded: Vec<SkillDemand>,
    /// Mean salary midpoint over results that carry one.
    pub average_salary: Option<f64>,
    /// Percentage of results that are remote.
    pub remote_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapAnalysis {
    /// Resume skills demanded by at least one result.
    pub strengths: Vec<String>,
    /// Demanded skills the resume lacks, most demanded first.
    pub missing_skills: Vec<String>,
    pub strength_count: usize,
    pub missing_count: usize,
}

pub fn match_insights(results: &[MatchResult]) -> MatchInsights {
    if results.is_empty() {
        return MatchInsights {
            total_matches: 0,
            average_score: 0.0,
            best_score: 0.0,
            high_matches: 0,
            top_skills_demanded: vec![],
            average_salary: None,
            remote_ratio: 0.0,
        };
    }

    let total = results.len();
    let average_score = results.iter().map(|r| r.score).sum::<f64>() / total as f64;
    let best_score = results.iter().map(|r| r.score).fold(0.0, f64::max);
    let high_matches = results
        .iter()
        .filter(|r| r.score >= HIGH_MATCH_THRESHOLD)
        .count();

    let mut top_skills_demanded = skill_demand(results);
    top_skills_demanded.truncate(TOP_SKILLS_LIMIT);

    let midpoints: Vec<f64> = results
        .iter()
        .filter_map(|r| r.job.salary_range())
        .map(|range| range.midpoint())
        .collect();
    let average_salary =
        (!midpoints.is_empty()).then(|| midpoints.iter().sum::<f64>() / midpoints.len() as f64);

    let remote = results.iter().filter(|r| r.job.is_remote()).count();

    MatchInsights {
        total_matches: total,
        average_score: round2(average_score),
        best_score,
        high_matches,
        top_skills_demanded,
        average_salary: average_salary.map(round2),
        remote_ratio: round2(remote as f64 / total as f64 * 100.0),
    }
}

/// Splits the skills demanded across `results` into what the resume already
/// covers and what it lacks.
pub fn gap_analysis(resume: &Resume, results: &[MatchResult]) -> GapAnalysis {
    let resume_keys: HashSet<String> = resume.skills.iter().map(|s| skill_key(s)).collect();

    let (strengths, missing_skills): (Vec<String>, Vec<String>) = skill_demand(results)
        .into_iter()
        .map(|demand| demand.skill)
        .partition(|skill| resume_keys.contains(&skill_key(skill)));

    GapAnalysis {
        strength_count: strengths.len(),
        missing_count: missing_skills.len(),
        strengths,
        missing_skills,
    }
}

/// Frequent non-stop-word terms plus the extracted skills, capped at `top_k`.
///
/// Words that belong to a skill name are left to the skill extractor so a
/// skill never shows up twice in different casing.
pub fn extract_keywords(text: &str, top_k: usize) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut frequency: BTreeMap<&str, usize> = BTreeMap::new();
    for word in KEYWORD.find_iter(&lowered).map(|m| m.as_str()) {
        if is_stop_word(word) || SKILL_WORDS.contains(word) {
            continue;
        }
        *frequency.entry(word).or_insert(0) += 1;
    }

    let mut ranked: Vec<(&str, usize)> = frequency.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let mut keywords: Vec<String> = extract_skills(text).into_iter().collect();
    keywords.extend(ranked.into_iter().map(|(word, _)| word.to_string()));
    keywords.truncate(top_k);
    keywords
}

/// (skill, number of results demanding it), most demanded first, then by name.
fn skill_demand(results: &[MatchResult]) -> Vec<SkillDemand> {
    let mut counts: HashMap<String, (String, usize)> = HashMap::new();
    for result in results {
        let mut seen = HashSet::new();
        for skill in &result.job_skills {
            let key = skill_key(skill);
            if seen.insert(key.clone()) {
                counts.entry(key).or_insert_with(|| (skill.clone(), 0)).1 += 1;
            }
        }
    }

    let mut demand: Vec<SkillDemand> = counts
        .into_values()
        .map(|(skill, count)| SkillDemand { skill, count })
        .collect();
    demand.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.skill.cmp(&b.skill)));
    demand
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
