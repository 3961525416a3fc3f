//! Sub-score calculators. Every function returns a value in 0–100.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::matching::skills::skill_key;
use crate::matching::stopwords::is_stop_word;
use crate::models::job::JobPosting;
use crate::models::resume::Resume;

/// Used where a term cannot be judged either way.
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Years credited per work-history entry when the resume never states a total.
const YEARS_PER_HISTORY_ENTRY: f64 = 2.0;

const SENIORITY_KEYWORDS: &[&str] = &[
    "intern", "junior", "jr", "associate", "mid", "senior", "sr", "staff", "lead", "principal",
    "manager", "head", "director", "vp", "chief",
];
const SENIORITY_WEIGHT: f64 = 1.5;
const FULL_TITLE_MULTIPLIER: f64 = 1.2;

const STATE_MATCH_SCORE: f64 = 80.0;

static TITLE_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z0-9+#.]+").unwrap());
static JOB_YEARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d{1,2})\s*\+?\s*(?:(?:-|to)\s*\d{1,2}\s*)?(?:years?|yrs?)\b").unwrap()
});
static RESUME_YEARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(\d{1,2})\s*\+?\s*(?:years?|yrs?)(?:\s+of)?\s+(?:(?:professional|industry|relevant|hands-on|work)\s+)?experience",
    )
    .unwrap()
});
static HISTORY_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:19|20)\d{2}\s*(?:-|–|—|to)\s*(?:(?:19|20)\d{2}|present|current|now)\b")
        .unwrap()
});
static RELOCATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:willing to relocate|open to relocat(?:e|ion|ing)|relocation\s*:\s*(?:yes|open|possible))\b",
    )
    .unwrap()
});
static RELOCATION_REFUSED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:not|un)\s*(?:willing to relocate|open to relocat)").unwrap()
});

/// Coverage of the job's skills by the resume: |R∩J| / |J| × 100.
///
/// Synonyms share a comparison key, so `JS` on one side matches `JavaScript`
/// on the other. Either side empty → 0.
pub fn skill_match_score<R, J>(resume_skills: R, job_skills: J) -> f64
where
    R: IntoIterator,
    R::Item: AsRef<str>,
    J: IntoIterator,
    J::Item: AsRef<str>,
{
    let resume_keys: HashSet<String> = resume_skills
        .into_iter()
        .map(|s| skill_key(s.as_ref()))
        .collect();
    let job_keys: HashSet<String> = job_skills.into_iter().map(|s| skill_key(s.as_ref())).collect();

    if resume_keys.is_empty() || job_keys.is_empty() {
        return 0.0;
    }

    let shared = job_keys.intersection(&resume_keys).count();
    shared as f64 / job_keys.len() as f64 * 100.0
}

/// Keyword overlap between the job title and the resume, seniority words
/// weighted up, capped at 100.
pub fn title_match_score(title: &str, resume: &Resume) -> f64 {
    let title_lower = title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    let tokens: Vec<&str> = TITLE_TOKEN
        .find_iter(&title_lower)
        .map(|m| m.as_str().trim_matches('.'))
        .filter(|t| !t.is_empty() && !is_stop_word(t))
        .collect();

    if tokens.is_empty() {
        return 0.0;
    }

    let resume_words: HashSet<&str> = TITLE_TOKEN
        .find_iter(&resume.lowered)
        .map(|m| m.as_str().trim_matches('.'))
        .collect();

    let mut total_weight = 0.0;
    let mut matched_weight = 0.0;
    for token in &tokens {
        let weight = if SENIORITY_KEYWORDS.contains(token) {
            SENIORITY_WEIGHT
        } else {
            1.0
        };
        total_weight += weight;
        if resume_words.contains(token) {
            matched_weight += weight;
        }
    }

    let mut score = matched_weight / total_weight * 100.0;
    if contains_word(&resume.lowered, &title_lower) {
        score *= FULL_TITLE_MULTIPLIER;
    }
    score.min(100.0)
}

/// Years of experience a posting asks for: the explicit field, else the first
/// "N years" phrase in its description.
pub fn required_years(job: &JobPosting) -> Option<f64> {
    if let Some(years) = job.min_experience_years.filter(|y| *y > 0.0) {
        return Some(years);
    }
    JOB_YEARS
        .captures(&job.description)
        .and_then(|caps| caps[1].parse::<f64>().ok())
        .filter(|y| *y > 0.0)
}

/// Best guess at the resume's total years: the largest "N years of
/// experience" statement, else the number of dated work-history lines.
pub fn estimate_resume_years(resume: &Resume) -> Option<f64> {
    let stated = RESUME_YEARS
        .captures_iter(&resume.text)
        .filter_map(|caps| caps[1].parse::<f64>().ok())
        .fold(None, |best: Option<f64>, y| Some(best.map_or(y, |b| b.max(y))));
    if let Some(years) = stated.filter(|y| *y > 0.0) {
        return Some(years);
    }

    let entries = resume
        .text
        .lines()
        .filter(|line| HISTORY_ENTRY.is_match(line))
        .count();
    (entries > 0).then(|| entries as f64 * YEARS_PER_HISTORY_ENTRY)
}

/// Resume years over required years, capped at 100. No requirement → 100;
/// a requirement against an unknown resume → neutral.
pub fn experience_match_score(job: &JobPosting, resume: &Resume) -> f64 {
    let Some(required) = required_years(job) else {
        return 100.0;
    };
    match estimate_resume_years(resume) {
        Some(years) => (years / required * 100.0).min(100.0),
        None => NEUTRAL_SCORE,
    }
}

/// Remote jobs and relocation-friendly resumes score 100; otherwise the job's
/// city or state must show up in the resume, else neutral.
pub fn location_match_score(job: &JobPosting, resume: &Resume) -> f64 {
    if job.is_remote() || open_to_relocation(&resume.text) {
        return 100.0;
    }

    if let Some(city) = non_empty(&job.city) {
        if contains_word(&resume.lowered, &city.to_lowercase()) {
            return 100.0;
        }
    }

    if let Some(state) = non_empty(&job.state) {
        // Two-letter state codes only count in upper case ("CA", not "ca").
        let found = if state.len() <= 2 {
            contains_word(&resume.text, &state.to_uppercase())
        } else {
            contains_word(&resume.lowered, &state.to_lowercase())
        };
        if found {
            return STATE_MATCH_SCORE;
        }
    }

    NEUTRAL_SCORE
}

fn open_to_relocation(text: &str) -> bool {
    RELOCATION.is_match(text) && !RELOCATION_REFUSED.is_match(text)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Substring match that refuses to land inside a longer word.
fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}
