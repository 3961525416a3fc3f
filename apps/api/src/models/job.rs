use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::matching::skills::{canonicalize_skill, extract_skills};
use crate::models::de;

static SALARY_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\s*([\d,]+(?:\.\d+)?)\s*[-–—]\s*\$?\s*([\d,]+(?:\.\d+)?)").unwrap());
static SALARY_SINGLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\s*([\d,]+(?:\.\d+)?)").unwrap());

/// Salary band attached to a posting. Amounts are in the posting's currency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: f64,
    pub max: f64,
}

impl SalaryRange {
    /// Parses `$80,000 - $120,000` or `$95,000`. Anything else is `None`.
    pub fn parse(text: &str) -> Option<Self> {
        if let Some(caps) = SALARY_RANGE.captures(text) {
            let min = parse_amount(&caps[1])?;
            let max = parse_amount(&caps[2])?;
            return Self::from_bounds(min, max);
        }
        let caps = SALARY_SINGLE.captures(text)?;
        let amount = parse_amount(&caps[1])?;
        Self::from_bounds(amount, amount)
    }

    /// Zero bounds mean "unknown" in job-search payloads.
    pub fn from_bounds(min: f64, max: f64) -> Option<Self> {
        match (min > 0.0, max > 0.0) {
            (true, true) => Some(Self {
                min: min.min(max),
                max: min.max(max),
            }),
            (true, false) => Some(Self { min, max: min }),
            (false, true) => Some(Self { min: max, max }),
            (false, false) => None,
        }
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

fn parse_amount(raw: &str) -> Option<f64> {
    raw.replace(',', "").parse::<f64>().ok()
}

/// A fetched job posting. Immutable once received; the matcher only borrows it.
///
/// Field aliases accept the job-search API's names so its payloads can be
/// forwarded unchanged. Every field defaults and tolerates `null` or a wrong
/// type, so a malformed record scores zero instead of rejecting the batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobPosting {
    #[serde(default, deserialize_with = "de::lenient_string_opt")]
    pub job_id: Option<String>,
    #[serde(default, alias = "job_title", deserialize_with = "de::lenient_string")]
    pub title: String,
    #[serde(default, alias = "employer_name", deserialize_with = "de::lenient_string")]
    pub employer: String,
    #[serde(default, alias = "job_description", deserialize_with = "de::lenient_string")]
    pub description: String,
    #[serde(default, alias = "job_city", deserialize_with = "de::lenient_string_opt")]
    pub city: Option<String>,
    #[serde(default, alias = "job_state", deserialize_with = "de::lenient_string_opt")]
    pub state: Option<String>,
    #[serde(default, alias = "job_country", deserialize_with = "de::lenient_string_opt")]
    pub country: Option<String>,
    #[serde(
        default,
        alias = "job_employment_type",
        deserialize_with = "de::lenient_string_opt"
    )]
    pub employment_type: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_salary_opt")]
    pub salary: Option<SalaryRange>,
    #[serde(default, alias = "job_salary", deserialize_with = "de::lenient_string_opt")]
    pub salary_text: Option<String>,
    #[serde(default, alias = "job_min_salary", deserialize_with = "de::lenient_f64_opt")]
    pub min_salary: Option<f64>,
    #[serde(default, alias = "job_max_salary", deserialize_with = "de::lenient_f64_opt")]
    pub max_salary: Option<f64>,
    #[serde(default, alias = "job_is_remote", deserialize_with = "de::lenient_bool_opt")]
    pub is_remote: Option<bool>,
    #[serde(
        default,
        alias = "job_required_skills",
        deserialize_with = "de::lenient_skill_list"
    )]
    pub skills: Vec<String>,
    #[serde(default, alias = "job_apply_link", deserialize_with = "de::lenient_string_opt")]
    pub apply_link: Option<String>,
    #[serde(
        default,
        alias = "job_posted_at",
        deserialize_with = "de::lenient_timestamp_opt"
    )]
    pub posted_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de::lenient_f64_opt")]
    pub min_experience_years: Option<f64>,
}

impl JobPosting {
    pub fn is_remote(&self) -> bool {
        self.is_remote.unwrap_or(false)
    }

    /// Explicit range first, then numeric bounds, then the free-text salary.
    pub fn salary_range(&self) -> Option<SalaryRange> {
        if let Some(range) = self.salary {
            return SalaryRange::from_bounds(range.min, range.max);
        }
        let from_bounds = SalaryRange::from_bounds(
            self.min_salary.unwrap_or(0.0),
            self.max_salary.unwrap_or(0.0),
        );
        from_bounds.or_else(|| self.salary_text.as_deref().and_then(SalaryRange::parse))
    }

    /// Canonical skills: the provided list if any, otherwise extracted from
    /// title and description.
    pub fn effective_skills(&self) -> Vec<String> {
        let mut skills: Vec<String> = self
            .skills
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(canonicalize_skill)
            .collect();

        if skills.is_empty() {
            let text = format!("{} {}", self.title, self.description);
            return extract_skills(&text).into_iter().collect();
        }

        skills.sort();
        skills.dedup();
        skills
    }

    /// Text fed to the TF-IDF vectorizer: description followed by the skills.
    pub fn document_text(&self) -> String {
        if self.skills.is_empty() {
            self.description.clone()
        } else {
            format!("{} {}", self.description, self.skills.join(" "))
        }
    }
}

/// Reads a job list record by record. An entry that cannot be read as a
/// posting at all (a bare number, duplicate keys) becomes an empty posting,
/// which the matcher scores zero.
pub fn deserialize_job_batch<'de, D>(deserializer: D) -> Result<Vec<JobPosting>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value(value).unwrap_or_else(|e| {
                warn!("Job #{index} is unreadable, keeping it as an empty posting: {e}");
                JobPosting::default()
            })
        })
        .collect())
}
