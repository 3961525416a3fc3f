//! CSV export of ranked matches: `date, company, role, score, link`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::models::match_result::MatchResult;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV buffer error: {0}")]
    Buffer(String),

    #[error("CSV output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    date: String,
    company: &'a str,
    role: &'a str,
    score: String,
    link: &'a str,
}

/// Writes one row per result, in the order given (rank order from the matcher).
pub fn write_matches_csv(results: &[MatchResult], date: NaiveDate) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let date = date.format("%Y-%m-%d").to_string();

    for result in results {
        writer.serialize(ExportRow {
            date: date.clone(),
            company: &result.job.employer,
            role: &result.job.title,
            score: format!("{:.1}", result.score),
            link: result.job.apply_link.as_deref().unwrap_or(""),
        })?;
    }

    if results.is_empty() {
        writer.write_record(["date", "company", "role", "score", "link"])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Buffer(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

/// `job_matches_YYYYMMDD_HHMMSS.csv`
pub fn export_filename(now: DateTime<Utc>) -> String {
    format!("job_matches_{}.csv", now.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::matching::combiner::ScoreBreakdown;
    use crate::models::job::JobPosting;
    use crate::models::match_result::MatchCategory;

    fn make_result(employer: &str, title: &str, score: f64, link: Option<&str>) -> MatchResult {
        MatchResult {
            rank: 1,
            score,
            category: MatchCategory::from_score(score),
            category_label: MatchCategory::from_score(score).label().to_string(),
            breakdown: ScoreBreakdown::default(),
            job: JobPosting {
                employer: employer.to_string(),
                title: title.to_string(),
                apply_link: link.map(str::to_string),
                ..Default::default()
            },
            job_skills: vec![],
            matched_skills: vec![],
            missing_skills: vec![],
        }
    }

    fn export_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    #[test]
    fn test_csv_header_and_rows() {
        let results = vec![
            make_result("Acme", "Data Engineer", 88.2, Some("https://acme.example/jobs/1")),
            make_result("Globex", "Analyst", 41.0, None),
        ];
        let csv = write_matches_csv(&results, export_date()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "date,company,role,score,link");
        assert_eq!(
            lines[1],
            "2024-03-09,Acme,Data Engineer,88.2,https://acme.example/jobs/1"
        );
        assert_eq!(lines[2], "2024-03-09,Globex,Analyst,41.0,");
    }

    #[test]
    fn test_csv_quotes_commas() {
        let results = vec![make_result("Acme, Inc.", "Engineer", 70.0, None)];
        let csv = write_matches_csv(&results, export_date()).unwrap();
        assert!(csv.contains("\"Acme, Inc.\""));
    }

    #[test]
    fn test_csv_empty_results_has_header_only() {
        let csv = write_matches_csv(&[], export_date()).unwrap();
        assert_eq!(csv.trim_end(), "date,company,role,score,link");
    }

    #[test]
    fn test_export_filename_format() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(export_filename(now), "job_matches_20240309_140507.csv");
    }
}
