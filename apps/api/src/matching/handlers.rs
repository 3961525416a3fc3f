//! Axum route handlers for the Matching API.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::export::{export_filename, write_matches_csv};
use crate::matching::insights::{
    extract_keywords, gap_analysis, match_insights, GapAnalysis, MatchInsights,
};
use crate::models::job::{deserialize_job_batch, JobPosting};
use crate::models::match_result::MatchResult;
use crate::models::resume::Resume;
use crate::state::AppState;

const DEFAULT_KEYWORD_COUNT: usize = 15;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub resume_text: String,
    /// Unreadable entries are kept as empty postings and score zero.
    #[serde(default, deserialize_with = "deserialize_job_batch")]
    pub jobs: Vec<JobPosting>,
    pub top_n: Option<usize>,
    pub min_score: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub request_id: Uuid,
    pub total_jobs: usize,
    pub matches: Vec<MatchResult>,
}

#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub request_id: Uuid,
    pub insights: MatchInsights,
    pub gap_analysis: GapAnalysis,
}

#[derive(Debug, Deserialize)]
pub struct ExtractSkillsRequest {
    pub text: String,
    pub top_k: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ExtractSkillsResponse {
    pub skills: Vec<String>,
    pub keywords: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/matches
///
/// Scores every posting in the request against the resume and returns the
/// ranked matches. An empty resume yields an empty list, not an error.
pub async fn handle_match(
    State(state): State<AppState>,
    payload: Result<Json<MatchRequest>, JsonRejection>,
) -> Result<Json<MatchResponse>, AppError> {
    let Json(request) = payload?;
    let request_id = Uuid::new_v4();
    let (_, matches) = run_match(&state, &request)?;

    info!(
        "Match {request_id}: {} of {} jobs returned",
        matches.len(),
        request.jobs.len()
    );

    Ok(Json(MatchResponse {
        request_id,
        total_jobs: request.jobs.len(),
        matches,
    }))
}

/// POST /api/v1/matches/insights
///
/// Batch statistics and a resume gap analysis over the ranked matches.
pub async fn handle_insights(
    State(state): State<AppState>,
    payload: Result<Json<MatchRequest>, JsonRejection>,
) -> Result<Json<InsightsResponse>, AppError> {
    let Json(request) = payload?;
    let (resume, matches) = run_match(&state, &request)?;
    let insights = match_insights(&matches);
    let gap_analysis = match resume {
        Some(resume) => gap_analysis(&resume, &matches),
        None => GapAnalysis {
            strengths: vec![],
            missing_skills: vec![],
            strength_count: 0,
            missing_count: 0,
        },
    };

    Ok(Json(InsightsResponse {
        request_id: Uuid::new_v4(),
        insights,
        gap_analysis,
    }))
}

/// POST /api/v1/matches/export
///
/// Same matching as `/matches`, returned as a CSV attachment.
pub async fn handle_export(
    State(state): State<AppState>,
    payload: Result<Json<MatchRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload?;
    let (_, matches) = run_match(&state, &request)?;
    let now = Utc::now();
    let csv = write_matches_csv(&matches, now.date_naive())?;
    let disposition = format!("attachment; filename=\"{}\"", export_filename(now));

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}

/// POST /api/v1/skills/extract
///
/// Previews the canonical skills and top keywords the matcher finds in a text.
pub async fn handle_extract_skills(
    payload: Result<Json<ExtractSkillsRequest>, JsonRejection>,
) -> Result<Json<ExtractSkillsResponse>, AppError> {
    let Json(request) = payload?;
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }
    let top_k = request.top_k.unwrap_or(DEFAULT_KEYWORD_COUNT);
    if top_k == 0 {
        return Err(AppError::Validation("top_k must be at least 1".to_string()));
    }

    let skills: Vec<String> = Resume::parse(&request.text)
        .map(|resume| resume.skills.into_iter().collect())
        .unwrap_or_default();
    let keywords = extract_keywords(&request.text, top_k);

    Ok(Json(ExtractSkillsResponse { skills, keywords }))
}

/// Validates paging parameters, filling defaults from config, then runs the
/// matcher. Also hands back the parsed resume (`None` when the text is empty).
fn run_match(
    state: &AppState,
    request: &MatchRequest,
) -> Result<(Option<Resume>, Vec<MatchResult>), AppError> {
    let top_n = request.top_n.unwrap_or(state.config.default_top_n);
    if top_n == 0 {
        return Err(AppError::Validation("top_n must be at least 1".to_string()));
    }

    let min_score = request.min_score.unwrap_or(state.config.default_min_score);
    if !(0.0..=100.0).contains(&min_score) {
        return Err(AppError::Validation(
            "min_score must be between 0 and 100".to_string(),
        ));
    }

    let Some(resume) = Resume::parse(&request.resume_text) else {
        return Ok((None, Vec::new()));
    };
    let matches = state
        .matcher
        .match_resume(&resume, &request.jobs, top_n, min_score);
    Ok((Some(resume), matches))
}
