//! JobMatcher — scores a batch of postings against one resume and ranks them.
//!
//! Pure and synchronous: no I/O, no shared mutable state. A failure while
//! scoring one posting zeroes that posting and the batch carries on.

use std::collections::HashSet;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::matching::combiner::{combine, skill_bonus, ScoreBreakdown, ScoringWeights};
use crate::matching::ranker::rank_results;
use crate::matching::skills::skill_key;
use crate::matching::subscores::{
    experience_match_score, location_match_score, skill_match_score, title_match_score,
    NEUTRAL_SCORE,
};
use crate::matching::tfidf::{description_similarities, TfidfConfig};
use crate::matching::MatchError;
use crate::models::job::JobPosting;
use crate::models::match_result::{MatchCategory, MatchResult};
use crate::models::resume::Resume;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MatcherConfig {
    pub weights: ScoringWeights,
    pub tfidf: TfidfConfig,
}

#[derive(Debug, Clone, Default)]
pub struct JobMatcher {
    config: MatcherConfig,
}

impl JobMatcher {
    /// Rejects configurations the scorer cannot honor: an n-gram range that
    /// starts at zero or runs backwards, a zero feature cap, and negative or
    /// non-finite weights.
    pub fn new(config: MatcherConfig) -> Result<Self, MatchError> {
        let (min_n, max_n) = config.tfidf.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(MatchError::InvalidNgramRange { min: min_n, max: max_n });
        }
        if config.tfidf.max_features == 0 {
            return Err(MatchError::ZeroMaxFeatures);
        }
        let w = config.weights;
        for (name, value) in [
            ("skills", w.skills),
            ("title", w.title),
            ("description", w.description),
            ("experience", w.experience),
            ("location", w.location),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(MatchError::InvalidWeight(name));
            }
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Ranked matches of `jobs` against `resume_text`.
    ///
    /// Empty resume text yields no results. Results under `min_score` are
    /// dropped and at most `top_n` are returned.
    pub fn match_jobs(
        &self,
        resume_text: &str,
        jobs: &[JobPosting],
        top_n: usize,
        min_score: f64,
    ) -> Vec<MatchResult> {
        let Some(resume) = Resume::parse(resume_text) else {
            info!("Empty resume text, returning no matches");
            return Vec::new();
        };
        self.match_resume(&resume, jobs, top_n, min_score)
    }

    /// Same as [`JobMatcher::match_jobs`] for an already-parsed resume.
    pub fn match_resume(
        &self,
        resume: &Resume,
        jobs: &[JobPosting],
        top_n: usize,
        min_score: f64,
    ) -> Vec<MatchResult> {
        if jobs.is_empty() {
            return Vec::new();
        }
        let started = Instant::now();

        let documents: Vec<String> = jobs.iter().map(JobPosting::document_text).collect();
        let description_scores =
            match description_similarities(&resume.text, &documents, self.config.tfidf) {
                Ok(scores) => scores,
                Err(e) => {
                    warn!("Description similarity unavailable, using neutral score: {e}");
                    vec![NEUTRAL_SCORE; jobs.len()]
                }
            };

        let scored: Vec<MatchResult> = jobs
            .iter()
            .zip(description_scores)
            .enumerate()
            .map(|(index, (job, description))| {
                self.score_job(resume, job, description).unwrap_or_else(|e| {
                    warn!("Scoring failed for job #{index} ({}): {e}", job.title);
                    zero_result(job)
                })
            })
            .collect();

        let ranked = rank_results(scored, top_n, min_score);

        debug!(
            "Matched {} jobs in {:?}: {} kept (top_n={top_n}, min_score={min_score})",
            jobs.len(),
            started.elapsed(),
            ranked.len()
        );

        ranked
    }

    /// Full breakdown for one posting given its precomputed description score.
    pub fn score_job(
        &self,
        resume: &Resume,
        job: &JobPosting,
        description_score: f64,
    ) -> Result<MatchResult, MatchError> {
        if job.title.trim().is_empty() && job.description.trim().is_empty() {
            return Err(MatchError::MalformedJob(
                "posting has neither title nor description".to_string(),
            ));
        }
        if !description_score.is_finite() {
            return Err(MatchError::NonFiniteScore("description"));
        }

        let job_skills = job.effective_skills();
        let resume_keys: HashSet<String> = resume.skills.iter().map(|s| skill_key(s)).collect();
        let (matched_skills, missing_skills): (Vec<String>, Vec<String>) = job_skills
            .iter()
            .cloned()
            .partition(|skill| resume_keys.contains(&skill_key(skill)));

        let mut breakdown = ScoreBreakdown {
            skills: skill_match_score(&resume.skills, &job_skills),
            title: title_match_score(&job.title, resume),
            description: description_score.clamp(0.0, 100.0),
            experience: experience_match_score(job, resume),
            location: location_match_score(job, resume),
            bonus: skill_bonus(&matched_skills),
            total: 0.0,
        };
        let score = combine(&mut breakdown, &self.config.weights);
        let category = MatchCategory::from_score(score);

        Ok(MatchResult {
            rank: 0,
            score,
            category,
            category_label: category.label().to_string(),
            breakdown,
            job: job.clone(),
            job_skills,
            matched_skills,
            missing_skills,
        })
    }
}

fn zero_result(job: &JobPosting) -> MatchResult {
    let job_skills = job.effective_skills();
    MatchResult {
        rank: 0,
        score: 0.0,
        category: MatchCategory::Basic,
        category_label: MatchCategory::Basic.label().to_string(),
        breakdown: ScoreBreakdown::default(),
        job: job.clone(),
        missing_skills: job_skills.clone(),
        job_skills,
        matched_skills: Vec::new(),
    }
}
