use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::{MatchEngine, MatchOutcome};
use crate::errors::{AppError, MatchError};
use crate::ingest::{extract_pdf_text, validate_upload};
use crate::models::candidate::CandidateProfile;
use crate::models::document::{Document, DocumentHint};
use crate::models::job::JobPosting;
use crate::models::match_result::{MatchResult, RankedMatches, SkippedDocument};
use crate::scoring::weights::MatchDirection;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    #[serde(default)]
    pub identity: Option<String>,
    pub text: String,
    #[serde(default)]
    pub hint: DocumentHint,
}

#[derive(Debug, Deserialize)]
pub struct MatchJobsRequest {
    pub resume_text: String,
    /// Name reported back as the resume's identity.
    #[serde(default)]
    pub resume_identity: Option<String>,
    pub jobs: Vec<JobPosting>,
    #[serde(default)]
    pub max_results: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct FindCandidatesRequest {
    pub job_description: String,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub job_url: Option<String>,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub candidates: Vec<CandidateProfile>,
    #[serde(default)]
    pub max_results: Option<i64>,
}

/// Documents already produced by the extractor, ranked without re-extraction.
#[derive(Debug, Deserialize)]
pub struct RankRequest {
    pub direction: MatchDirection,
    pub query: Document,
    pub candidates: Vec<Document>,
    #[serde(default)]
    pub max_results: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct JobMatch {
    pub job: JobPosting,
    #[serde(rename = "match")]
    pub match_result: MatchResult,
}

#[derive(Debug, Serialize)]
pub struct CandidateMatch {
    pub candidate: CandidateProfile,
    #[serde(rename = "match")]
    pub match_result: MatchResult,
}

#[derive(Debug, Serialize)]
pub struct SearchParameters {
    pub direction: MatchDirection,
    pub max_results: i64,
    pub candidates_submitted: usize,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub resume_summary: Document,
    pub jobs: Vec<JobMatch>,
    pub total_found: usize,
    pub skipped: Vec<SkippedDocument>,
    pub search_parameters: SearchParameters,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CandidateSearchResponse {
    pub job_summary: Document,
    pub candidates: Vec<CandidateMatch>,
    pub total_found: usize,
    pub skipped: Vec<SkippedDocument>,
    pub search_parameters: SearchParameters,
    pub timestamp: DateTime<Utc>,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Runs CPU-bound engine work on the blocking pool.
async fn run_engine<T, F>(state: &AppState, work: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&MatchEngine) -> Result<T, MatchError> + Send + 'static,
{
    let engine = state.engine.clone();
    tokio::task::spawn_blocking(move || work(engine.as_ref()))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in matching: {e}")))?
        .map_err(AppError::from)
}

fn search_response(
    outcome: MatchOutcome<JobPosting>,
    max_results: i64,
    submitted: usize,
) -> SearchResponse {
    SearchResponse {
        resume_summary: outcome.query,
        jobs: outcome
            .matches
            .into_iter()
            .map(|(job, match_result)| JobMatch { job, match_result })
            .collect(),
        total_found: outcome.total_found,
        skipped: outcome.skipped,
        search_parameters: SearchParameters {
            direction: MatchDirection::ResumeToJob,
            max_results,
            candidates_submitted: submitted,
        },
        timestamp: Utc::now(),
    }
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::Validation(format!("Invalid multipart body: {}", e.body_text()))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/documents/extract
/// Returns the features the engine would use for a piece of text.
pub async fn handle_extract(
    State(state): State<AppState>,
    Json(req): Json<ExtractRequest>,
) -> Result<Json<Document>, AppError> {
    let identity = req.identity.unwrap_or_else(|| "document".to_string());
    let document =
        run_engine(&state, move |engine| engine.extract(&identity, &req.text, &req.hint)).await?;
    Ok(Json(document))
}

/// POST /api/v1/rank
pub async fn handle_rank(
    State(state): State<AppState>,
    Json(req): Json<RankRequest>,
) -> Result<Json<RankedMatches>, AppError> {
    let max_results = state.config.effective_max_results(req.max_results);
    let ranked = run_engine(&state, move |engine| {
        engine.rank(req.direction, &req.query, &req.candidates, max_results)
    })
    .await?;
    Ok(Json(ranked))
}

/// POST /api/v1/match-jobs
pub async fn handle_match_jobs(
    State(state): State<AppState>,
    Json(req): Json<MatchJobsRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    let max_results = state.config.effective_max_results(req.max_results);
    let submitted = req.jobs.len();
    let identity = req.resume_identity.unwrap_or_else(|| "resume".to_string());

    let outcome = run_engine(&state, move |engine| {
        engine.match_resume_to_jobs(&identity, &req.resume_text, &req.jobs, max_results)
    })
    .await?;

    Ok(Json(search_response(outcome, max_results, submitted)))
}

/// POST /api/v1/search-jobs
/// Multipart form: `file` (PDF resume), `jobs` (JSON array of postings), `max_results`.
pub async fn handle_search_jobs(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<SearchResponse>, AppError> {
    let mut upload: Option<(String, Bytes)> = None;
    let mut jobs: Vec<JobPosting> = Vec::new();
    let mut requested: Option<i64> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let data = field.bytes().await.map_err(multipart_error)?;
                upload = Some((file_name, data));
            }
            Some("jobs") => {
                let text = field.text().await.map_err(multipart_error)?;
                jobs = serde_json::from_str(&text)
                    .map_err(|e| AppError::Validation(format!("Invalid jobs JSON: {e}")))?;
            }
            Some("max_results") => {
                let text = field.text().await.map_err(multipart_error)?;
                let value = text.trim().parse::<i64>().map_err(|_| {
                    AppError::Validation(format!("max_results must be an integer, got '{text}'"))
                })?;
                requested = Some(value);
            }
            _ => {}
        }
    }

    let (file_name, data) =
        upload.ok_or_else(|| AppError::Validation("Missing 'file' field".to_string()))?;
    validate_upload(&file_name, data.len(), state.config.max_upload_bytes)?;
    let resume_text = extract_pdf_text(file_name.clone(), data).await?;

    let max_results = state.config.effective_max_results(requested);
    let submitted = jobs.len();
    let outcome = run_engine(&state, move |engine| {
        engine.match_resume_to_jobs(&file_name, &resume_text, &jobs, max_results)
    })
    .await?;

    Ok(Json(search_response(outcome, max_results, submitted)))
}

/// POST /api/v1/find-candidates
pub async fn handle_find_candidates(
    State(state): State<AppState>,
    Json(req): Json<FindCandidatesRequest>,
) -> Result<Json<CandidateSearchResponse>, AppError> {
    let max_results = state.config.effective_max_results(req.max_results);
    let submitted = req.candidates.len();

    let identity = req.job_url.clone().unwrap_or_else(|| "job".to_string());
    let hint = DocumentHint {
        titles: req.job_title.iter().cloned().collect(),
        skills: req.required_skills.clone(),
        location: req.location.clone(),
        ..DocumentHint::default()
    };
    let job_text = match &req.job_title {
        Some(title) => format!("{title}\n{}", req.job_description),
        None => req.job_description.clone(),
    };

    let outcome = run_engine(&state, move |engine| {
        engine.match_job_to_candidates(&identity, &job_text, &hint, &req.candidates, max_results)
    })
    .await?;

    Ok(Json(CandidateSearchResponse {
        job_summary: outcome.query,
        candidates: outcome
            .matches
            .into_iter()
            .map(|(candidate, match_result)| CandidateMatch {
                candidate,
                match_result,
            })
            .collect(),
        total_found: outcome.total_found,
        skipped: outcome.skipped,
        search_parameters: SearchParameters {
            direction: MatchDirection::JobToCandidate,
            max_results,
            candidates_submitted: submitted,
        },
        timestamp: Utc::now(),
    }))
}
