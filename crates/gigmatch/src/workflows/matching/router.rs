use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::json;

use super::domain::{FreelancerId, JobId, MatchResult};
use super::repository::{FreelancerDirectory, JobDirectory, MatchRepository, NotificationPublisher};
use super::service::{MatchingError, MatchingService, ReviewError};

type SharedService<J, F, M, N> = Arc<MatchingService<J, F, M, N>>;

/// Public shape of a stored match.
#[derive(Debug, Clone, Serialize)]
pub struct MatchView {
    pub job_id: JobId,
    pub freelancer_id: FreelancerId,
    pub score: u32,
    pub status: &'static str,
}

impl From<&MatchResult> for MatchView {
    fn from(record: &MatchResult) -> Self {
        Self {
            job_id: record.job_id.clone(),
            freelancer_id: record.freelancer_id.clone(),
            score: record.score,
            status: record.status_label(),
        }
    }
}

fn views(records: &[MatchResult]) -> Vec<MatchView> {
    records.iter().map(MatchView::from).collect()
}

/// Router exposing job moderation, matching runs, and match review.
pub fn matching_router<J, F, M, N>(service: SharedService<J, F, M, N>) -> Router
where
    J: JobDirectory + 'static,
    F: FreelancerDirectory + 'static,
    M: MatchRepository + 'static,
    N: NotificationPublisher + 'static,
{
    Router::new()
        .route("/api/v1/jobs/pending", get(pending_jobs_handler::<J, F, M, N>))
        .route(
            "/api/v1/jobs/:job_id/approve",
            post(approve_job_handler::<J, F, M, N>),
        )
        .route(
            "/api/v1/jobs/:job_id/matches",
            post(run_matching_handler::<J, F, M, N>).get(job_matches_handler::<J, F, M, N>),
        )
        .route(
            "/api/v1/freelancers/:freelancer_id/matches",
            get(freelancer_matches_handler::<J, F, M, N>),
        )
        .route(
            "/api/v1/matches/pending",
            get(pending_matches_handler::<J, F, M, N>),
        )
        .route(
            "/api/v1/matches/:job_id/:freelancer_id/approve",
            post(approve_match_handler::<J, F, M, N>),
        )
        .route(
            "/api/v1/matches/:job_id/:freelancer_id",
            axum::routing::delete(reject_match_handler::<J, F, M, N>),
        )
        .with_state(service)
}

pub(crate) async fn run_matching_handler<J, F, M, N>(
    State(service): State<SharedService<J, F, M, N>>,
    Path(job_id): Path<String>,
) -> Response
where
    J: JobDirectory + 'static,
    F: FreelancerDirectory + 'static,
    M: MatchRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.run_matching(&JobId(job_id)).await {
        Ok(batch) => (StatusCode::OK, axum::Json(batch)).into_response(),
        Err(error) => matching_error_response(error),
    }
}

pub(crate) async fn approve_job_handler<J, F, M, N>(
    State(service): State<SharedService<J, F, M, N>>,
    Path(job_id): Path<String>,
) -> Response
where
    J: JobDirectory + 'static,
    F: FreelancerDirectory + 'static,
    M: MatchRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.approve_job(&JobId(job_id)).await {
        Ok(batch) => (StatusCode::ACCEPTED, axum::Json(batch)).into_response(),
        Err(error) => review_error_response(error),
    }
}

pub(crate) async fn pending_jobs_handler<J, F, M, N>(
    State(service): State<SharedService<J, F, M, N>>,
) -> Response
where
    J: JobDirectory + 'static,
    F: FreelancerDirectory + 'static,
    M: MatchRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.pending_jobs().await {
        Ok(jobs) => (StatusCode::OK, axum::Json(jobs)).into_response(),
        Err(error) => review_error_response(error),
    }
}

pub(crate) async fn job_matches_handler<J, F, M, N>(
    State(service): State<SharedService<J, F, M, N>>,
    Path(job_id): Path<String>,
) -> Response
where
    J: JobDirectory + 'static,
    F: FreelancerDirectory + 'static,
    M: MatchRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.approved_matches_for_job(&JobId(job_id)).await {
        Ok(records) => (StatusCode::OK, axum::Json(views(&records))).into_response(),
        Err(error) => review_error_response(error),
    }
}

pub(crate) async fn freelancer_matches_handler<J, F, M, N>(
    State(service): State<SharedService<J, F, M, N>>,
    Path(freelancer_id): Path<String>,
) -> Response
where
    J: JobDirectory + 'static,
    F: FreelancerDirectory + 'static,
    M: MatchRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service
        .matches_for_freelancer(&FreelancerId(freelancer_id))
        .await
    {
        Ok(records) => (StatusCode::OK, axum::Json(views(&records))).into_response(),
        Err(error) => review_error_response(error),
    }
}

pub(crate) async fn pending_matches_handler<J, F, M, N>(
    State(service): State<SharedService<J, F, M, N>>,
) -> Response
where
    J: JobDirectory + 'static,
    F: FreelancerDirectory + 'static,
    M: MatchRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.pending_matches().await {
        Ok(records) => (StatusCode::OK, axum::Json(views(&records))).into_response(),
        Err(error) => review_error_response(error),
    }
}

pub(crate) async fn approve_match_handler<J, F, M, N>(
    State(service): State<SharedService<J, F, M, N>>,
    Path((job_id, freelancer_id)): Path<(String, String)>,
) -> Response
where
    J: JobDirectory + 'static,
    F: FreelancerDirectory + 'static,
    M: MatchRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service
        .approve_match(&JobId(job_id), &FreelancerId(freelancer_id))
        .await
    {
        Ok(record) => (StatusCode::OK, axum::Json(MatchView::from(&record))).into_response(),
        Err(error) => review_error_response(error),
    }
}

pub(crate) async fn reject_match_handler<J, F, M, N>(
    State(service): State<SharedService<J, F, M, N>>,
    Path((job_id, freelancer_id)): Path<(String, String)>,
) -> Response
where
    J: JobDirectory + 'static,
    F: FreelancerDirectory + 'static,
    M: MatchRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service
        .reject_match(&JobId(job_id), &FreelancerId(freelancer_id))
        .await
    {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => review_error_response(error),
    }
}

pub(crate) fn matching_error_response(error: MatchingError) -> Response {
    let message = error.to_string();
    match error {
        MatchingError::NotFound { job_id } => {
            let payload = json!({ "error": message, "job_id": job_id });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        MatchingError::UpstreamUnavailable { upstream, .. } => {
            let payload = json!({ "error": message, "upstream": upstream });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
        MatchingError::PartialWriteFailure {
            job_id,
            written,
            failed,
        } => {
            let payload = json!({
                "error": message,
                "job_id": job_id,
                "written": written,
                "failed": failed,
            });
            (StatusCode::BAD_GATEWAY, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) fn review_error_response(error: ReviewError) -> Response {
    if let ReviewError::Matching(inner) = error {
        return matching_error_response(inner);
    }

    let status = if error.is_not_found() {
        StatusCode::NOT_FOUND
    } else if error.is_timed_out() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
