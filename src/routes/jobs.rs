use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use garde::Validate;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::db::queries;
use crate::models::generation::{CreateJobRequest, CreateJobResponse, JobStatusResponse};
use crate::services::queue::QueuedJob;

const HISTORY_LIMIT: i64 = 50;

/// POST /api/v1/jobs — Submit a logo generation job.
///
/// Creates the pending record and enqueues it for the worker. A job without a
/// usable prompt or style is still accepted; the worker marks it failed,
/// keeping prompt validation in one place.
pub async fn submit_job(
    State(state): State<AppState>,
    Json(request): Json<CreateJobRequest>,
) -> Result<Json<CreateJobResponse>, StatusCode> {
    request.validate().map_err(|_| StatusCode::BAD_REQUEST)?;

    let job = queries::create_job(
        &state.db,
        &request.user_id,
        request.prompt.as_deref(),
        request.style.as_deref(),
    )
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to create job record");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let queued = QueuedJob {
        job_id: job.id,
        user_id: job.user_id.clone(),
        prompt: job.prompt.clone(),
        style: job.style.clone(),
    };

    state.queue.enqueue(&queued).await.map_err(|e| {
        tracing::error!(job_id = %job.id, error = %e, "Failed to enqueue job");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    metrics::counter!("logo_jobs_total").increment(1);

    tracing::info!(job_id = %job.id, user_id = %job.user_id, "Logo job submitted");

    Ok(Json(CreateJobResponse {
        job_id: job.id,
        status: job.status,
        message: "Logo generation job submitted".to_string(),
    }))
}

/// GET /api/v1/jobs/{job_id} — Check job status.
pub async fn get_job_status(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobStatusResponse>, StatusCode> {
    let job = queries::get_job(&state.db, job_id)
        .await
        .map_err(|e| {
            tracing::error!(job_id = %job_id, error = %e, "Failed to load job");
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(job.into()))
}

/// GET /api/v1/users/{user_id}/jobs — A user's generation history, newest first.
pub async fn list_user_jobs(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<JobStatusResponse>>, StatusCode> {
    let jobs = queries::list_user_jobs(&state.db, &user_id, HISTORY_LIMIT)
        .await
        .map_err(|e| {
            tracing::error!(user_id = %user_id, error = %e, "Failed to list jobs");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(jobs.into_iter().map(Into::into).collect()))
}
