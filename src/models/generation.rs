use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::job::{JobStatus, LogoJob};

/// Request for a creative logo prompt ("Surprise me").
#[derive(Debug, Deserialize, Validate)]
pub struct PromptRequest {
    #[garde(inner(length(max = 100)))]
    pub style: Option<String>,
}

/// Response carrying the generated (or fallback) prompt.
#[derive(Debug, Serialize)]
pub struct PromptResponse {
    pub prompt: String,
}

/// Request to submit a logo generation job.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateJobRequest {
    #[garde(length(min = 1, max = 128))]
    pub user_id: String,

    #[garde(inner(length(max = 500)))]
    pub prompt: Option<String>,

    #[garde(inner(length(max = 100)))]
    pub style: Option<String>,
}

/// Response after submitting a job.
#[derive(Debug, Serialize)]
pub struct CreateJobResponse {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub message: String,
}

/// Response for querying job status (single job or history listing).
#[derive(Debug, Serialize)]
pub struct JobStatusResponse {
    pub job_id: Uuid,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<LogoJob> for JobStatusResponse {
    fn from(job: LogoJob) -> Self {
        Self {
            job_id: job.id,
            status: job.status,
            logo_url: job.logo_url,
            error_message: job.error_message,
            created_at: job.created_at,
            completed_at: job.completed_at,
        }
    }
}
