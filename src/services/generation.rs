//! The logo generation pipeline run by the worker for each dequeued job.

use crate::models::job::resolve_prompt;
use crate::services::images::{reencode_png, ImageGenError, PollinationsClient};
use crate::services::queue::QueuedJob;
use crate::services::storage::{logo_key, StorageClient, StorageError};

/// Generate a logo for a job and store it, returning the public URL.
///
/// Prompt resolution happens first: a job with neither a prompt nor a usable
/// style fails with [`GenerationError::PromptMissing`] before any outbound
/// request is made. Every error is terminal for the job; the worker records
/// the error's display string as the job's `error_message`.
pub async fn generate_and_store(
    images: &PollinationsClient,
    storage: &StorageClient,
    job: &QueuedJob,
) -> Result<String, GenerationError> {
    let prompt = resolve_prompt(job.prompt.as_deref(), job.style.as_deref())
        .ok_or(GenerationError::PromptMissing)?;

    tracing::debug!(job_id = %job.job_id, prompt = %prompt, "Requesting image from Pollinations");
    let raw_bytes = images.generate(&prompt, None).await?;

    // The endpoint sometimes answers 200 with a JSON error body; decoding is
    // the only reliable check that we actually got an image.
    tracing::debug!(job_id = %job.job_id, bytes = raw_bytes.len(), "Re-encoding image as PNG");
    let png = reencode_png(&raw_bytes)?;

    let key = logo_key(&job.user_id, job.job_id);
    tracing::debug!(job_id = %job.job_id, key = %key, "Uploading logo to storage");
    storage.upload_logo(&key, &png).await?;

    Ok(storage.public_url(&key))
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Neither a prompt nor a usable style on the job.
    #[error("Prompt missing")]
    PromptMissing,

    #[error(transparent)]
    Image(#[from] ImageGenError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
