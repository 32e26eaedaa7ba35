use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::job::{JobStatus, LogoJob};

const JOB_COLUMNS: &str = "id, user_id, status, prompt, style, logo_url, error_message, \
                           result_message, created_at, updated_at, completed_at";

fn row_to_job(row: &sqlx::postgres::PgRow) -> Result<LogoJob, sqlx::Error> {
    let status_str: String = row.try_get("status")?;
    let status = status_str.parse().unwrap_or(JobStatus::Pending);

    Ok(LogoJob {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        status,
        prompt: row.try_get("prompt")?,
        style: row.try_get("style")?,
        logo_url: row.try_get("logo_url")?,
        error_message: row.try_get("error_message")?,
        result_message: row.try_get("result_message")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        completed_at: row.try_get("completed_at")?,
    })
}

/// Insert a new pending logo job
pub async fn create_job(
    pool: &PgPool,
    user_id: &str,
    prompt: Option<&str>,
    style: Option<&str>,
) -> Result<LogoJob, sqlx::Error> {
    let row = sqlx::query(&format!(
        r#"
        INSERT INTO logo_jobs (user_id, status, prompt, style)
        VALUES ($1, 'pending', $2, $3)
        RETURNING {JOB_COLUMNS}
        "#,
    ))
    .bind(user_id)
    .bind(prompt)
    .bind(style)
    .fetch_one(pool)
    .await?;

    row_to_job(&row)
}

/// Get a job by ID
pub async fn get_job(pool: &PgPool, job_id: Uuid) -> Result<Option<LogoJob>, sqlx::Error> {
    let row = sqlx::query(&format!(
        r#"
        SELECT {JOB_COLUMNS}
        FROM logo_jobs
        WHERE id = $1
        "#,
    ))
    .bind(job_id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(row_to_job).transpose()
}

/// List a user's jobs, newest first
pub async fn list_user_jobs(
    pool: &PgPool,
    user_id: &str,
    limit: i64,
) -> Result<Vec<LogoJob>, sqlx::Error> {
    let rows = sqlx::query(&format!(
        r#"
        SELECT {JOB_COLUMNS}
        FROM logo_jobs
        WHERE user_id = $1
        ORDER BY created_at DESC
        LIMIT $2
        "#,
    ))
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.iter().map(row_to_job).collect()
}

/// Mark a job as processing
pub async fn mark_processing(pool: &PgPool, job_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE logo_jobs
        SET status = 'processing',
            processing_started_at = NOW(),
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(job_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Terminal success: record the public logo URL
pub async fn mark_done(
    pool: &PgPool,
    job_id: Uuid,
    logo_url: &str,
    result_message: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE logo_jobs
        SET status = 'done',
            logo_url = $1,
            result_message = $2,
            error_message = NULL,
            completed_at = NOW(),
            updated_at = NOW()
        WHERE id = $3
        "#,
    )
    .bind(logo_url)
    .bind(result_message)
    .bind(job_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Terminal failure: record the error message
pub async fn mark_failed(
    pool: &PgPool,
    job_id: Uuid,
    error_message: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE logo_jobs
        SET status = 'failed',
            error_message = $1,
            completed_at = NOW(),
            updated_at = NOW()
        WHERE id = $2
        "#,
    )
    .bind(error_message)
    .bind(job_id)
    .execute(pool)
    .await?;

    Ok(())
}
