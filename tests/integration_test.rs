use logoforge::{
    config::AppConfig,
    db::{self, queries},
    models::job::JobStatus,
    services::{
        queue::{JobQueue, QueuedJob},
        storage::{logo_key, StorageClient},
    },
};

/// Integration test: job lifecycle across Postgres, Redis, and storage.
///
/// Verifies:
/// 1. Database connection, migrations, and job CRUD
/// 2. Queue enqueue/dequeue/complete
/// 3. Storage upload/download/delete and public URL shape
/// 4. Terminal transitions (done and failed)
///
/// Requires running PostgreSQL, Redis, and S3-compatible storage configured
/// via environment variables.
#[tokio::test]
#[ignore] // Run with: cargo test --test integration_test -- --ignored
async fn test_job_lifecycle() {
    let config = AppConfig::from_env().expect("Failed to load config");

    let db_pool = db::init_pool(&config.database_url)
        .await
        .expect("Failed to connect to database");

    db::run_migrations(&db_pool)
        .await
        .expect("Failed to run migrations");

    let storage = StorageClient::new(
        &config.storage_bucket,
        &config.storage_endpoint,
        &config.storage_access_key,
        &config.storage_secret_key,
        &config.public_url_base,
    )
    .expect("Failed to initialize storage");

    let queue = JobQueue::new(&config.redis_url).expect("Failed to initialize queue");

    // 1. Create a pending job
    let job = queries::create_job(
        &db_pool,
        "test-user",
        Some("a minimalist mountain logo"),
        Some("Minimal"),
    )
    .await
    .expect("Failed to create job");

    assert_eq!(job.status, JobStatus::Pending);
    assert_eq!(job.prompt.as_deref(), Some("a minimalist mountain logo"));
    assert!(job.logo_url.is_none());

    // 2. Queue round trip
    let queued = QueuedJob {
        job_id: job.id,
        user_id: job.user_id.clone(),
        prompt: job.prompt.clone(),
        style: job.style.clone(),
    };

    queue.enqueue(&queued).await.expect("Failed to enqueue");

    let dequeued = queue
        .dequeue()
        .await
        .expect("Failed to dequeue")
        .expect("No job in queue");

    assert_eq!(dequeued.job_id, job.id);
    assert_eq!(dequeued.prompt.as_deref(), Some("a minimalist mountain logo"));

    // 3. Storage write/read with the job's key
    let key = logo_key(&job.user_id, job.id);
    let fake_png = vec![0x89, b'P', b'N', b'G', 0, 1, 2, 3];

    storage
        .upload_logo(&key, &fake_png)
        .await
        .expect("Upload failed");

    let downloaded = storage.download(&key).await.expect("Download failed");
    assert_eq!(downloaded, fake_png);

    let url = storage.public_url(&key);
    assert!(url.ends_with(&format!("{}.png", job.id)));

    // 4. Processing then done
    queries::mark_processing(&db_pool, job.id)
        .await
        .expect("Failed to mark processing");

    let processing = queries::get_job(&db_pool, job.id)
        .await
        .expect("Failed to get job")
        .expect("Job not found");
    assert_eq!(processing.status, JobStatus::Processing);

    queries::mark_done(&db_pool, job.id, &url, "Generated via Pollinations")
        .await
        .expect("Failed to mark done");

    let done = queries::get_job(&db_pool, job.id)
        .await
        .expect("Failed to get job")
        .expect("Job not found");

    assert_eq!(done.status, JobStatus::Done);
    assert_eq!(done.logo_url.as_deref(), Some(url.as_str()));
    assert!(done.completed_at.is_some());

    // 5. Failed path on a second job
    let failed_job = queries::create_job(&db_pool, "test-user", None, Some("No Style"))
        .await
        .expect("Failed to create job");

    queries::mark_failed(&db_pool, failed_job.id, "Prompt missing")
        .await
        .expect("Failed to mark failed");

    let failed = queries::get_job(&db_pool, failed_job.id)
        .await
        .expect("Failed to get job")
        .expect("Job not found");

    assert_eq!(failed.status, JobStatus::Failed);
    assert_eq!(failed.error_message.as_deref(), Some("Prompt missing"));
    assert!(failed.completed_at.is_some());

    // 6. History listing: newest first, both jobs present
    let history = queries::list_user_jobs(&db_pool, "test-user", 50)
        .await
        .expect("Failed to list jobs");
    assert!(history.len() >= 2);
    assert!(history.windows(2).all(|w| w[0].created_at >= w[1].created_at));

    // Cleanup
    storage.delete(&key).await.expect("Failed to delete object");
    queue.complete(&dequeued).await.expect("Failed to complete");
}
