use logoforge::{
    app_state::AppState,
    config::AppConfig,
    db::{self, queries},
    services::{
        generation::{self, GenerationError},
        images::PollinationsClient,
        prompts::GroqClient,
        queue::{JobQueue, QueuedJob},
        storage::StorageClient,
    },
};
use metrics_exporter_prometheus::PrometheusBuilder;
use rand::Rng;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::time::sleep;
use tracing_subscriber::EnvFilter;

const POLL_INTERVAL_MS: u64 = 1000; // 1 second
const RESULT_MESSAGE: &str = "Generated via Pollinations";

/// Demo toggle: fails a configurable fraction of jobs after a successful
/// generation so failure-handling UI can be exercised. Off by default.
struct DemoFailure {
    rate: f64,
}

impl DemoFailure {
    fn new(rate: f64) -> Self {
        Self {
            rate: rate.clamp(0.0, 1.0),
        }
    }

    fn triggered(&self) -> bool {
        self.rate > 0.0 && rand::rng().random::<f64>() < self.rate
    }
}

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting logo generation worker");

    // Load configuration
    let config = AppConfig::from_env().expect("Failed to load configuration");

    // The worker is a separate process from the API server, so it exposes
    // its own Prometheus scrape listener for job-outcome metrics.
    let metrics_addr: SocketAddr = config
        .worker_metrics_addr
        .parse()
        .expect("Invalid WORKER_METRICS_ADDR");
    PrometheusBuilder::new()
        .with_http_listener(metrics_addr)
        .install()
        .expect("Failed to install Prometheus metrics recorder");

    metrics::describe_counter!("logo_jobs_completed", "Total logo jobs finished as done");
    metrics::describe_counter!("logo_jobs_failed", "Total logo jobs finished as failed");
    metrics::describe_histogram!(
        "logo_generation_seconds",
        "Time to process a logo generation job"
    );
    metrics::describe_gauge!(
        "logo_queue_depth",
        "Current number of pending jobs in the queue"
    );

    tracing::info!(addr = %metrics_addr, "Worker metrics listener installed");

    // Initialize database
    tracing::info!("Connecting to PostgreSQL");
    let db_pool = db::init_pool(&config.database_url)
        .await
        .expect("Failed to connect to database");

    // Initialize services
    tracing::info!("Initializing services");
    let storage = StorageClient::new(
        &config.storage_bucket,
        &config.storage_endpoint,
        &config.storage_access_key,
        &config.storage_secret_key,
        &config.public_url_base,
    )
    .expect("Failed to initialize storage client");

    let queue = JobQueue::new(&config.redis_url).expect("Failed to initialize job queue");

    let prompts = GroqClient::new(&config.groq_api_key, &config.groq_model, &config.groq_base_url);

    let images = PollinationsClient::new(
        &config.pollinations_base_url,
        config.image_width,
        config.image_height,
    )
    .expect("Failed to initialize Pollinations client");

    let demo_failure = DemoFailure::new(config.demo_failure_rate);
    if demo_failure.rate > 0.0 {
        tracing::warn!(rate = demo_failure.rate, "Randomized demo failures enabled");
    }

    let state = AppState::new(db_pool, storage, queue, prompts, images);

    tracing::info!("Worker ready, starting job processing loop");

    // Main processing loop
    loop {
        match process_next_job(&state, &demo_failure).await {
            Ok(true) => {
                tracing::debug!("Job processed, checking for next job");
            }
            Ok(false) => {
                tracing::trace!("No jobs available, sleeping");
                sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Error processing job");
                sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
            }
        }

        if let Ok(depth) = state.queue.queue_depth().await {
            metrics::gauge!("logo_queue_depth").set(depth as f64);
        }
    }
}

/// Process the next job from the queue.
/// Returns Ok(true) if a job was processed, Ok(false) if no job available.
///
/// Every pipeline error is terminal: the job record gets one transition to
/// done or failed, with no retry. A re-delivered job regenerates and
/// overwrites the stored image; that is expected, not deduplicated.
async fn process_next_job(
    state: &AppState,
    demo_failure: &DemoFailure,
) -> Result<bool, Box<dyn std::error::Error>> {
    let job = match state.queue.dequeue().await? {
        Some(j) => j,
        None => return Ok(false),
    };

    tracing::info!(
        job_id = %job.job_id,
        user_id = %job.user_id,
        "Processing logo generation job"
    );

    queries::mark_processing(&state.db, job.job_id).await?;

    let start = std::time::Instant::now();

    match generation::generate_and_store(&state.images, &state.storage, &job).await {
        Ok(logo_url) => {
            metrics::histogram!("logo_generation_seconds").record(start.elapsed().as_secs_f64());

            if demo_failure.triggered() {
                tracing::warn!(job_id = %job.job_id, "Randomized demo failure triggered");
                finish_failed(state, &job, "Randomized failure test").await?;
                return Ok(true);
            }

            queries::mark_done(&state.db, job.job_id, &logo_url, RESULT_MESSAGE).await?;
            state.queue.complete(&job).await?;
            metrics::counter!("logo_jobs_completed").increment(1);

            tracing::info!(
                job_id = %job.job_id,
                logo_url = %logo_url,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Job completed successfully"
            );
        }
        Err(e) => {
            match &e {
                GenerationError::PromptMissing => {
                    tracing::warn!(job_id = %job.job_id, "Job has no usable prompt or style");
                }
                other => {
                    tracing::error!(job_id = %job.job_id, error = %other, "Job processing failed");
                }
            }
            finish_failed(state, &job, &e.to_string()).await?;
        }
    }

    Ok(true)
}

/// Record a terminal failure and release the queue entry.
async fn finish_failed(
    state: &AppState,
    job: &QueuedJob,
    message: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    queries::mark_failed(&state.db, job.job_id, message).await?;
    state.queue.complete(job).await?;
    metrics::counter!("logo_jobs_failed").increment(1);
    Ok(())
}
