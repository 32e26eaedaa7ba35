use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Server bind address (e.g., "0.0.0.0:3000"). Optional for worker processes.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// PostgreSQL connection string
    pub database_url: String,

    /// Redis connection string for job queue
    pub redis_url: String,

    /// Groq API key for prompt generation
    pub groq_api_key: String,

    /// Groq chat-completion model
    #[serde(default = "default_groq_model")]
    pub groq_model: String,

    /// Groq API base URL (override for testing)
    #[serde(default = "default_groq_base_url")]
    pub groq_base_url: String,

    /// Pollinations image API base URL (override for testing)
    #[serde(default = "default_pollinations_base_url")]
    pub pollinations_base_url: String,

    /// Generated image width in pixels
    #[serde(default = "default_image_dimension")]
    pub image_width: u32,

    /// Generated image height in pixels
    #[serde(default = "default_image_dimension")]
    pub image_height: u32,

    /// Storage bucket name
    pub storage_bucket: String,

    /// Storage access key ID (S3-compatible)
    pub storage_access_key: String,

    /// Storage secret access key (S3-compatible)
    pub storage_secret_key: String,

    /// Storage endpoint URL
    pub storage_endpoint: String,

    /// Public base URL under which stored objects are served
    pub public_url_base: String,

    /// Probability [0.0, 1.0] of failing a job after a successful generation.
    /// Demo toggle for exercising failure-handling UI; disabled by default.
    #[serde(default)]
    pub demo_failure_rate: f64,

    /// Bind address for the worker's own Prometheus scrape listener. The
    /// worker runs in a separate process, so its metrics cannot be served
    /// from the API server's /metrics endpoint.
    #[serde(default = "default_worker_metrics_addr")]
    pub worker_metrics_addr: String,
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_groq_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_groq_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_pollinations_base_url() -> String {
    "https://image.pollinations.ai/prompt".to_string()
}

fn default_image_dimension() -> u32 {
    512
}

fn default_worker_metrics_addr() -> String {
    "0.0.0.0:9091".to_string()
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }
}
