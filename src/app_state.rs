use sqlx::PgPool;
use std::sync::Arc;

use crate::services::{
    images::PollinationsClient, prompts::GroqClient, queue::JobQueue, storage::StorageClient,
};

/// Shared application state passed to all route handlers and the worker.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub storage: Arc<StorageClient>,
    pub queue: Arc<JobQueue>,
    pub prompts: Arc<GroqClient>,
    pub images: Arc<PollinationsClient>,
}

impl AppState {
    pub fn new(
        db: PgPool,
        storage: StorageClient,
        queue: JobQueue,
        prompts: GroqClient,
        images: PollinationsClient,
    ) -> Self {
        Self {
            db,
            storage: Arc::new(storage),
            queue: Arc::new(queue),
            prompts: Arc::new(prompts),
            images: Arc::new(images),
        }
    }
}
