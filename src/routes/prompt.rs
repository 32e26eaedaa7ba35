use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use garde::Validate;

use crate::app_state::AppState;
use crate::models::generation::{PromptRequest, PromptResponse};

/// POST /api/v1/prompt — Generate a creative logo prompt ("Surprise me").
///
/// Availability over correctness: the prompt service falls back to a fixed
/// prompt on any upstream failure, so this handler only fails on bad input.
pub async fn generate_prompt(
    State(state): State<AppState>,
    Json(request): Json<PromptRequest>,
) -> Result<Json<PromptResponse>, StatusCode> {
    request.validate().map_err(|_| StatusCode::BAD_REQUEST)?;

    metrics::counter!("prompt_requests_total").increment(1);

    let prompt = state.prompts.creative_prompt(request.style.as_deref()).await;

    Ok(Json(PromptResponse { prompt }))
}
