//! Outbound-API behavior tests using in-process stub servers.
//!
//! These cover the error-detection paths that matter in production: the
//! image endpoint answering with a JSON body instead of image bytes, non-2xx
//! statuses, and the prompt generator's never-fail fallback policy.

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

use logoforge::services::generation::{self, GenerationError};
use logoforge::services::images::{self, ImageGenError, PollinationsClient};
use logoforge::services::prompts::{GroqClient, FALLBACK_PROMPT};
use logoforge::services::queue::QueuedJob;
use logoforge::services::storage::StorageClient;

/// Serve a router on an ephemeral local port, returning its base address.
async fn spawn_stub(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub server");
    let addr = listener.local_addr().expect("stub addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server");
    });

    format!("http://{addr}")
}

fn png_bytes() -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::new_rgb8(8, 8)
        .write_to(&mut out, image::ImageFormat::Png)
        .expect("encode test image");
    out.into_inner()
}

#[tokio::test]
async fn image_endpoint_returning_png_flows_through_reencode() {
    let app = Router::new().route(
        "/prompt/{prompt}",
        get(|| async {
            (
                [(header::CONTENT_TYPE, "image/png")],
                png_bytes(),
            )
        }),
    );
    let base = spawn_stub(app).await;

    let client = PollinationsClient::new(&format!("{base}/prompt"), 512, 512).unwrap();
    let bytes = client
        .generate("minimalist vector logo", None)
        .await
        .expect("stub returns image bytes");

    let png = images::reencode_png(&bytes).expect("bytes decode as an image");
    assert_eq!(&png[..4], &[0x89, b'P', b'N', b'G']);
}

#[tokio::test]
async fn image_endpoint_returning_json_fails_decode_with_prefix() {
    // Pollinations occasionally answers 200 with an error body; the decode
    // guard is the only place this is caught.
    let app = Router::new().route(
        "/prompt/{prompt}",
        get(|| async {
            Json(serde_json::json!({ "error": "model overloaded" }))
        }),
    );
    let base = spawn_stub(app).await;

    let client = PollinationsClient::new(&format!("{base}/prompt"), 512, 512).unwrap();
    let bytes = client.generate("logo", None).await.expect("200 response");

    let err = images::reencode_png(&bytes).unwrap_err();
    match err {
        ImageGenError::InvalidImage(prefix) => {
            assert!(prefix.contains("model overloaded"), "prefix was: {prefix}");
        }
        other => panic!("expected InvalidImage, got {other:?}"),
    }

    // The worker stores the error's display string on the job record.
    let message = images::reencode_png(b"{\"error\": \"x\"}")
        .unwrap_err()
        .to_string();
    assert!(message.starts_with("Invalid image data:"));
}

#[tokio::test]
async fn image_endpoint_error_status_carries_body_text() {
    let app = Router::new().route(
        "/prompt/{prompt}",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "generation backend down") }),
    );
    let base = spawn_stub(app).await;

    let client = PollinationsClient::new(&format!("{base}/prompt"), 512, 512).unwrap();
    let err = client.generate("logo", None).await.unwrap_err();

    match err {
        ImageGenError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "generation backend down");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_prompt_makes_no_image_request() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let app = Router::new().route(
        "/prompt/{prompt}",
        get(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                ([(header::CONTENT_TYPE, "image/png")], png_bytes())
            }
        }),
    );
    let base = spawn_stub(app).await;

    let images = PollinationsClient::new(&format!("{base}/prompt"), 512, 512).unwrap();
    let storage = StorageClient::new("logos", &base, "k", "s", &base).unwrap();

    let job = QueuedJob {
        job_id: Uuid::new_v4(),
        user_id: "user-1".to_string(),
        prompt: None,
        style: Some("No Style".to_string()),
    };

    let err = generation::generate_and_store(&images, &storage, &job)
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::PromptMissing));
    assert_eq!(err.to_string(), "Prompt missing");
    assert_eq!(hits.load(Ordering::SeqCst), 0, "image endpoint must not be called");
}

#[tokio::test]
async fn prompt_generator_returns_cleaned_completion() {
    let app = Router::new().route(
        "/chat/completions",
        post(|| async {
            Json(serde_json::json!({
                "choices": [{
                    "message": {
                        "role": "assistant",
                        "content": "  \"A minimalist fox emblem in burnt orange.\"  "
                    }
                }]
            }))
        }),
    );
    let base = spawn_stub(app).await;

    let client = GroqClient::new("test-key", "llama-3.3-70b-versatile", &base);
    let prompt = client.creative_prompt(Some("Minimal")).await;

    assert_eq!(prompt, "A minimalist fox emblem in burnt orange.");
}

#[tokio::test]
async fn prompt_generator_falls_back_on_malformed_response() {
    let app = Router::new().route(
        "/chat/completions",
        post(|| async { "not json at all" }),
    );
    let base = spawn_stub(app).await;

    let client = GroqClient::new("test-key", "llama-3.3-70b-versatile", &base);
    let prompt = client.creative_prompt(None).await;

    assert_eq!(prompt, FALLBACK_PROMPT);
}

#[tokio::test]
async fn prompt_generator_falls_back_on_api_error() {
    let app = Router::new().route(
        "/chat/completions",
        post(|| async { (StatusCode::UNAUTHORIZED, "invalid api key") }),
    );
    let base = spawn_stub(app).await;

    let client = GroqClient::new("bad-key", "llama-3.3-70b-versatile", &base);
    let prompt = client.creative_prompt(None).await;

    assert_eq!(prompt, FALLBACK_PROMPT);
}

#[tokio::test]
async fn prompt_generator_falls_back_on_empty_completion() {
    let app = Router::new().route(
        "/chat/completions",
        post(|| async {
            Json(serde_json::json!({
                "choices": [{
                    "message": { "role": "assistant", "content": "\"\"" }
                }]
            }))
        }),
    );
    let base = spawn_stub(app).await;

    let client = GroqClient::new("test-key", "llama-3.3-70b-versatile", &base);
    let prompt = client.creative_prompt(None).await;

    assert_eq!(prompt, FALLBACK_PROMPT);
}
