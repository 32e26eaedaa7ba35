use std::io::Cursor;
use std::time::Duration;

use reqwest::{Client, Url};

/// How much of a textual error body to keep when the image endpoint returns
/// something other than image bytes.
const ERROR_TEXT_PREFIX_LEN: usize = 100;

/// Client for the Pollinations image generation API.
///
/// The prompt is embedded in the URL path; the endpoint answers with raw
/// image bytes on success, or a text/JSON error body with no reliable status
/// signalling, so callers must treat decode failure as the error detector.
pub struct PollinationsClient {
    http: Client,
    base_url: String,
    width: u32,
    height: u32,
}

impl PollinationsClient {
    pub fn new(base_url: &str, width: u32, height: u32) -> Result<Self, ImageGenError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(ImageGenError::Http)?;

        Ok(Self {
            http,
            base_url: base_url.to_string(),
            width,
            height,
        })
    }

    /// Build the generation URL with the percent-encoded prompt as the final
    /// path segment and fixed dimensions in the query string.
    pub fn image_url(&self, prompt: &str, seed: Option<u64>) -> Result<Url, ImageGenError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ImageGenError::Config(format!("invalid base URL: {e}")))?;

        url.path_segments_mut()
            .map_err(|_| ImageGenError::Config("base URL cannot be a base".to_string()))?
            .pop_if_empty()
            .push(prompt);

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("width", &self.width.to_string());
            query.append_pair("height", &self.height.to_string());
            if let Some(seed) = seed {
                query.append_pair("seed", &seed.to_string());
            }
            query.append_pair("nologo", "true");
        }

        Ok(url)
    }

    /// Request image bytes for a prompt. Non-2xx responses become an error
    /// carrying the status and response text.
    pub async fn generate(&self, prompt: &str, seed: Option<u64>) -> Result<Vec<u8>, ImageGenError> {
        let url = self.image_url(prompt, seed)?;
        tracing::debug!(url = %url, "Requesting image generation");

        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ImageGenError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let bytes = response.bytes().await?.to_vec();
        if bytes.is_empty() {
            return Err(ImageGenError::EmptyResponse);
        }

        Ok(bytes)
    }
}

/// Decode returned bytes and re-encode as PNG.
///
/// The endpoint sometimes returns a JSON or text error body instead of image
/// data; decode failure surfaces that body's prefix as the error message.
pub fn reencode_png(bytes: &[u8]) -> Result<Vec<u8>, ImageGenError> {
    let decoded = image::load_from_memory(bytes).map_err(|_| {
        let text = String::from_utf8_lossy(bytes);
        let prefix: String = text.chars().take(ERROR_TEXT_PREFIX_LEN).collect();
        ImageGenError::InvalidImage(prefix)
    })?;

    let mut out = Cursor::new(Vec::new());
    decoded
        .write_to(&mut out, image::ImageFormat::Png)
        .map_err(ImageGenError::Encode)?;

    Ok(out.into_inner())
}

#[derive(Debug, thiserror::Error)]
pub enum ImageGenError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Image API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid image data: {0}")]
    InvalidImage(String),

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Image API returned an empty response")]
    EmptyResponse,

    #[error("Image client configuration error: {0}")]
    Config(String),
}
