use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Returned whenever prompt generation fails for any reason. The caller is
/// never shown an error from this service.
pub const FALLBACK_PROMPT: &str =
    "A futuristic geometric hexagon logo with neon blue glowing edges.";

const INSTRUCTION: &str = concat!(
    "Maximum 30 words. 1 sentence. Create a detailed, creative logo concept description. ",
    "Focus on visual elements, colors, and mood. ",
    "Do not include introductory text like 'Here is a logo'."
);

/// Client for the Groq chat-completions API (OpenAI-compatible).
pub struct GroqClient {
    http: Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

impl GroqClient {
    pub fn new(api_key: &str, model: &str, base_url: &str) -> Self {
        Self {
            http: Client::new(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Generate a creative logo prompt, optionally biased toward a style.
    ///
    /// Never fails: any error (network, non-2xx, empty or malformed response)
    /// is logged and replaced with [`FALLBACK_PROMPT`].
    pub async fn creative_prompt(&self, style: Option<&str>) -> String {
        match self.request_prompt(style).await {
            Ok(prompt) => prompt,
            Err(e) => {
                tracing::warn!(error = %e, "Prompt generation failed, using fallback");
                FALLBACK_PROMPT.to_string()
            }
        }
    }

    async fn request_prompt(&self, style: Option<&str>) -> Result<String, PromptError> {
        let content = build_instruction(style);

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content,
            }],
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PromptError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let chat: ChatResponse = response.json().await?;
        let text = chat
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .unwrap_or_default();

        let cleaned = clean_prompt(text);
        if cleaned.is_empty() {
            return Err(PromptError::Empty);
        }

        Ok(cleaned)
    }
}

fn build_instruction(style: Option<&str>) -> String {
    match style {
        Some(s) if !s.trim().is_empty() => {
            format!("{INSTRUCTION} The logo should follow a {} style.", s.trim())
        }
        _ => INSTRUCTION.to_string(),
    }
}

/// Strip quote characters and surrounding whitespace from model output.
fn clean_prompt(text: &str) -> String {
    text.replace('"', "").trim().to_string()
}

#[derive(Debug, thiserror::Error)]
enum PromptError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Groq API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Groq returned an empty completion")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_prompt_strips_quotes_and_whitespace() {
        assert_eq!(
            clean_prompt("  \"A bold crimson phoenix logo.\"  "),
            "A bold crimson phoenix logo."
        );
        assert_eq!(clean_prompt("no quotes here"), "no quotes here");
        assert_eq!(clean_prompt("\"\""), "");
    }

    #[test]
    fn clean_prompt_strips_embedded_quotes() {
        assert_eq!(
            clean_prompt("A lion reading \"HEXA\" in bold letters"),
            "A lion reading HEXA in bold letters"
        );
    }

    #[test]
    fn instruction_includes_style_when_given() {
        let with_style = build_instruction(Some("Vintage"));
        assert!(with_style.contains("Vintage style"));
        assert!(with_style.starts_with("Maximum 30 words."));

        assert_eq!(build_instruction(None), INSTRUCTION);
        assert_eq!(build_instruction(Some("  ")), INSTRUCTION);
    }

    #[tokio::test]
    async fn unreachable_endpoint_yields_fallback() {
        // Port 9 (discard) is not listening; the request fails immediately.
        let client = GroqClient::new("test-key", "llama-3.3-70b-versatile", "http://127.0.0.1:9");
        let prompt = client.creative_prompt(None).await;
        assert_eq!(prompt, FALLBACK_PROMPT);
    }
}
