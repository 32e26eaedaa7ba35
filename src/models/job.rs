use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// Style label a job may carry instead of (or alongside) a prompt.
/// The client sends the display name, so "No Style" means no usable style.
pub const NO_STYLE: &str = "No Style";

/// Status of a logo generation job. `Done` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, EnumString, Display, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Processing,
    Done,
    Failed,
}

/// A logo generation job record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoJob {
    pub id: Uuid,
    pub user_id: String,
    pub status: JobStatus,
    pub prompt: Option<String>,
    pub style: Option<String>,
    pub logo_url: Option<String>,
    pub error_message: Option<String>,
    pub result_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Resolve the prompt a job should be generated with.
///
/// A non-blank `prompt` wins. Otherwise a usable `style` (non-blank and not
/// "No Style") derives the prompt "{style} Logo". Returns `None` when neither
/// is usable, in which case the job must fail without any outbound request.
pub fn resolve_prompt(prompt: Option<&str>, style: Option<&str>) -> Option<String> {
    if let Some(p) = prompt {
        let p = p.trim();
        if !p.is_empty() {
            return Some(p.to_string());
        }
    }

    match style.map(str::trim) {
        Some(s) if !s.is_empty() && s != NO_STYLE => Some(format!("{s} Logo")),
        _ => None,
    }
}
