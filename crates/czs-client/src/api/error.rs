//! Error types and user-facing message formatting.
//!
//! Both services report failures as `{detail, detail_fr?}`. Non-2xx responses
//! become [`ApiError::Service`] when that shape parses and
//! [`ApiError::Unstructured`] when it does not; either way a failed call never
//! produces a success value.

use thiserror::Error;
use tracing::error;

use crate::config::Language;
use crate::models::ErrorDetail;

/// Fallback shown when an error carries no recognizable body.
const GENERIC_FAILURE: &str = "Failed...";

/// Maximum length for error response bodies kept in error values
const MAX_ERROR_BODY_LENGTH: usize = 500;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Structured service error with an English detail and an optional
    /// French variant.
    #[error("{status}: {detail}")]
    Service {
        status: u16,
        detail: String,
        detail_fr: Option<String>,
    },

    /// Non-2xx response whose body was not the expected error shape.
    #[error("Unexpected response ({status}): {body}")]
    Unstructured { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Truncate a response body to avoid keeping excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        // Back off to a char boundary so multibyte bodies cannot split
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!(
            "{}... (truncated, {} total bytes)",
            &body[..end],
            body.len()
        )
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        match serde_json::from_str::<ErrorDetail>(body) {
            Ok(err) => ApiError::Service {
                status: status.as_u16(),
                detail: err.detail,
                detail_fr: err.detail_fr,
            },
            Err(_) => ApiError::Unstructured {
                status: status.as_u16(),
                body: Self::truncate_body(body),
            },
        }
    }

    /// Notification text for this error.
    ///
    /// Under French, a localized detail is appended on its own line so both
    /// variants are shown; otherwise the primary detail stands alone. Errors
    /// with no recognizable structure collapse to a generic failure message.
    pub fn display_message(&self, lang: Language) -> String {
        match self {
            ApiError::Service {
                detail, detail_fr, ..
            } => match (lang, detail_fr) {
                (Language::Fr, Some(fr)) => format!("{}\n{}", detail, fr),
                _ => detail.clone(),
            },
            _ => GENERIC_FAILURE.to_string(),
        }
    }

    /// Plain-text message for this error, for callers that need the string
    /// rather than a notification. Under French the localized detail
    /// substitutes the primary one when present.
    pub fn message(&self, lang: Language) -> String {
        match self {
            ApiError::Service {
                detail, detail_fr, ..
            } => match (lang, detail_fr) {
                (Language::Fr, Some(fr)) => fr.clone(),
                _ => detail.clone(),
            },
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}

/// Default failure handler: log the raw error and return the text a caller
/// should surface to the user.
pub fn report_failure(err: &anyhow::Error, lang: Language) -> String {
    error!(error = ?err, "Request failed");
    match err.downcast_ref::<ApiError>() {
        Some(api_err) => api_err.display_message(lang),
        None => GENERIC_FAILURE.to_string(),
    }
}
