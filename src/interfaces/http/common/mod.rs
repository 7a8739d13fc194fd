//! Response envelope, error mapping and request extractors shared by all modules

pub mod content_form;
pub mod error;
pub mod validated_json;

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::FieldError;

pub use content_form::{ContentForm, UploadForm};
pub use error::{ApiError, ApiResult};
pub use validated_json::ValidatedJson;

/// Standard API response envelope
///
/// Success: `{"success": true, "data": {...}}`.
/// Failure: `{"success": false, "error": "...", "errors": [{"field", "message"}]}`,
/// where `errors` is only present for validation failures.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            errors: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            errors: None,
        }
    }

    pub fn invalid(errors: Vec<FieldError>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some("Validation failed".into()),
            errors: Some(errors),
        }
    }
}

/// Payload for operations that return nothing but a confirmation
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageData {
    pub message: String,
}

impl MessageData {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
