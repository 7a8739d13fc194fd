//! Mapping from domain failures to HTTP responses

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, info};

use super::ApiResponse;
use crate::domain::DomainError;

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Handler error; every `DomainError` converts into it via `?`.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::InvalidCredentials | DomainError::Unauthorized(_) => {
                StatusCode::UNAUTHORIZED
            }
            DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
            DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::Conflict(_) => StatusCode::CONFLICT,
            DomainError::TooManyAttempts { .. } => StatusCode::TOO_MANY_REQUESTS,
            DomainError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self.0 {
            DomainError::Validation(errors) => ApiResponse::<()>::invalid(errors),
            DomainError::Unauthorized(message)
            | DomainError::Forbidden(message)
            | DomainError::Conflict(message) => ApiResponse::error(message),
            DomainError::NotFound { entity, id } => {
                info!(entity, id = %id, "Resource not found");
                ApiResponse::error(format!("{entity} not found"))
            }
            DomainError::Storage(detail) => {
                error!("Request failed: {}", detail);
                ApiResponse::error("Internal server error")
            }
            DomainError::TooManyAttempts { retry_after_secs } => {
                let mut response = (
                    status,
                    Json(ApiResponse::<()>::error(format!(
                        "Too many failed login attempts, try again in {} seconds",
                        retry_after_secs
                    ))),
                )
                    .into_response();
                response
                    .headers_mut()
                    .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
                return response;
            }
            other => ApiResponse::error(other.to_string()),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;
    use serde_json::Value;

    use super::*;
    use crate::domain::FieldError;

    async fn render(e: DomainError) -> (StatusCode, Option<String>, Value) {
        let response = ApiError::from(e).into_response();
        let status = response.status();
        let retry = response
            .headers()
            .get(header::RETRY_AFTER)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, retry, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn validation_lists_field_errors() {
        let (status, _, body) = render(DomainError::Validation(vec![FieldError::new(
            "dayOfWeek",
            "must be between 0 and 6",
        )]))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["errors"][0]["field"], "dayOfWeek");
    }

    #[tokio::test]
    async fn lockout_sets_retry_after() {
        let (status, retry, _) = render(DomainError::TooManyAttempts {
            retry_after_secs: 120,
        })
        .await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(retry.as_deref(), Some("120"));
    }

    #[tokio::test]
    async fn storage_details_are_not_leaked() {
        let (status, _, body) = render(DomainError::Storage("disk on fire".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }

    #[derive(Clone, Default)]
    struct LogBuffer(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn not_found_is_logged() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let status = tracing::subscriber::with_default(subscriber, || {
            ApiError::from(DomainError::not_found("Media", "m-42"))
                .into_response()
                .status()
        });
        assert_eq!(status, StatusCode::NOT_FOUND);

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Resource not found"), "{output}");
        assert!(output.contains("m-42"), "{output}");
    }

    #[tokio::test]
    async fn status_mapping() {
        let cases = [
            (DomainError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (DomainError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (DomainError::not_found("News", "1"), StatusCode::NOT_FOUND),
            (DomainError::Conflict("x".into()), StatusCode::CONFLICT),
            (
                DomainError::PayloadTooLarge { limit: 10 },
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(ApiError::from(error).status(), expected);
        }
    }
}
