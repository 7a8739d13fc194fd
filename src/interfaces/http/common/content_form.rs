//! Extractor for bodies that may carry a file
//!
//! News and media accept either `multipart/form-data` (text fields plus one
//! file part) or a plain JSON body. Text parts are collected into a JSON
//! object, so a single DTO with lenient scalar deserializers serves both.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::{Validate, ValidationErrors};

use super::ApiResponse;
use crate::domain::{FieldError, Upload};
use crate::shared::validations::field_errors;

/// A request DTO that can arrive together with an uploaded file.
pub trait UploadForm: DeserializeOwned + Validate {
    /// Name of the multipart part holding the file.
    const FILE_FIELD: &'static str;
}

/// Validated form data plus the optional file part.
pub struct ContentForm<T> {
    pub data: T,
    pub file: Option<Upload>,
}

pub enum ContentFormRejection {
    Json(JsonRejection),
    Multipart(MultipartRejection),
    Part(MultipartError),
    Fields {
        source: serde_json::Error,
        errors: Vec<FieldError>,
    },
    Invalid(ValidationErrors),
}

impl IntoResponse for ContentFormRejection {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::Json(rejection) => (
                StatusCode::BAD_REQUEST,
                ApiResponse::<()>::error(format!("Invalid request body: {}", rejection.body_text())),
            ),
            Self::Multipart(rejection) => (
                rejection.status(),
                ApiResponse::error(format!("Invalid multipart body: {}", rejection.body_text())),
            ),
            Self::Part(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ApiResponse::error("File exceeds the upload limit"),
            ),
            Self::Part(e) => (
                e.status(),
                ApiResponse::error(format!("Invalid multipart body: {}", e.body_text())),
            ),
            Self::Fields { errors, .. } if !errors.is_empty() => {
                (StatusCode::BAD_REQUEST, ApiResponse::invalid(errors))
            }
            Self::Fields { source, .. } => (
                StatusCode::BAD_REQUEST,
                ApiResponse::error(format!("Invalid form data: {}", source)),
            ),
            Self::Invalid(errors) => (
                StatusCode::BAD_REQUEST,
                ApiResponse::invalid(field_errors(&errors)),
            ),
        };
        (status, Json(body)).into_response()
    }
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"))
}

async fn read_multipart<T: UploadForm>(
    mut multipart: Multipart,
) -> Result<(T, Option<Upload>), ContentFormRejection> {
    let mut fields = Map::new();
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(ContentFormRejection::Part)?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == T::FILE_FIELD {
            let original_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field.bytes().await.map_err(ContentFormRejection::Part)?;

            // An untouched file input still submits an empty part.
            if original_name.is_empty() && bytes.is_empty() {
                continue;
            }
            file = Some(Upload {
                original_name,
                content_type,
                bytes: bytes.to_vec(),
            });
        } else {
            let text = field.text().await.map_err(ContentFormRejection::Part)?;
            fields.insert(name, Value::String(text));
        }
    }

    let data = match serde_json::from_value(Value::Object(fields.clone())) {
        Ok(data) => data,
        Err(source) => {
            let errors = blame_fields::<T>(fields);
            return Err(ContentFormRejection::Fields { source, errors });
        }
    };
    Ok((data, file))
}

/// Name the text parts that fail to deserialize.
///
/// Deserialization stops at the first bad entry, so the culprit is the key
/// whose removal changes the error. It is recorded and dropped, then the
/// rest is retried to find further bad parts.
fn blame_fields<T: DeserializeOwned>(mut fields: Map<String, Value>) -> Vec<FieldError> {
    let mut errors = Vec::new();
    while let Err(e) = serde_json::from_value::<T>(Value::Object(fields.clone())) {
        let message = e.to_string();
        if message.starts_with("missing field") {
            break;
        }
        let culprit = fields.keys().find(|key| {
            let mut rest = fields.clone();
            rest.remove(key.as_str());
            match serde_json::from_value::<T>(Value::Object(rest)) {
                Ok(_) => true,
                Err(other) => other.to_string() != message,
            }
        });
        let Some(key) = culprit.cloned() else {
            break;
        };
        fields.remove(&key);
        errors.push(FieldError::new(key, message));
    }
    errors
}

impl<S, T> FromRequest<S> for ContentForm<T>
where
    T: UploadForm,
    S: Send + Sync,
{
    type Rejection = ContentFormRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (data, file) = if is_multipart(&req) {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(ContentFormRejection::Multipart)?;
            read_multipart::<T>(multipart).await?
        } else {
            let Json(data) = Json::<T>::from_request(req, state)
                .await
                .map_err(ContentFormRejection::Json)?;
            (data, None)
        };

        data.validate().map_err(ContentFormRejection::Invalid)?;
        Ok(Self { data, file })
    }
}
