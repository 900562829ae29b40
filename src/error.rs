use std::path::PathBuf;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid GPX: {0}")]
    InvalidGpx(String),
}

/// Internal-contract violations raised while laying out FIT bytes.
///
/// None of these are caused by bad input documents; they mean the encoder was
/// asked for something its message tables cannot express.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("Unknown FIT message type: {0}")]
    UnknownMessage(String),
    #[error("Message {message} has no field {field}")]
    UnknownField { message: &'static str, field: u8 },
    #[error("Field {field} of {message} is {expected} bytes wide, got {actual}")]
    FieldSizeMismatch {
        message: &'static str,
        field: u8,
        expected: usize,
        actual: usize,
    },
    #[error("Value {value} does not fit into {width} byte(s)")]
    ValueOutOfRange { value: u64, width: usize },
    #[error("Timestamp {0} lies before the FIT epoch")]
    TimestampOutOfRange(DateTime<Utc>),
    #[error("No local message numbers left for {0}")]
    LocalIdsExhausted(&'static str),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Parse(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Encode(_) | AppError::Io { .. } | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
