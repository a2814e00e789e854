//! Error type for HTTP handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

use aircraft_ingest::IngestError;

/// All errors a trigger endpoint can return.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Ingest(#[from] IngestError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Ingest(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        (status, Json(serde_json::json!({ "detail": self.to_string() }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
