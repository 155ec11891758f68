use crate::invoice::InvoiceError;
use crate::sheet::SheetError;
use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub const READ_FAILED_MESSAGE: &str = "Could not read the uploaded files. Check their format and size.";
pub const PROCESSING_FAILED_MESSAGE: &str = "An error occurred while processing the files. See the server log for details.";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("upload error: {0}")] Upload(String),
    #[error("missing upload field `{0}`")] MissingFile(&'static str),
    #[error("`{field}` is {size} bytes, limit is {limit}")] TooLarge { field: &'static str, size: usize, limit: usize },
    #[error(transparent)] Invoice(#[from] InvoiceError),
    #[error("worker task failed: {0}")] Task(#[from] tokio::task::JoinError),
}

impl From<SheetError> for AppError {
    fn from(e: SheetError) -> Self { AppError::Invoice(e.into()) }
}

impl AppError {
    pub fn is_input(&self) -> bool {
        matches!(self, AppError::Upload(_) | AppError::MissingFile(_) | AppError::TooLarge { .. })
    }
}

/// Every failure gets logged in full; the client only ever sees one of two
/// generic messages.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = if self.is_input() {
            (StatusCode::BAD_REQUEST, READ_FAILED_MESSAGE)
        } else {
            (StatusCode::INTERNAL_SERVER_ERROR, PROCESSING_FAILED_MESSAGE)
        };
        error!("❌ {}", self);
        (status, Json(json!({ "error": message }))).into_response()
    }
}
