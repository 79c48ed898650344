//! JSON bodies exchanged with the page

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::StudyError;
use crate::models::request::Mode;
use crate::models::timetable::RowRejection;
use crate::services::formatter::FormattedText;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub ai_configured: bool,
}

#[derive(Debug, Serialize)]
pub struct TextResponse {
    pub mode: Mode,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tips: Option<String>,
}

impl TextResponse {
    pub fn new(mode: Mode, text: FormattedText) -> Self {
        Self {
            mode,
            body: text.body,
            tips: text.tips,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TimetableResponse {
    pub file_name: String,
    pub download_url: String,
    pub event_count: usize,
    pub rejections: Vec<RowRejection>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rejections: Vec<RowRejection>,
}

pub fn status_for(err: &StudyError) -> StatusCode {
    match err {
        StudyError::Parse { .. } | StudyError::Read(_) | StudyError::InvalidInput(_) => {
            StatusCode::BAD_REQUEST
        }
        StudyError::Serialization(_) => StatusCode::UNPROCESSABLE_ENTITY,
        StudyError::Auth(_) => StatusCode::UNAUTHORIZED,
        StudyError::Service(_) => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for StudyError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        let message = self.to_string();
        let error = self.kind().to_string();
        let rejections = match self {
            StudyError::Serialization(rejections) => rejections,
            _ => Vec::new(),
        };
        (
            status,
            Json(ErrorResponse {
                error,
                message,
                rejections,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(&StudyError::parse("x")), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(&StudyError::Read("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(&StudyError::Auth("x".into())), StatusCode::UNAUTHORIZED);
        assert_eq!(status_for(&StudyError::Service("x".into())), StatusCode::BAD_GATEWAY);
        assert_eq!(
            status_for(&StudyError::Serialization(Vec::new())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_error_response_status() {
        let response = StudyError::Auth("missing key".into()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
