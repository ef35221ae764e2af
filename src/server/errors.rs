//! HTTP mapping of domain errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::image_proxy::ImageProxyError;
use crate::quiz::QuizError;

pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

impl IntoResponse for ImageProxyError {
    fn into_response(self) -> Response {
        let status = match &self {
            ImageProxyError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            ImageProxyError::FetchFailed(_) => StatusCode::BAD_GATEWAY,
            ImageProxyError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        };
        error_response(status, self.to_string())
    }
}

impl IntoResponse for QuizError {
    fn into_response(self) -> Response {
        match self {
            QuizError::InvalidInput(_) => error_response(StatusCode::BAD_REQUEST, self.to_string()),
        }
    }
}
