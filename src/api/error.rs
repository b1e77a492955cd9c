//! Maps pipeline failures onto HTTP responses.
//!
//! Every error body has the shape `{"error": "<message>"}`.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::{classifier::ModelError, web_content::ExtractionError};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Client input problems. The messages are part of the public contract.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No data provided")]
    NoData,
    #[error("No url provided")]
    NoUrl,
    #[error("Invalid url")]
    InvalidUrl,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Extraction(ExtractionError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Extraction(ExtractionError::InvalidUrl(_)) => StatusCode::BAD_REQUEST,
            ApiError::Extraction(_) => StatusCode::BAD_GATEWAY,
            ApiError::Model(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = match self {
            ApiError::Validation(err) => err.to_string(),
            ApiError::Extraction(ExtractionError::InvalidUrl(_)) => {
                ValidationError::InvalidUrl.to_string()
            }
            ApiError::Extraction(err) => format!("Failed to retrieve page content: {err}"),
            ApiError::Model(_) => "Classification model unavailable".to_string(),
        };

        if status.is_server_error() {
            tracing::error!(target: "api", status = status.as_u16(), error = %self, "request failed");
        } else {
            tracing::warn!(target: "api", status = status.as_u16(), error = %self, "request rejected");
        }

        HttpResponse::build(status).json(ErrorResponse { error: message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_match_contract() {
        assert_eq!(ValidationError::NoData.to_string(), "No data provided");
        assert_eq!(ValidationError::NoUrl.to_string(), "No url provided");
        assert_eq!(ValidationError::InvalidUrl.to_string(), "Invalid url");
    }

    #[test]
    fn status_codes_follow_error_class() {
        assert_eq!(
            ApiError::from(ValidationError::NoUrl).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(ExtractionError::Timeout("http://slow.test".into())).status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            ApiError::from(ExtractionError::Status {
                url: "http://gone.test".into(),
                status: reqwest::StatusCode::NOT_FOUND,
            })
            .status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::from(ModelError::Incompatible("shape".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
