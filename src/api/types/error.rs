//! JSON error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Error categories reported to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorType {
    InvalidRequestError,
    NotFoundError,
    ConfigurationError,
    ServerError,
}

impl std::fmt::Display for ApiErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequestError => write!(f, "invalid_request_error"),
            Self::NotFoundError => write!(f, "not_found_error"),
            Self::ConfigurationError => write!(f, "configuration_error"),
            Self::ServerError => write!(f, "server_error"),
        }
    }
}

/// Error body: `{ "error": { "message", "type", "param"?, "code"? } }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: ApiErrorType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, error_type: ApiErrorType, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: ApiErrorDetail {
                    message: message.into(),
                    error_type,
                    param: None,
                    code: None,
                },
            },
        }
    }

    /// Name the offending request field
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.response.error.param = Some(param.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.response.error.code = Some(code.into());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiErrorType::InvalidRequestError, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ApiErrorType::NotFoundError, message)
    }

    /// The service is misconfigured, e.g. no models are registered
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiErrorType::ConfigurationError,
            message,
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, ApiErrorType::ServerError, message)
    }

    /// The model runtime failed while producing output
    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, ApiErrorType::ServerError, message)
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            ApiErrorType::InvalidRequestError,
            message,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match &err {
            DomainError::Input { message } => Self::bad_request(message),
            DomainError::Registry { message } => {
                Self::configuration(message).with_code("registry_error")
            }
            DomainError::ModelLoad { .. } => {
                Self::internal(err.to_string()).with_code("model_load_error")
            }
            DomainError::Generation { .. } => {
                Self::bad_gateway(err.to_string()).with_code("generation_error")
            }
            DomainError::NotFound { message } => Self::not_found(message),
            DomainError::Storage { message } => Self::internal(message).with_code("storage_error"),
            DomainError::Configuration { message } => Self::configuration(message),
            DomainError::Internal { message } => Self::internal(message),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.response.error.error_type, self.response.error.message
        )
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_creation() {
        let err = ApiError::bad_request("Unsupported language").with_param("language");

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.response.error.error_type, ApiErrorType::InvalidRequestError);
        assert_eq!(err.response.error.param.as_deref(), Some("language"));
        assert_eq!(err.to_string(), "invalid_request_error: Unsupported language");
    }

    #[test]
    fn test_domain_error_mapping() {
        let cases = [
            (DomainError::input("bad"), StatusCode::BAD_REQUEST, ApiErrorType::InvalidRequestError),
            (
                DomainError::registry("no models available"),
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorType::ConfigurationError,
            ),
            (
                DomainError::model_load("math", "missing"),
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorType::ServerError,
            ),
            (
                DomainError::generation("math", "crashed"),
                StatusCode::BAD_GATEWAY,
                ApiErrorType::ServerError,
            ),
            (DomainError::not_found("gone"), StatusCode::NOT_FOUND, ApiErrorType::NotFoundError),
            (
                DomainError::storage("disk full"),
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorType::ServerError,
            ),
        ];

        for (domain, status, error_type) in cases {
            let api: ApiError = domain.into();
            assert_eq!(api.status, status);
            assert_eq!(api.response.error.error_type, error_type);
        }
    }

    #[test]
    fn test_model_errors_name_the_model() {
        let api: ApiError = DomainError::generation("math", "crashed").into();

        assert!(api.response.error.message.contains("math"));
        assert_eq!(api.response.error.code.as_deref(), Some("generation_error"));
    }

    #[test]
    fn test_error_serialization() {
        let api = ApiError::configuration("no models available").with_code("registry_error");
        let json = serde_json::to_value(&api.response).unwrap();

        assert_eq!(json["error"]["type"], "configuration_error");
        assert_eq!(json["error"]["message"], "no models available");
        assert_eq!(json["error"]["code"], "registry_error");
        assert!(json["error"].get("param").is_none());
    }
}
