//! Error types
//!
//! `ApiError` classifies everything that can go wrong talking to the clinic
//! backend. `AppError` is what the local HTTP service answers with.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Api Error Enum ==
/// Failure of a backend call, or of its client-side validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-2xx status
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The body was neither a bare payload nor a success envelope
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The envelope reported `success: false`
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// The HTTP client itself could not be set up
    #[error("Client setup failed: {0}")]
    Client(String),

    /// Input refused before any network call was made
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl ApiError {
    /// Network failures and 5xx responses may succeed on a second try.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Short message suitable for a notification or dropdown error state.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => {
                "Não foi possível conectar ao servidor. Verifique sua conexão.".to_string()
            }
            ApiError::Http { status, message } if *status >= 500 => {
                format!("Erro no servidor ({status}): {message}")
            }
            ApiError::Http { message, .. } => message.clone(),
            ApiError::MalformedResponse(_) => "Resposta inesperada do servidor.".to_string(),
            ApiError::Client(_) => "Falha ao inicializar o cliente HTTP.".to_string(),
            ApiError::Rejected(message) | ApiError::Validation(message) => message.clone(),
        }
    }
}

// == App Error Enum ==
/// Error returned by the local HTTP handlers.
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid query parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The backend call behind this request failed
    #[error(transparent)]
    Upstream(#[from] ApiError),
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Upstream(err @ ApiError::Validation(_)) => {
                (StatusCode::BAD_REQUEST, err.user_message())
            }
            AppError::Upstream(err @ ApiError::Http { status: 404, .. }) => {
                (StatusCode::NOT_FOUND, err.user_message())
            }
            AppError::Upstream(err @ ApiError::Client(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, err.user_message())
            }
            AppError::Upstream(err) => (StatusCode::BAD_GATEWAY, err.user_message()),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

// == Result Type Aliases ==
/// Result of a backend call.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Result of an HTTP handler.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(ApiError::Network("reset".into()).is_retryable());
        assert!(ApiError::Http { status: 503, message: "down".into() }.is_retryable());
        assert!(!ApiError::Http { status: 404, message: "nope".into() }.is_retryable());
        assert!(!ApiError::Validation("id".into()).is_retryable());
        assert!(!ApiError::MalformedResponse("x".into()).is_retryable());
        assert!(!ApiError::Client("tls backend unavailable".into()).is_retryable());
    }

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = ApiError::Http {
            status: 409,
            message: "CPF já cadastrado".into(),
        };
        assert_eq!(err.user_message(), "CPF já cadastrado");
    }

    #[test]
    fn test_status_mapping() {
        let resp = AppError::InvalidRequest("bad".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = AppError::from(ApiError::Network("refused".into())).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

        let resp = AppError::from(ApiError::Client("tls".into())).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let resp = AppError::from(ApiError::Http {
            status: 404,
            message: "Paciente não encontrado".into(),
        })
        .into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
