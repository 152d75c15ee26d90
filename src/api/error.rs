use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use crate::agent::AgentError;

use super::types::ErrorResponse;

/// Plain-text body returned when a route needs a prior simulation.
pub const NO_SIMULATION_MESSAGE: &str = "No simulation has been run yet.";

/// Errors returned from handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No simulation has been run yet.")]
    NoSimulation,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Agent unavailable: {0}")]
    AgentUnavailable(AgentError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<AgentError> for ApiError {
    fn from(e: AgentError) -> Self {
        match e {
            AgentError::Encode(e) => Self::Internal(e.to_string()),
            other => Self::AgentUnavailable(other),
        }
    }
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NoSimulation | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::AgentUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            Self::NoSimulation => "NoSimulation",
            Self::BadRequest(_) => "BadRequest",
            Self::AgentUnavailable(_) => "AgentUnavailable",
            Self::Internal(_) => "InternalError",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            Self::NoSimulation => {
                return (
                    status,
                    [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                    NO_SIMULATION_MESSAGE,
                )
                    .into_response();
            }
            Self::AgentUnavailable(e) => warn!(error = %e, "agent request failed"),
            Self::Internal(msg) => error!(error = %msg, "internal error"),
            Self::BadRequest(_) => {}
        }

        let body = ErrorResponse {
            error: self.error_type(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
