use std::time::Duration;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use async_openai::error::OpenAIError;

use crate::domain::response::AnalysisResponse;

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// Bad caller input, reported before any remote call is made.
    #[error("{0}")]
    Validation(String),

    /// A remote procedure failed or rejected its arguments.
    #[error("{0}")]
    RemoteQuery(String),

    /// A remote procedure answered with a payload we could not read.
    #[error("Malformed response from {function}: {reason}")]
    MalformedResponse { function: String, reason: String },

    #[error("Analysis timed out after {} seconds", .0.as_secs())]
    Timeout(Duration),

    /// The language model API could not be reached or misbehaved.
    #[error("Chat agent failed: {0}")]
    Agent(String),
}

impl AnalysisError {
    pub fn validation(message: impl Into<String>) -> Self {
        AnalysisError::Validation(message.into())
    }

    pub fn remote(message: impl Into<String>) -> Self {
        AnalysisError::RemoteQuery(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AnalysisError::Validation(_))
    }
}

impl From<sqlx::Error> for AnalysisError {
    fn from(value: sqlx::Error) -> Self {
        AnalysisError::RemoteQuery(format!("Database call failed: {}", value))
    }
}

impl From<OpenAIError> for AnalysisError {
    fn from(value: OpenAIError) -> Self {
        AnalysisError::Agent(value.to_string())
    }
}

impl ResponseError for AnalysisError {
    fn status_code(&self) -> StatusCode {
        match self {
            AnalysisError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(AnalysisResponse::failure(self.to_string()))
    }
}
