use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Database(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Failure kinds of the recommendation pipeline.
///
/// None of these reach the web layer: the orchestrator logs them and answers
/// with an empty list.
#[derive(thiserror::Error, Debug)]
pub enum RecommendationError {
    #[error("ListenBrainz integration is disabled for user '{0}'")]
    ServiceDisabled(String),

    #[error("No ListenBrainz credential stored for user '{0}'")]
    MissingCredential(String),

    #[error("Could not decode ListenBrainz credential for user '{username}': {source}")]
    DecodeFailure {
        username: String,
        #[source]
        source: DecodeError,
    },

    #[error("Failed to load recommendations from ListenBrainz: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("ListenBrainz user '{0}' not found, verify that the ListenBrainz username is configured correctly")]
    NotFound(String),

    #[error("ListenBrainz returned status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Failed to parse ListenBrainz response: {0}")]
    ParseFailure(#[from] serde_json::Error),

    #[error("Storage lookup failed: {0}")]
    Storage(#[from] AppError),
}

impl RecommendationError {
    /// Short label for the failure, safe to log next to any other field
    pub fn kind(&self) -> &'static str {
        match self {
            RecommendationError::ServiceDisabled(_) => "integration_disabled",
            RecommendationError::MissingCredential(_) => "credential_missing",
            RecommendationError::DecodeFailure { .. } => "credential_unusable",
            RecommendationError::NetworkFailure(_) => "network",
            RecommendationError::NotFound(_) => "user_not_found",
            RecommendationError::UnexpectedStatus { .. } => "unexpected_status",
            RecommendationError::ParseFailure(_) => "malformed_response",
            RecommendationError::Storage(_) => "storage",
        }
    }
}

/// Errors raised while turning a stored secret back into plaintext
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unknown encoder '{0}'")]
    UnknownEncoder(String),

    #[error("encoder '{0}' is one-way and cannot be decoded")]
    NotDecodable(String),

    #[error("malformed secret: {0}")]
    Malformed(String),
}
