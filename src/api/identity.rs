use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;

/// Header the host's authentication front end sets to the signed-in user
pub const USERNAME_HEADER: &str = "x-username";

/// The local user a request is made for
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Caller {
    pub username: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USERNAME_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|username| !username.is_empty())
            .map(|username| Caller {
                username: username.to_string(),
            })
            .ok_or_else(|| AppError::Unauthorized(format!("missing {} header", USERNAME_HEADER)))
    }
}
