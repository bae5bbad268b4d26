use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;

/// Header carrying the id of the already authenticated user.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The caller's user id, taken from [`USER_ID_HEADER`]. The value is trusted
/// as is; authentication happens in front of this service.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub String);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| CurrentUser(value.to_string()))
            .ok_or_else(|| ApiError::Unauthorized("Missing X-User-Id header".to_string()))
    }
}
