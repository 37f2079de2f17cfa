//! Caller Resolution
//!
//! `Authorization: Bearer <token>` is handed to the session oracle; the
//! handler only ever sees the resolved [`UserId`].

use agency_core::UserId;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated caller
#[derive(Clone, Debug)]
pub struct CurrentUser(pub UserId);

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(ApiError::unauthorized)?;

        let user_id = state.sessions.resolve(token).await.map_err(|e| {
            tracing::warn!(path = %parts.uri.path(), error = %e, "Rejected session");
            ApiError::unauthorized()
        })?;

        Ok(Self(user_id))
    }
}
