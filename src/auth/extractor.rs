use axum::extract::{FromRef, FromRequestParts};
use axum::http::{header, request::Parts, HeaderMap};
use std::sync::Arc;

use crate::api::ApiError;
use crate::db::DbPool;
use crate::models::User;

use super::db::get_user_from_token;

/// Extractor that validates the Authorization header and provides the
/// authenticated user. Handlers that require authentication take this as an
/// argument; the rejection is a 401.
pub struct AuthUser(pub User);

/// Like [`AuthUser`], but never rejects: read-open endpoints use this to
/// personalize responses (is_favorited, is_subscribed, ...) when a valid
/// token happens to be present.
pub struct MaybeAuthUser(pub Option<User>);

/// Pulls the bearer token out of the Authorization header, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<DbPool>: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let pool = Arc::<DbPool>::from_ref(state);

        let token = bearer_token(&parts.headers)
            .ok_or(ApiError::Unauthorized("Authentication required."))?;

        let user = get_user_from_token(&pool, token)
            .await
            .ok_or(ApiError::Unauthorized("Invalid or expired token."))?;

        Ok(AuthUser(user))
    }
}

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
    Arc<DbPool>: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let pool = Arc::<DbPool>::from_ref(state);

        let user = match bearer_token(&parts.headers) {
            Some(token) => get_user_from_token(&pool, token).await,
            None => None,
        };

        Ok(MaybeAuthUser(user))
    }
}
