use axum::{extract::State, http::HeaderMap, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

use crate::api::{ApiError, ErrorDetail};
use crate::auth::{bearer_token, delete_session, AuthUser};
use crate::db::DbPool;

#[utoipa::path(
    post,
    path = "/api/auth/token/logout",
    tag = "auth",
    responses(
        (status = 204, description = "Session removed"),
        (status = 401, description = "Unauthorized", body = ErrorDetail)
    ),
    security(("bearer_auth" = []))
)]
pub async fn logout(
    AuthUser(_user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    // AuthUser already validated the header, so the token is present
    if let Some(token) = bearer_token(&headers) {
        delete_session(&mut conn, token)?;
    }

    Ok(StatusCode::NO_CONTENT)
}
