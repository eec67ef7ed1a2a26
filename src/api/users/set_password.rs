use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::api::{ApiError, ErrorDetail};
use crate::auth::{hash_password, verify_password, AuthUser};
use crate::db::DbPool;
use crate::schema::users;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetPasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[utoipa::path(
    post,
    path = "/api/users/set_password",
    tag = "users",
    request_body = SetPasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Wrong current password or invalid new password"),
        (status = 401, description = "Unauthorized", body = ErrorDetail)
    ),
    security(("bearer_auth" = []))
)]
pub async fn set_password(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(req): Json<SetPasswordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !verify_password(&req.current_password, &user.password_hash) {
        return Err(ApiError::field("current_password", "Wrong password."));
    }
    if req.new_password.len() < 8 {
        return Err(ApiError::field(
            "new_password",
            "Password must be at least 8 characters.",
        ));
    }

    let password_hash = hash_password(&req.new_password)
        .map_err(|e| ApiError::Internal(format!("failed to hash password: {e}")))?;

    let mut conn = pool.get()?;

    diesel::update(users::table.find(user.id))
        .set(users::password_hash.eq(&password_hash))
        .execute(&mut conn)?;

    Ok(StatusCode::NO_CONTENT)
}
