use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::api::{ApiError, ErrorDetail};
use crate::auth::{create_session, verify_password};
use crate::db::DbPool;
use crate::models::User;
use crate::schema::users;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub auth_token: String,
}

#[utoipa::path(
    post,
    path = "/api/auth/token/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 400, description = "Invalid credentials", body = ErrorDetail)
    )
)]
pub async fn login(
    State(pool): State<Arc<DbPool>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let user: Option<User> = users::table
        .filter(users::email.eq(&req.email))
        .select(User::as_select())
        .first(&mut conn)
        .optional()?;

    // Same response whether the email is unknown or the password is wrong
    let user = user.ok_or_else(|| ApiError::BadRequest("Invalid email or password.".to_string()))?;
    if !verify_password(&req.password, &user.password_hash) {
        return Err(ApiError::BadRequest("Invalid email or password.".to_string()));
    }

    let auth_token = create_session(&mut conn, user.id)?;

    Ok((StatusCode::OK, Json(LoginResponse { auth_token })))
}
