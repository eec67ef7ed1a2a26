use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::{ApiError, ErrorDetail};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::images::decode_data_url;
use crate::schema::users;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetAvatarRequest {
    /// base64 data URL
    pub avatar: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AvatarResponse {
    pub avatar: String,
}

#[utoipa::path(
    put,
    path = "/api/users/me/avatar",
    tag = "users",
    request_body = SetAvatarRequest,
    responses(
        (status = 200, description = "Avatar updated", body = AvatarResponse),
        (status = 400, description = "Invalid image payload"),
        (status = 401, description = "Unauthorized", body = ErrorDetail)
    ),
    security(("bearer_auth" = []))
)]
pub async fn set_avatar(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(req): Json<SetAvatarRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let image =
        decode_data_url(&req.avatar).map_err(|e| ApiError::field("avatar", e.to_string()))?;

    let mut conn = pool.get()?;

    diesel::update(users::table.find(user.id))
        .set((
            users::avatar.eq(Some(image.data)),
            users::avatar_content_type.eq(Some(image.content_type)),
        ))
        .execute(&mut conn)?;

    Ok(Json(AvatarResponse {
        avatar: format!("/api/users/{}/avatar", user.id),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/users/me/avatar",
    tag = "users",
    responses(
        (status = 204, description = "Avatar removed"),
        (status = 401, description = "Unauthorized", body = ErrorDetail)
    ),
    security(("bearer_auth" = []))
)]
pub async fn clear_avatar(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    diesel::update(users::table.find(user.id))
        .set((
            users::avatar.eq(None::<Vec<u8>>),
            users::avatar_content_type.eq(None::<String>),
        ))
        .execute(&mut conn)?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/users/{id}/avatar",
    tag = "users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Avatar image bytes"),
        (status = 404, description = "No avatar", body = ErrorDetail)
    )
)]
pub async fn serve_avatar(
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let mut conn = pool.get()?;

    let row: Option<(Option<Vec<u8>>, Option<String>)> = users::table
        .find(id)
        .select((users::avatar, users::avatar_content_type))
        .first(&mut conn)
        .optional()?;

    match row {
        Some((Some(data), content_type)) => {
            let content_type = content_type.unwrap_or_else(|| "application/octet-stream".to_string());
            Ok(([(header::CONTENT_TYPE, content_type)], data).into_response())
        }
        _ => Err(ApiError::NotFound("User has no avatar.")),
    }
}
