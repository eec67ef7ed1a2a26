use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::views::{self, UserView};
use crate::api::{ApiError, ErrorDetail};
use crate::auth::MaybeAuthUser;
use crate::db::DbPool;
use crate::models::User;
use crate::schema::users;

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User profile", body = UserView),
        (status = 404, description = "User not found", body = ErrorDetail)
    )
)]
pub async fn get_user(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let user: User = users::table
        .find(id)
        .select(User::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("User not found."))?;

    let is_subscribed = views::is_subscribed(&mut conn, viewer.as_ref(), user.id)?;

    Ok(Json(UserView::new(&user, is_subscribed)))
}
