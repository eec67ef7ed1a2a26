use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::api::views::{self, UserWithRecipesView};
use crate::api::{ApiError, ErrorDetail};
use crate::auth::AuthUser;
use crate::db::{is_unique_violation, DbPool};
use crate::models::{NewSubscription, User};
use crate::schema::{subscriptions, users};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SubscribeParams {
    /// Cap on the number of recipes embedded in the response
    pub recipes_limit: Option<i64>,
}

fn load_author(conn: &mut PgConnection, id: Uuid) -> Result<User, ApiError> {
    users::table
        .find(id)
        .select(User::as_select())
        .first(conn)
        .optional()?
        .ok_or(ApiError::NotFound("User not found."))
}

#[utoipa::path(
    post,
    path = "/api/users/{id}/subscribe",
    tag = "users",
    params(("id" = Uuid, Path, description = "Author ID"), SubscribeParams),
    responses(
        (status = 201, description = "Subscribed", body = UserWithRecipesView),
        (status = 400, description = "Already subscribed, or subscribing to oneself", body = ErrorDetail),
        (status = 401, description = "Unauthorized", body = ErrorDetail),
        (status = 404, description = "User not found", body = ErrorDetail)
    ),
    security(("bearer_auth" = []))
)]
pub async fn subscribe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
    Query(params): Query<SubscribeParams>,
) -> Result<impl IntoResponse, ApiError> {
    // Checked before touching the author row: self-subscription is invalid
    // regardless of any existing state
    if id == user.id {
        return Err(ApiError::BadRequest(
            "Cannot subscribe to yourself.".to_string(),
        ));
    }

    let mut conn = pool.get()?;
    let author = load_author(&mut conn, id)?;

    diesel::insert_into(subscriptions::table)
        .values(&NewSubscription {
            subscriber_id: user.id,
            author_id: author.id,
        })
        .execute(&mut conn)
        .map_err(|e| {
            if is_unique_violation(&e, None) {
                ApiError::BadRequest("Already subscribed to this user.".to_string())
            } else {
                e.into()
            }
        })?;

    let view = views::user_with_recipes(&mut conn, &author, true, params.recipes_limit)?;
    Ok((StatusCode::CREATED, Json(view)))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}/subscribe",
    tag = "users",
    params(("id" = Uuid, Path, description = "Author ID")),
    responses(
        (status = 204, description = "Unsubscribed"),
        (status = 400, description = "Was not subscribed", body = ErrorDetail),
        (status = 401, description = "Unauthorized", body = ErrorDetail),
        (status = 404, description = "User not found", body = ErrorDetail)
    ),
    security(("bearer_auth" = []))
)]
pub async fn unsubscribe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;
    let author = load_author(&mut conn, id)?;

    let deleted = diesel::delete(
        subscriptions::table
            .filter(subscriptions::subscriber_id.eq(user.id))
            .filter(subscriptions::author_id.eq(author.id)),
    )
    .execute(&mut conn)?;

    if deleted == 0 {
        return Err(ApiError::BadRequest(
            "Was not subscribed to this user.".to_string(),
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}
