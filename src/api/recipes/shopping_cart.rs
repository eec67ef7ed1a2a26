use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::views::RecipeSummary;
use crate::api::{ApiError, ErrorDetail};
use crate::auth::AuthUser;
use crate::db::DbPool;

use super::toggles::{self, Relation};
use super::load_recipe;

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/shopping_cart",
    tag = "recipes",
    params(("id" = Uuid, Path, description = "Recipe ID")),
    responses(
        (status = 201, description = "Recipe added to the shopping cart", body = RecipeSummary),
        (status = 400, description = "Already in the shopping cart", body = ErrorDetail),
        (status = 401, description = "Unauthorized", body = ErrorDetail),
        (status = 404, description = "Recipe not found", body = ErrorDetail)
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_to_cart(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let recipe = load_recipe(&mut conn, id)?;
    toggles::add(&mut conn, Relation::Cart, user.id, recipe.id)?;

    Ok((StatusCode::CREATED, Json(RecipeSummary::new(&recipe))))
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/shopping_cart",
    tag = "recipes",
    params(("id" = Uuid, Path, description = "Recipe ID")),
    responses(
        (status = 204, description = "Recipe removed from the shopping cart"),
        (status = 400, description = "Was not in the shopping cart", body = ErrorDetail),
        (status = 401, description = "Unauthorized", body = ErrorDetail),
        (status = 404, description = "Recipe not found", body = ErrorDetail)
    ),
    security(("bearer_auth" = []))
)]
pub async fn remove_from_cart(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let recipe = load_recipe(&mut conn, id)?;
    toggles::remove(&mut conn, Relation::Cart, user.id, recipe.id)?;

    Ok(StatusCode::NO_CONTENT)
}
