use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::{ApiError, ErrorDetail};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::schema::recipes;

use super::load_recipe;

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(("id" = Uuid, Path, description = "Recipe ID")),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Unauthorized", body = ErrorDetail),
        (status = 403, description = "Not the author", body = ErrorDetail),
        (status = 404, description = "Recipe not found", body = ErrorDetail)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let recipe = load_recipe(&mut conn, id)?;
    if recipe.author_id != user.id {
        return Err(ApiError::Forbidden("Only the author can delete a recipe."));
    }

    // Ingredient links, favorites, cart entries and short links go with it
    // via ON DELETE CASCADE
    diesel::delete(recipes::table.find(recipe.id)).execute(&mut conn)?;

    Ok(StatusCode::NO_CONTENT)
}
