use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::views::{self, RecipeView};
use crate::api::{ApiError, ErrorDetail};
use crate::auth::MaybeAuthUser;
use crate::db::DbPool;
use crate::models::User;
use crate::schema::users;

use super::load_recipe;

#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(("id" = Uuid, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Recipe details", body = RecipeView),
        (status = 404, description = "Recipe not found", body = ErrorDetail)
    )
)]
pub async fn get_recipe(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let recipe = load_recipe(&mut conn, id)?;

    let author: User = users::table
        .find(recipe.author_id)
        .select(User::as_select())
        .first(&mut conn)?;

    let view = views::recipe_view(&mut conn, recipe, author, viewer.as_ref())?;
    Ok(Json(view))
}
