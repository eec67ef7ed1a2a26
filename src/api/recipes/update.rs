use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::views::{self, RecipeView};
use crate::api::{ApiError, ErrorDetail};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::images::{decode_data_url, DecodedImage};
use crate::models::Recipe;
use crate::schema::recipes;

use super::{
    load_recipe, validate_cooking_time, validate_ingredients, write_ingredients, IngredientAmount,
};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateRecipeRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub cooking_time: Option<i32>,
    #[serde(default)]
    pub ingredients: Option<Vec<IngredientAmount>>,
    /// Optional base64 data URL
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::recipes)]
struct RecipeChanges<'a> {
    name: Option<&'a str>,
    text: Option<&'a str>,
    cooking_time: Option<i32>,
    image: Option<&'a [u8]>,
    image_content_type: Option<&'a str>,
}

#[utoipa::path(
    patch,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(("id" = Uuid, Path, description = "Recipe ID")),
    request_body = UpdateRecipeRequest,
    responses(
        (status = 200, description = "Recipe updated", body = RecipeView),
        (status = 400, description = "Validation failure"),
        (status = 401, description = "Unauthorized", body = ErrorDetail),
        (status = 403, description = "Not the author", body = ErrorDetail),
        (status = 404, description = "Recipe not found", body = ErrorDetail)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateRecipeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(name) = &req.name {
        if name.trim().is_empty() {
            return Err(ApiError::field("name", "Must not be empty."));
        }
    }
    if let Some(text) = &req.text {
        if text.trim().is_empty() {
            return Err(ApiError::field("text", "Must not be empty."));
        }
    }
    if let Some(cooking_time) = req.cooking_time {
        validate_cooking_time(cooking_time)?;
    }

    let image: Option<DecodedImage> = req
        .image
        .as_deref()
        .map(decode_data_url)
        .transpose()
        .map_err(|e| ApiError::field("image", e.to_string()))?;

    let mut conn = pool.get()?;

    let recipe = load_recipe(&mut conn, id)?;
    if recipe.author_id != user.id {
        return Err(ApiError::Forbidden("Only the author can edit a recipe."));
    }

    if let Some(items) = &req.ingredients {
        validate_ingredients(&mut conn, items)?;
    }

    let changes = RecipeChanges {
        name: req.name.as_deref(),
        text: req.text.as_deref(),
        cooking_time: req.cooking_time,
        image: image.as_ref().map(|img| img.data.as_slice()),
        image_content_type: image.as_ref().map(|img| img.content_type.as_str()),
    };

    let has_column_changes = changes.name.is_some()
        || changes.text.is_some()
        || changes.cooking_time.is_some()
        || changes.image.is_some();

    let updated: Recipe = conn.transaction(|conn| {
        let updated = if has_column_changes {
            diesel::update(recipes::table.find(recipe.id))
                .set(&changes)
                .returning(Recipe::as_returning())
                .get_result(conn)?
        } else {
            recipe
        };

        if let Some(items) = &req.ingredients {
            write_ingredients(conn, updated.id, items)?;
        }

        Ok::<_, diesel::result::Error>(updated)
    })?;

    let author = user.clone();
    let view = views::recipe_view(&mut conn, updated, author, Some(&user))?;
    Ok(Json(view))
}
