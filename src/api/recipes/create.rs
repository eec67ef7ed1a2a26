use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::api::views::{self, RecipeView};
use crate::api::{ApiError, ErrorDetail};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::images::decode_data_url;
use crate::models::{NewRecipe, Recipe};
use crate::schema::recipes;

use super::{validate_cooking_time, validate_ingredients, write_ingredients, IngredientAmount};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateRecipeRequest {
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub ingredients: Vec<IngredientAmount>,
    /// Optional base64 data URL
    #[serde(default)]
    pub image: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body = CreateRecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = RecipeView),
        (status = 400, description = "Validation failure"),
        (status = 401, description = "Unauthorized", body = ErrorDetail)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(req): Json<CreateRecipeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::field("name", "Required field."));
    }
    if req.text.trim().is_empty() {
        return Err(ApiError::field("text", "Required field."));
    }
    validate_cooking_time(req.cooking_time)?;

    let image = req
        .image
        .as_deref()
        .map(decode_data_url)
        .transpose()
        .map_err(|e| ApiError::field("image", e.to_string()))?;

    let mut conn = pool.get()?;

    validate_ingredients(&mut conn, &req.ingredients)?;

    let recipe: Recipe = conn.transaction(|conn| {
        let new_recipe = NewRecipe {
            author_id: user.id,
            name: &req.name,
            text: &req.text,
            cooking_time: req.cooking_time,
            image: image.as_ref().map(|img| img.data.as_slice()),
            image_content_type: image.as_ref().map(|img| img.content_type.as_str()),
        };

        let recipe: Recipe = diesel::insert_into(recipes::table)
            .values(&new_recipe)
            .returning(Recipe::as_returning())
            .get_result(conn)?;

        write_ingredients(conn, recipe.id, &req.ingredients)?;

        Ok::<_, diesel::result::Error>(recipe)
    })?;

    let view = views::recipe_view(&mut conn, recipe, user.clone(), Some(&user))?;
    Ok((StatusCode::CREATED, Json(view)))
}
