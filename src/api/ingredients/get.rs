use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::{ApiError, ErrorDetail};
use crate::db::DbPool;
use crate::models::Ingredient;
use crate::schema::ingredients;

use super::list::IngredientView;

#[utoipa::path(
    get,
    path = "/api/ingredients/{id}",
    tag = "ingredients",
    params(("id" = Uuid, Path, description = "Ingredient ID")),
    responses(
        (status = 200, description = "Ingredient", body = IngredientView),
        (status = 404, description = "Ingredient not found", body = ErrorDetail)
    )
)]
pub async fn get_ingredient(
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let ingredient: Ingredient = ingredients::table
        .find(id)
        .select(Ingredient::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Ingredient not found."))?;

    Ok(Json(IngredientView::from(ingredient)))
}
