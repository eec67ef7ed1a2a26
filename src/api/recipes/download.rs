use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};
use diesel::prelude::*;
use std::sync::Arc;

use crate::api::{ApiError, ErrorDetail};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::schema::{cart_items, ingredients, recipe_ingredients, recipes};
use crate::shopping_list;

#[utoipa::path(
    get,
    path = "/api/recipes/download_shopping_cart",
    tag = "recipes",
    responses(
        (status = 200, description = "Consolidated shopping list as a PDF", content_type = "application/pdf"),
        (status = 401, description = "Unauthorized", body = ErrorDetail)
    ),
    security(("bearer_auth" = []))
)]
pub async fn download_shopping_cart(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let rows: Vec<(String, String, i32)> = cart_items::table
        .inner_join(
            recipes::table.inner_join(recipe_ingredients::table.inner_join(ingredients::table)),
        )
        .filter(cart_items::user_id.eq(user.id))
        .select((
            ingredients::name,
            ingredients::measurement_unit,
            recipe_ingredients::amount,
        ))
        .load(&mut conn)?;

    let lines = shopping_list::aggregate(rows);
    let pdf = shopping_list::render_pdf(&lines)
        .map_err(|e| ApiError::Internal(format!("shopping list render failed: {e}")))?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"shopping_list.pdf\"",
            ),
        ],
        pdf,
    ))
}
