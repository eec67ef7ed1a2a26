use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::{ApiError, ErrorDetail};
use crate::db::DbPool;

use super::load_recipe;

#[utoipa::path(
    get,
    path = "/api/recipes/{id}/image",
    tag = "recipes",
    params(("id" = Uuid, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Recipe image bytes"),
        (status = 404, description = "Recipe or image not found", body = ErrorDetail)
    )
)]
pub async fn serve_image(
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let recipe = load_recipe(&mut conn, id)?;

    let (Some(data), Some(content_type)) = (recipe.image, recipe.image_content_type) else {
        return Err(ApiError::NotFound("Recipe has no image."));
    };

    Ok(([(header::CONTENT_TYPE, content_type)], data))
}
