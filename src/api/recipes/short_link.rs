use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::{ApiError, ErrorDetail};
use crate::db::DbPool;
use crate::short_code::{self, ShortCodeError};

use super::load_recipe;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShortLinkResponse {
    #[serde(rename = "short-link")]
    pub short_link: String,
}

fn base_url() -> String {
    std::env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}/get-link",
    tag = "recipes",
    params(("id" = Uuid, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Short link for the recipe", body = ShortLinkResponse),
        (status = 404, description = "Recipe not found", body = ErrorDetail)
    )
)]
pub async fn get_link(
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let recipe = load_recipe(&mut conn, id)?;

    let code = short_code::get_or_create(&mut conn, recipe.id).map_err(|e| match e {
        ShortCodeError::Exhausted => ApiError::Internal(e.to_string()),
        ShortCodeError::Database(e) => e.into(),
    })?;

    Ok(Json(ShortLinkResponse {
        short_link: format!("{}/s/{}", base_url(), code),
    }))
}
