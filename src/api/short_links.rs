//! Public short-link resolver. Lives outside /api so the codes stay
//! compact: GET /s/{code} redirects to the recipe's frontend page.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
    routing::get,
    Router,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::api::{ApiError, ErrorDetail};
use crate::db::DbPool;
use crate::short_code;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/s/{code}", get(resolve_short_link))
}

#[derive(OpenApi)]
#[openapi(paths(resolve_short_link))]
pub struct ApiDoc;

#[utoipa::path(
    get,
    path = "/s/{code}",
    tag = "short-links",
    params(("code" = String, Path, description = "Short link code")),
    responses(
        (status = 302, description = "Redirect to the recipe page"),
        (status = 404, description = "Unknown code", body = ErrorDetail)
    )
)]
pub async fn resolve_short_link(
    State(pool): State<Arc<DbPool>>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let recipe_id = short_code::resolve(&mut conn, &code)?
        .ok_or(ApiError::NotFound("Unknown short link."))?;

    Ok(Redirect::temporary(&format!("/recipes/{recipe_id}")))
}
