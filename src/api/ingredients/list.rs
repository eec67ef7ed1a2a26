use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::api::pagination::PageParams;
use crate::api::ApiError;
use crate::db::DbPool;
use crate::models::Ingredient;
use crate::schema::ingredients;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IngredientView {
    pub id: Uuid,
    pub name: String,
    pub measurement_unit: String,
}

impl From<Ingredient> for IngredientView {
    fn from(i: Ingredient) -> Self {
        IngredientView {
            id: i.id,
            name: i.name,
            measurement_unit: i.measurement_unit,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct IngredientListParams {
    /// Name prefix to search for
    pub name: Option<String>,
    /// Page size (default 10)
    pub limit: Option<i64>,
    /// Number of items to skip (default 0)
    pub offset: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/api/ingredients",
    tag = "ingredients",
    params(IngredientListParams),
    responses(
        (status = 200, description = "Matching ingredients", body = [IngredientView])
    )
)]
pub async fn list_ingredients(
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<IngredientListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let page = PageParams {
        limit: params.limit,
        offset: params.offset,
    };

    let mut conn = pool.get()?;

    let mut query = ingredients::table
        .order(ingredients::name.asc())
        .select(Ingredient::as_select())
        .into_boxed();

    if let Some(name) = params.name.as_deref().filter(|n| !n.is_empty()) {
        // Prefix search; escape LIKE metacharacters in the needle
        let needle = name
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        query = query.filter(ingredients::name.ilike(format!("{needle}%")));
    }

    let items: Vec<Ingredient> = query
        .limit(page.limit())
        .offset(page.offset())
        .load(&mut conn)?;

    let results: Vec<IngredientView> = items.into_iter().map(IngredientView::from).collect();
    Ok(Json(results))
}
