use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use diesel::pg::Pg;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::api::pagination::PageParams;
use crate::api::views::{self, RecipeView};
use crate::api::ApiError;
use crate::auth::MaybeAuthUser;
use crate::db::DbPool;
use crate::models::{Recipe, User};
use crate::schema::{cart_items, favorites, recipes, users};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct RecipeListParams {
    /// Page size (default 10)
    pub limit: Option<i64>,
    /// Number of items to skip (default 0)
    pub offset: Option<i64>,
    /// Only recipes by this author
    pub author: Option<Uuid>,
    /// 1/0 or true/false; only meaningful for authenticated callers
    pub is_favorited: Option<String>,
    /// 1/0 or true/false; only meaningful for authenticated callers
    pub is_in_shopping_cart: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeListResponse {
    pub count: i64,
    pub results: Vec<RecipeView>,
}

/// Parses the 1/0/true/false flag convention; anything else means the
/// filter is absent.
pub(crate) fn parse_flag(value: Option<&str>) -> Option<bool> {
    match value {
        Some("1") | Some("true") => Some(true),
        Some("0") | Some("false") => Some(false),
        _ => None,
    }
}

type BoxedRecipeQuery<'a> = recipes::BoxedQuery<'a, Pg>;

fn filtered(params: &RecipeListParams, viewer: Option<&User>) -> BoxedRecipeQuery<'static> {
    let mut query = recipes::table.into_boxed();

    if let Some(author) = params.author {
        query = query.filter(recipes::author_id.eq(author));
    }

    // The relation filters silently do nothing for anonymous callers
    if let Some(user) = viewer {
        if let Some(flag) = parse_flag(params.is_favorited.as_deref()) {
            let favorited = favorites::table
                .filter(favorites::user_id.eq(user.id))
                .select(favorites::recipe_id);
            query = if flag {
                query.filter(recipes::id.eq_any(favorited))
            } else {
                query.filter(recipes::id.ne_all(favorited))
            };
        }
        if let Some(flag) = parse_flag(params.is_in_shopping_cart.as_deref()) {
            let in_cart = cart_items::table
                .filter(cart_items::user_id.eq(user.id))
                .select(cart_items::recipe_id);
            query = if flag {
                query.filter(recipes::id.eq_any(in_cart))
            } else {
                query.filter(recipes::id.ne_all(in_cart))
            };
        }
    }

    query
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    params(RecipeListParams),
    responses(
        (status = 200, description = "Page of recipes, newest first", body = RecipeListResponse)
    )
)]
pub async fn list_recipes(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<RecipeListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let page = PageParams {
        limit: params.limit,
        offset: params.offset,
    };

    let mut conn = pool.get()?;

    let count: i64 = filtered(&params, viewer.as_ref())
        .count()
        .get_result(&mut conn)?;

    let items: Vec<Recipe> = filtered(&params, viewer.as_ref())
        .order(recipes::created_at.desc())
        .limit(page.limit())
        .offset(page.offset())
        .select(Recipe::as_select())
        .load(&mut conn)?;

    let author_ids: Vec<Uuid> = items.iter().map(|r| r.author_id).collect();
    let authors: HashMap<Uuid, User> = users::table
        .filter(users::id.eq_any(&author_ids))
        .select(User::as_select())
        .load::<User>(&mut conn)?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let pairs: Vec<(Recipe, User)> = items
        .into_iter()
        .filter_map(|recipe| {
            let author = authors.get(&recipe.author_id).cloned()?;
            Some((recipe, author))
        })
        .collect();

    let results = views::recipe_views(&mut conn, pairs, viewer.as_ref())?;

    Ok(Json(RecipeListResponse { count, results }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_parsing() {
        assert_eq!(parse_flag(Some("1")), Some(true));
        assert_eq!(parse_flag(Some("true")), Some(true));
        assert_eq!(parse_flag(Some("0")), Some(false));
        assert_eq!(parse_flag(Some("false")), Some(false));
        assert_eq!(parse_flag(Some("yes")), None);
        assert_eq!(parse_flag(None), None);
    }
}
