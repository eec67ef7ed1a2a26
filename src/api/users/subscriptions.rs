use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::api::pagination::PageParams;
use crate::api::views::{self, UserWithRecipesView};
use crate::api::{ApiError, ErrorDetail};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::models::User;
use crate::schema::{subscriptions, users};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SubscriptionListParams {
    /// Page size (default 10)
    pub limit: Option<i64>,
    /// Number of items to skip (default 0)
    pub offset: Option<i64>,
    /// Cap on the number of recipes embedded per author
    pub recipes_limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubscriptionListResponse {
    pub count: i64,
    pub results: Vec<UserWithRecipesView>,
}

#[utoipa::path(
    get,
    path = "/api/users/subscriptions",
    tag = "users",
    params(SubscriptionListParams),
    responses(
        (status = 200, description = "Authors the caller is subscribed to", body = SubscriptionListResponse),
        (status = 401, description = "Unauthorized", body = ErrorDetail)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_subscriptions(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<SubscriptionListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let page = PageParams {
        limit: params.limit,
        offset: params.offset,
    };

    let mut conn = pool.get()?;

    let count: i64 = subscriptions::table
        .filter(subscriptions::subscriber_id.eq(user.id))
        .count()
        .get_result(&mut conn)?;

    let author_ids: Vec<Uuid> = subscriptions::table
        .filter(subscriptions::subscriber_id.eq(user.id))
        .order(subscriptions::created_at.desc())
        .limit(page.limit())
        .offset(page.offset())
        .select(subscriptions::author_id)
        .load(&mut conn)?;

    let mut authors: HashMap<Uuid, User> = users::table
        .filter(users::id.eq_any(&author_ids))
        .select(User::as_select())
        .load::<User>(&mut conn)?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    // Keep subscription order (newest first)
    let mut results = Vec::with_capacity(author_ids.len());
    for id in author_ids {
        if let Some(author) = authors.remove(&id) {
            results.push(views::user_with_recipes(
                &mut conn,
                &author,
                true,
                params.recipes_limit,
            )?);
        }
    }

    Ok(Json(SubscriptionListResponse { count, results }))
}
