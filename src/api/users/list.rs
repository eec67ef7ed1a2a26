use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::pagination::PageParams;
use crate::api::views::UserView;
use crate::api::ApiError;
use crate::auth::MaybeAuthUser;
use crate::db::DbPool;
use crate::models::User;
use crate::schema::{subscriptions, users};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserListResponse {
    pub count: i64,
    pub results: Vec<UserView>,
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    params(PageParams),
    responses(
        (status = 200, description = "Page of users", body = UserListResponse)
    )
)]
pub async fn list_users(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let count: i64 = users::table.count().get_result(&mut conn)?;

    let page: Vec<User> = users::table
        .order(users::created_at.asc())
        .limit(params.limit())
        .offset(params.offset())
        .select(User::as_select())
        .load(&mut conn)?;

    let subscribed_to: HashSet<Uuid> = match &viewer {
        Some(user) => subscriptions::table
            .filter(subscriptions::subscriber_id.eq(user.id))
            .filter(subscriptions::author_id.eq_any(page.iter().map(|u| u.id)))
            .select(subscriptions::author_id)
            .load::<Uuid>(&mut conn)?
            .into_iter()
            .collect(),
        None => HashSet::new(),
    };

    let results = page
        .iter()
        .map(|user| UserView::new(user, subscribed_to.contains(&user.id)))
        .collect();

    Ok(Json(UserListResponse { count, results }))
}
