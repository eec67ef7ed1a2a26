use axum::{response::IntoResponse, Json};

use crate::api::views::UserView;
use crate::api::{ApiError, ErrorDetail};
use crate::auth::AuthUser;

#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "users",
    responses(
        (status = 200, description = "Own profile", body = UserView),
        (status = 401, description = "Unauthorized", body = ErrorDetail)
    ),
    security(("bearer_auth" = []))
)]
pub async fn me(AuthUser(user): AuthUser) -> Result<impl IntoResponse, ApiError> {
    // Nobody can subscribe to themselves, so the flag is always false here
    Ok(Json(UserView::new(&user, false)))
}
