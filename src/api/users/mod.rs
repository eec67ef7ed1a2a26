pub mod avatar;
pub mod create;
pub mod get;
pub mod list;
pub mod me;
pub mod set_password;
pub mod subscribe;
pub mod subscriptions;

use crate::AppState;
use axum::routing::{get, post, put};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/users endpoints (mounted at /api/users)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_users).post(create::register))
        .route("/me", get(me::me))
        .route(
            "/me/avatar",
            put(avatar::set_avatar).delete(avatar::clear_avatar),
        )
        .route("/set_password", post(set_password::set_password))
        .route("/subscriptions", get(subscriptions::list_subscriptions))
        .route("/{id}", get(get::get_user))
        .route("/{id}/avatar", get(avatar::serve_avatar))
        .route(
            "/{id}/subscribe",
            post(subscribe::subscribe).delete(subscribe::unsubscribe),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::register,
        list::list_users,
        get::get_user,
        me::me,
        avatar::set_avatar,
        avatar::clear_avatar,
        avatar::serve_avatar,
        set_password::set_password,
        subscriptions::list_subscriptions,
        subscribe::subscribe,
        subscribe::unsubscribe,
    ),
    components(schemas(
        create::RegisterRequest,
        list::UserListResponse,
        avatar::SetAvatarRequest,
        avatar::AvatarResponse,
        set_password::SetPasswordRequest,
        subscriptions::SubscriptionListResponse,
    ))
)]
pub struct ApiDoc;
