use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::api::views::UserView;
use crate::api::ApiError;
use crate::auth::hash_password;
use crate::db::{is_unique_violation, DbPool};
use crate::images::decode_data_url;
use crate::models::{NewUser, User};
use crate::schema::users;

const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    /// Optional base64 data URL
    #[serde(default)]
    pub avatar: Option<String>,
}

pub(crate) fn valid_username(username: &str) -> bool {
    !username.is_empty()
        && username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '@' | '+' | '-'))
}

fn validate(req: &RegisterRequest) -> Result<(), ApiError> {
    let mut errors: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();

    if req.email.trim().is_empty() || !req.email.contains('@') {
        errors.insert("email", vec!["Enter a valid email address.".to_string()]);
    }
    if !valid_username(&req.username) {
        errors.insert(
            "username",
            vec!["Letters, digits and _ . @ + - only.".to_string()],
        );
    }
    if req.first_name.trim().is_empty() {
        errors.insert("first_name", vec!["Required field.".to_string()]);
    }
    if req.last_name.trim().is_empty() {
        errors.insert("last_name", vec!["Required field.".to_string()]);
    }
    if req.password.len() < MIN_PASSWORD_LENGTH {
        errors.insert(
            "password",
            vec![format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters."
            )],
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = UserView),
        (status = 400, description = "Validation failure or duplicate email/username")
    )
)]
pub async fn register(
    State(pool): State<Arc<DbPool>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate(&req)?;

    let avatar = req
        .avatar
        .as_deref()
        .map(decode_data_url)
        .transpose()
        .map_err(|e| ApiError::field("avatar", e.to_string()))?;

    let password_hash = hash_password(&req.password)
        .map_err(|e| ApiError::Internal(format!("failed to hash password: {e}")))?;

    let mut conn = pool.get()?;

    let new_user = NewUser {
        email: &req.email,
        username: &req.username,
        first_name: &req.first_name,
        last_name: &req.last_name,
        password_hash: &password_hash,
        avatar: avatar.as_ref().map(|img| img.data.as_slice()),
        avatar_content_type: avatar.as_ref().map(|img| img.content_type.as_str()),
    };

    let user: User = diesel::insert_into(users::table)
        .values(&new_user)
        .returning(User::as_returning())
        .get_result(&mut conn)
        .map_err(|e| {
            if is_unique_violation(&e, Some("users_email_key")) {
                ApiError::field("email", "A user with this email already exists.")
            } else if is_unique_violation(&e, Some("users_username_key")) {
                ApiError::field("username", "A user with this username already exists.")
            } else {
                e.into()
            }
        })?;

    Ok((StatusCode::CREATED, Json(UserView::new(&user, false))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_charset() {
        assert!(valid_username("chef.remy_2024"));
        assert!(valid_username("user@host+x-1"));
        assert!(!valid_username(""));
        assert!(!valid_username("no spaces"));
        assert!(!valid_username("no/slash"));
    }

    fn request() -> RegisterRequest {
        RegisterRequest {
            email: "remy@example.com".to_string(),
            username: "remy".to_string(),
            first_name: "Remy".to_string(),
            last_name: "Linguini".to_string(),
            password: "ratatouille".to_string(),
            avatar: None,
        }
    }

    #[test]
    fn accepts_complete_request() {
        assert!(validate(&request()).is_ok());
    }

    #[test]
    fn collects_all_field_errors() {
        let req = RegisterRequest {
            email: "nope".to_string(),
            password: "short".to_string(),
            first_name: String::new(),
            ..request()
        };
        match validate(&req) {
            Err(ApiError::Validation(errors)) => {
                assert!(errors.contains_key("email"));
                assert!(errors.contains_key("password"));
                assert!(errors.contains_key("first_name"));
                assert!(!errors.contains_key("username"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
