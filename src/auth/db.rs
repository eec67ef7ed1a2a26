use chrono::{Duration, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::models::{NewSession, User};
use crate::schema::{sessions, users};

use super::crypto::{generate_token, hash_token};

const SESSION_LIFETIME_DAYS: i64 = 30;

/// Creates a session row and returns the plaintext token for the client.
pub fn create_session(conn: &mut PgConnection, user_id: Uuid) -> QueryResult<String> {
    let token = generate_token();
    let token_hash = hash_token(&token);
    let expires_at = Utc::now() + Duration::days(SESSION_LIFETIME_DAYS);

    let new_session = NewSession {
        user_id,
        token_hash: &token_hash,
        expires_at,
    };

    diesel::insert_into(sessions::table)
        .values(&new_session)
        .execute(conn)?;

    Ok(token)
}

/// Removes the session behind a token. Logging out an unknown token is a
/// no-op.
pub fn delete_session(conn: &mut PgConnection, token: &str) -> QueryResult<usize> {
    let token_hash = hash_token(token);
    diesel::delete(sessions::table.filter(sessions::token_hash.eq(&token_hash))).execute(conn)
}

pub async fn get_user_from_token(pool: &DbPool, token: &str) -> Option<User> {
    let mut conn = pool.get().ok()?;
    let token_hash = hash_token(token);

    sessions::table
        .inner_join(users::table)
        .filter(sessions::token_hash.eq(&token_hash))
        .filter(sessions::expires_at.gt(Utc::now()))
        .select(User::as_select())
        .first(&mut conn)
        .ok()
}
