//! Short-link code allocation.
//!
//! Codes are fixed-length alphanumeric strings drawn uniformly at random.
//! Collisions are resolved by redrawing against the unique constraint on
//! `short_links.code`, with a bounded number of attempts; the one-to-one
//! constraint on `recipe_id` makes allocation idempotent per recipe even
//! under concurrent requests.

use diesel::prelude::*;
use rand::distr::Alphanumeric;
use rand::Rng;
use thiserror::Error;
use uuid::Uuid;

use crate::db::is_unique_violation;
use crate::models::NewShortLink;
use crate::schema::short_links;

pub const CODE_LENGTH: usize = 3;

/// 62^3 codes is far more than we expect recipes, so a redraw almost always
/// succeeds on the first try. The cap turns code-space exhaustion into an
/// explicit error instead of an unbounded loop.
pub const MAX_ATTEMPTS: usize = 16;

const CODE_CONSTRAINT: &str = "short_links_code_key";

#[derive(Debug, Error)]
pub enum ShortCodeError {
    #[error("no free short code found after {MAX_ATTEMPTS} attempts")]
    Exhausted,
    #[error(transparent)]
    Database(#[from] diesel::result::Error),
}

pub fn generate_code() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(CODE_LENGTH)
        .map(char::from)
        .collect()
}

fn existing_code(conn: &mut PgConnection, recipe_id: Uuid) -> QueryResult<Option<String>> {
    short_links::table
        .filter(short_links::recipe_id.eq(recipe_id))
        .select(short_links::code)
        .first(conn)
        .optional()
}

/// Returns the recipe's short code, allocating one on first use. Two
/// consecutive calls for the same recipe always return the same code.
pub fn get_or_create(conn: &mut PgConnection, recipe_id: Uuid) -> Result<String, ShortCodeError> {
    if let Some(code) = existing_code(conn, recipe_id)? {
        return Ok(code);
    }

    for _ in 0..MAX_ATTEMPTS {
        let code = generate_code();
        let inserted = diesel::insert_into(short_links::table)
            .values(&NewShortLink {
                recipe_id,
                code: &code,
            })
            .execute(conn);

        match inserted {
            Ok(_) => return Ok(code),
            // Code already taken by some other recipe: redraw.
            Err(ref e) if is_unique_violation(e, Some(CODE_CONSTRAINT)) => continue,
            // Lost a race on recipe_id: a concurrent request allocated
            // first, so return the winner's code.
            Err(e) if is_unique_violation(&e, None) => {
                return existing_code(conn, recipe_id)?.ok_or(ShortCodeError::Database(e));
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(ShortCodeError::Exhausted)
}

/// Looks up the recipe a short code points at.
pub fn resolve(conn: &mut PgConnection, code: &str) -> QueryResult<Option<Uuid>> {
    short_links::table
        .filter(short_links::code.eq(code))
        .select(short_links::recipe_id)
        .first(conn)
        .optional()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_have_fixed_length() {
        for _ in 0..50 {
            assert_eq!(generate_code().len(), CODE_LENGTH);
        }
    }

    #[test]
    fn codes_are_alphanumeric() {
        for _ in 0..50 {
            let code = generate_code();
            assert!(code.chars().all(|c| c.is_ascii_alphanumeric()), "{code}");
        }
    }

    #[test]
    fn codes_vary_between_draws() {
        let distinct: std::collections::HashSet<String> =
            (0..100).map(|_| generate_code()).collect();
        assert!(distinct.len() > 1);
    }
}
