//! Shared plumbing for the favorite and shopping-cart pair endpoints.
//! Both relations are plain (user, recipe) join rows with a uniqueness
//! constraint, so adding and removing them only differ in the table and
//! the wording of the duplicate/missing errors.

use diesel::prelude::*;
use uuid::Uuid;

use crate::api::ApiError;
use crate::db::{self, DbConn};
use crate::models::{NewCartItem, NewFavorite};
use crate::schema::{cart_items, favorites};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Favorite,
    Cart,
}

impl Relation {
    fn constraint(self) -> &'static str {
        match self {
            Relation::Favorite => "favorites_user_recipe_key",
            Relation::Cart => "cart_items_user_recipe_key",
        }
    }

    fn already_added(self) -> &'static str {
        match self {
            Relation::Favorite => "Recipe is already in favorites.",
            Relation::Cart => "Recipe is already in the shopping cart.",
        }
    }

    fn not_present(self) -> &'static str {
        match self {
            Relation::Favorite => "Recipe was not in favorites.",
            Relation::Cart => "Recipe was not in the shopping cart.",
        }
    }
}

/// Inserts the pair row, turning a duplicate into a 400.
pub fn add(
    conn: &mut DbConn,
    relation: Relation,
    user_id: Uuid,
    recipe_id: Uuid,
) -> Result<(), ApiError> {
    let result = match relation {
        Relation::Favorite => diesel::insert_into(favorites::table)
            .values(&NewFavorite { user_id, recipe_id })
            .execute(conn),
        Relation::Cart => diesel::insert_into(cart_items::table)
            .values(&NewCartItem { user_id, recipe_id })
            .execute(conn),
    };

    match result {
        Ok(_) => Ok(()),
        Err(e) if db::is_unique_violation(&e, Some(relation.constraint())) => {
            Err(ApiError::BadRequest(relation.already_added().to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Deletes the pair row, turning a missing pair into a 400.
pub fn remove(
    conn: &mut DbConn,
    relation: Relation,
    user_id: Uuid,
    recipe_id: Uuid,
) -> Result<(), ApiError> {
    let deleted = match relation {
        Relation::Favorite => diesel::delete(
            favorites::table
                .filter(favorites::user_id.eq(user_id))
                .filter(favorites::recipe_id.eq(recipe_id)),
        )
        .execute(conn)?,
        Relation::Cart => diesel::delete(
            cart_items::table
                .filter(cart_items::user_id.eq(user_id))
                .filter(cart_items::recipe_id.eq(recipe_id)),
        )
        .execute(conn)?,
    };

    if deleted == 0 {
        return Err(ApiError::BadRequest(relation.not_present().to_string()));
    }
    Ok(())
}
