pub mod create;
pub mod delete;
pub mod download;
pub mod favorite;
pub mod get;
pub mod image;
pub mod list;
pub mod short_link;
pub mod shopping_cart;
pub mod toggles;
pub mod update;

use axum::routing::get as get_method;
use axum::Router;
use diesel::prelude::*;
use serde::Deserialize;
use std::collections::HashSet;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

use crate::api::ApiError;
use crate::models::{NewRecipeIngredient, Recipe};
use crate::schema::{ingredients, recipe_ingredients, recipes};
use crate::AppState;

/// Returns the router for /api/recipes endpoints (mounted at /api/recipes)
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get_method(list::list_recipes).post(create::create_recipe),
        )
        .route(
            "/download_shopping_cart",
            get_method(download::download_shopping_cart),
        )
        .route(
            "/{id}",
            get_method(get::get_recipe)
                .patch(update::update_recipe)
                .delete(delete::delete_recipe),
        )
        .route("/{id}/image", get_method(image::serve_image))
        .route("/{id}/get-link", get_method(short_link::get_link))
        .route(
            "/{id}/favorite",
            axum::routing::post(favorite::add_favorite).delete(favorite::remove_favorite),
        )
        .route(
            "/{id}/shopping_cart",
            axum::routing::post(shopping_cart::add_to_cart)
                .delete(shopping_cart::remove_from_cart),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_recipe,
        list::list_recipes,
        get::get_recipe,
        update::update_recipe,
        delete::delete_recipe,
        image::serve_image,
        short_link::get_link,
        favorite::add_favorite,
        favorite::remove_favorite,
        shopping_cart::add_to_cart,
        shopping_cart::remove_from_cart,
        download::download_shopping_cart,
    ),
    components(schemas(
        IngredientAmount,
        create::CreateRecipeRequest,
        list::RecipeListResponse,
        update::UpdateRecipeRequest,
        short_link::ShortLinkResponse,
    ))
)]
pub struct ApiDoc;

/// Ingredient reference in create/update payloads.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct IngredientAmount {
    pub id: Uuid,
    pub amount: i32,
}

pub(crate) fn validate_cooking_time(value: i32) -> Result<(), ApiError> {
    if value <= 0 {
        return Err(ApiError::field(
            "cooking_time",
            "Must be greater than zero.",
        ));
    }
    Ok(())
}

/// Structural checks on an ingredient list: non-empty, positive amounts, no
/// repeated ingredient ids.
pub(crate) fn check_ingredient_amounts(items: &[IngredientAmount]) -> Result<(), ApiError> {
    if items.is_empty() {
        return Err(ApiError::field("ingredients", "Required field."));
    }

    let mut seen = HashSet::new();
    for item in items {
        if item.amount <= 0 {
            return Err(ApiError::field("ingredients", "Amounts must be greater than zero."));
        }
        if !seen.insert(item.id) {
            return Err(ApiError::field("ingredients", "Duplicate ingredient."));
        }
    }

    Ok(())
}

/// Full validation: structure plus existence of every referenced
/// ingredient. Runs before any write.
pub(crate) fn validate_ingredients(
    conn: &mut PgConnection,
    items: &[IngredientAmount],
) -> Result<(), ApiError> {
    check_ingredient_amounts(items)?;

    let ids: Vec<Uuid> = items.iter().map(|i| i.id).collect();
    let known: i64 = ingredients::table
        .filter(ingredients::id.eq_any(&ids))
        .count()
        .get_result(conn)?;

    if known != ids.len() as i64 {
        return Err(ApiError::field("ingredients", "Unknown ingredient."));
    }

    Ok(())
}

pub(crate) fn load_recipe(conn: &mut PgConnection, id: Uuid) -> Result<Recipe, ApiError> {
    recipes::table
        .find(id)
        .select(Recipe::as_select())
        .first(conn)
        .optional()?
        .ok_or(ApiError::NotFound("Recipe not found."))
}

/// Replaces a recipe's ingredient rows. Callers wrap this in a transaction
/// together with the recipe write itself.
pub(crate) fn write_ingredients(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    items: &[IngredientAmount],
) -> QueryResult<()> {
    diesel::delete(recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)))
        .execute(conn)?;

    let rows: Vec<NewRecipeIngredient> = items
        .iter()
        .map(|item| NewRecipeIngredient {
            recipe_id,
            ingredient_id: item.id,
            amount: item.amount,
        })
        .collect();

    diesel::insert_into(recipe_ingredients::table)
        .values(&rows)
        .execute(conn)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(amount: i32) -> IngredientAmount {
        IngredientAmount {
            id: Uuid::new_v4(),
            amount,
        }
    }

    #[test]
    fn cooking_time_must_be_positive() {
        assert!(validate_cooking_time(1).is_ok());
        assert!(validate_cooking_time(0).is_err());
        assert!(validate_cooking_time(-5).is_err());
    }

    #[test]
    fn ingredient_list_must_not_be_empty() {
        assert!(check_ingredient_amounts(&[]).is_err());
        assert!(check_ingredient_amounts(&[item(1)]).is_ok());
    }

    #[test]
    fn ingredient_amounts_must_be_positive() {
        assert!(check_ingredient_amounts(&[item(0)]).is_err());
        assert!(check_ingredient_amounts(&[item(1), item(-2)]).is_err());
    }

    #[test]
    fn duplicate_ingredients_are_rejected() {
        let a = item(1);
        let dup = IngredientAmount {
            id: a.id,
            amount: 3,
        };
        assert!(check_ingredient_amounts(&[a, dup]).is_err());
    }
}
