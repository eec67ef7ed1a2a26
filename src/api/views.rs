//! Response representations shared across endpoints, and the queries that
//! fill them in for a given viewer.

use diesel::prelude::*;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Recipe, User};
use crate::schema::{cart_items, favorites, ingredients, recipe_ingredients, recipes, subscriptions};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserView {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
    pub avatar: Option<String>,
}

impl UserView {
    pub fn new(user: &User, is_subscribed: bool) -> Self {
        UserView {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            is_subscribed,
            avatar: avatar_url(user),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeIngredientView {
    pub id: Uuid,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// Condensed recipe representation returned from toggle endpoints and
/// embedded in subscription entries.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeSummary {
    pub id: Uuid,
    pub name: String,
    pub image: Option<String>,
    pub cooking_time: i32,
}

impl RecipeSummary {
    pub fn new(recipe: &Recipe) -> Self {
        RecipeSummary {
            id: recipe.id,
            name: recipe.name.clone(),
            image: image_url(recipe),
            cooking_time: recipe.cooking_time,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeView {
    pub id: Uuid,
    pub author: UserView,
    pub ingredients: Vec<RecipeIngredientView>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub image: Option<String>,
}

/// Subscription entry: an author plus their recipes.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserWithRecipesView {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
    pub avatar: Option<String>,
    pub recipes: Vec<RecipeSummary>,
    pub recipes_count: i64,
}

pub fn avatar_url(user: &User) -> Option<String> {
    user.avatar
        .is_some()
        .then(|| format!("/api/users/{}/avatar", user.id))
}

pub fn image_url(recipe: &Recipe) -> Option<String> {
    recipe
        .image
        .is_some()
        .then(|| format!("/api/recipes/{}/image", recipe.id))
}

/// Builds full recipe representations for a batch of recipes. Ingredient
/// lists and the viewer's favorite/cart/subscription flags are fetched with
/// one query each rather than per recipe.
pub fn recipe_views(
    conn: &mut PgConnection,
    items: Vec<(Recipe, User)>,
    viewer: Option<&User>,
) -> QueryResult<Vec<RecipeView>> {
    let recipe_ids: Vec<Uuid> = items.iter().map(|(r, _)| r.id).collect();
    let author_ids: Vec<Uuid> = items.iter().map(|(_, a)| a.id).collect();

    let ingredient_rows: Vec<(Uuid, Uuid, String, String, i32)> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(&recipe_ids))
        .order(ingredients::name.asc())
        .select((
            recipe_ingredients::recipe_id,
            ingredients::id,
            ingredients::name,
            ingredients::measurement_unit,
            recipe_ingredients::amount,
        ))
        .load(conn)?;

    let mut ingredients_by_recipe: HashMap<Uuid, Vec<RecipeIngredientView>> = HashMap::new();
    for (recipe_id, id, name, measurement_unit, amount) in ingredient_rows {
        ingredients_by_recipe
            .entry(recipe_id)
            .or_default()
            .push(RecipeIngredientView {
                id,
                name,
                measurement_unit,
                amount,
            });
    }

    let (favorited, in_cart, subscribed_to) = match viewer {
        Some(user) => {
            let favorited: HashSet<Uuid> = favorites::table
                .filter(favorites::user_id.eq(user.id))
                .filter(favorites::recipe_id.eq_any(&recipe_ids))
                .select(favorites::recipe_id)
                .load::<Uuid>(conn)?
                .into_iter()
                .collect();
            let in_cart: HashSet<Uuid> = cart_items::table
                .filter(cart_items::user_id.eq(user.id))
                .filter(cart_items::recipe_id.eq_any(&recipe_ids))
                .select(cart_items::recipe_id)
                .load::<Uuid>(conn)?
                .into_iter()
                .collect();
            let subscribed_to: HashSet<Uuid> = subscriptions::table
                .filter(subscriptions::subscriber_id.eq(user.id))
                .filter(subscriptions::author_id.eq_any(&author_ids))
                .select(subscriptions::author_id)
                .load::<Uuid>(conn)?
                .into_iter()
                .collect();
            (favorited, in_cart, subscribed_to)
        }
        None => Default::default(),
    };

    Ok(items
        .into_iter()
        .map(|(recipe, author)| {
            let image = image_url(&recipe);
            RecipeView {
                id: recipe.id,
                author: UserView::new(&author, subscribed_to.contains(&author.id)),
                ingredients: ingredients_by_recipe.remove(&recipe.id).unwrap_or_default(),
                is_favorited: favorited.contains(&recipe.id),
                is_in_shopping_cart: in_cart.contains(&recipe.id),
                name: recipe.name,
                text: recipe.text,
                cooking_time: recipe.cooking_time,
                image,
            }
        })
        .collect())
}

/// Single-recipe variant of [`recipe_views`].
pub fn recipe_view(
    conn: &mut PgConnection,
    recipe: Recipe,
    author: User,
    viewer: Option<&User>,
) -> QueryResult<RecipeView> {
    let mut views = recipe_views(conn, vec![(recipe, author)], viewer)?;
    Ok(views.remove(0))
}

/// True when `viewer` is subscribed to `author`.
pub fn is_subscribed(
    conn: &mut PgConnection,
    viewer: Option<&User>,
    author_id: Uuid,
) -> QueryResult<bool> {
    let Some(user) = viewer else {
        return Ok(false);
    };
    let count: i64 = subscriptions::table
        .filter(subscriptions::subscriber_id.eq(user.id))
        .filter(subscriptions::author_id.eq(author_id))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}

/// Builds a subscription entry for one author: profile, condensed recipes
/// (optionally truncated by `recipes_limit`) and the total recipe count.
pub fn user_with_recipes(
    conn: &mut PgConnection,
    author: &User,
    is_subscribed: bool,
    recipes_limit: Option<i64>,
) -> QueryResult<UserWithRecipesView> {
    let mut query = recipes::table
        .filter(recipes::author_id.eq(author.id))
        .order(recipes::created_at.desc())
        .select(Recipe::as_select())
        .into_boxed();
    if let Some(limit) = recipes_limit {
        query = query.limit(limit.max(0));
    }
    let author_recipes: Vec<Recipe> = query.load(conn)?;

    let recipes_count: i64 = recipes::table
        .filter(recipes::author_id.eq(author.id))
        .count()
        .get_result(conn)?;

    Ok(UserWithRecipesView {
        id: author.id,
        email: author.email.clone(),
        username: author.username.clone(),
        first_name: author.first_name.clone(),
        last_name: author.last_name.clone(),
        is_subscribed,
        avatar: avatar_url(author),
        recipes: author_recipes.iter().map(RecipeSummary::new).collect(),
        recipes_count,
    })
}
