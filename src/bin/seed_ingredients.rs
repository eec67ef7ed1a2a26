//! Loads the ingredient catalog from a JSON file into the database.
//! Existing (name, unit) pairs are left alone, so the loader can be run
//! repeatedly against the same database.
//!
//! Usage: seed-ingredients [path/to/ingredients.json]

use anyhow::{Context, Result};
use diesel::prelude::*;
use serde::Deserialize;
use std::env;
use std::fs;

use ladle_server::schema::ingredients;

#[derive(Debug, Deserialize)]
struct IngredientEntry {
    name: String,
    measurement_unit: String,
}

fn main() -> Result<()> {
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "data/ingredients.json".to_string());

    let raw = fs::read_to_string(&path).with_context(|| format!("failed to read {path}"))?;
    let entries: Vec<IngredientEntry> =
        serde_json::from_str(&raw).with_context(|| format!("failed to parse {path}"))?;

    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let mut conn = PgConnection::establish(&database_url)
        .with_context(|| "failed to connect to the database")?;

    let mut inserted = 0;
    for entry in &entries {
        inserted += diesel::insert_into(ingredients::table)
            .values((
                ingredients::name.eq(&entry.name),
                ingredients::measurement_unit.eq(&entry.measurement_unit),
            ))
            .on_conflict((ingredients::name, ingredients::measurement_unit))
            .do_nothing()
            .execute(&mut conn)?;
    }

    println!(
        "Loaded {} ingredients ({} new, {} already present)",
        entries.len(),
        inserted,
        entries.len() - inserted
    );
    Ok(())
}
