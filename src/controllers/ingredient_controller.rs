use sqlx::{SqliteConnection, SqlitePool};

use crate::error::{Result, YorigoError};
use crate::models::IngredientRecord;

/// Ingredient names are stored trimmed; blank names are rejected
fn normalize_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(YorigoError::InvalidArgument(
            "ingredient name must not be empty".to_string(),
        ));
    }
    Ok(name)
}

/// Create a new ingredient and return its id
/// Fails if an ingredient with the same name already exists (UNIQUE constraint)
pub async fn create_ingredient(pool: &SqlitePool, name: &str) -> Result<i64> {
    let name = normalize_name(name)?;

    let ingredient_id = sqlx::query("INSERT INTO ingredients (name) VALUES (?)")
        .bind(name)
        .execute(pool)
        .await?
        .last_insert_rowid();

    Ok(ingredient_id)
}

/// Id of the ingredient called `name`, inserting it first if needed
///
/// Takes a connection so it can run inside the caller's transaction.
pub async fn find_or_create_ingredient(conn: &mut SqliteConnection, name: &str) -> Result<i64> {
    let name = normalize_name(name)?;

    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM ingredients WHERE name = ?")
        .bind(name)
        .fetch_optional(&mut *conn)
        .await?;

    match existing {
        Some(id) => Ok(id),
        None => Ok(sqlx::query("INSERT INTO ingredients (name) VALUES (?)")
            .bind(name)
            .execute(&mut *conn)
            .await?
            .last_insert_rowid()),
    }
}

/// Every known ingredient, ordered by name
pub async fn get_all_ingredients(pool: &SqlitePool) -> Result<Vec<IngredientRecord>> {
    let ingredients = sqlx::query_as::<_, IngredientRecord>(
        "SELECT id, name, created_at FROM ingredients ORDER BY name",
    )
    .fetch_all(pool)
    .await?;

    Ok(ingredients)
}
