use indexmap::IndexSet;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use super::ingredient_controller::find_or_create_ingredient;
use crate::error::{Result, YorigoError};
use crate::models::RecipeRecord;
use crate::models::api::{Nutrition, Recipe, RecipeIngredient, RecipeSummary};

fn validate(recipe: &Recipe) -> Result<()> {
    if recipe.base_servings < 1 {
        return Err(YorigoError::InvalidArgument(
            "base servings must be at least 1".to_string(),
        ));
    }
    let mut seen_ids = IndexSet::new();
    for ingredient in &recipe.ingredients {
        if !seen_ids.insert(ingredient.id.as_str()) {
            return Err(YorigoError::InvalidArgument(format!(
                "ingredient id '{}' appears more than once",
                ingredient.id
            )));
        }
        if !ingredient.base_amount.is_finite() || ingredient.base_amount < 0.0 {
            return Err(YorigoError::InvalidArgument(format!(
                "amount for '{}' must be a non-negative number",
                ingredient.name
            )));
        }
    }
    Ok(())
}

/// Fetch a recipe by ID with its ingredients, steps and nutrition
pub async fn get_recipe(pool: &SqlitePool, recipe_id: i64) -> Result<Recipe> {
    let recipe = sqlx::query_as::<_, RecipeRecord>(
        "SELECT id, title, base_servings, calories, health_grade, video_url, created_at FROM recipes WHERE id = ?",
    )
    .bind(recipe_id)
    .fetch_optional(pool)
    .await?
    .ok_or(YorigoError::RecipeNotFound(recipe_id))?;

    // Ingredient names live in the shared ingredients table
    let ingredients: Vec<RecipeIngredient> = sqlx::query(
        r#"
        SELECT
            ri.item_key,
            i.name AS ingredient_name,
            ri.base_amount,
            ri.unit,
            ri.has_in_pantry
        FROM recipe_ingredients ri
        JOIN ingredients i ON ri.ingredient_id = i.id
        WHERE ri.recipe_id = ?
        ORDER BY ri.id
        "#,
    )
    .bind(recipe_id)
    .fetch_all(pool)
    .await?
    .iter()
    .map(|row| RecipeIngredient {
        id: row.get("item_key"),
        name: row.get("ingredient_name"),
        base_amount: row.get("base_amount"),
        unit: row.get("unit"),
        has_in_pantry: row.get("has_in_pantry"),
    })
    .collect();

    let instructions: Vec<String> = sqlx::query_scalar(
        "SELECT instruction FROM recipe_steps WHERE recipe_id = ? ORDER BY position",
    )
    .bind(recipe_id)
    .fetch_all(pool)
    .await?;

    let nutrition = sqlx::query(
        "SELECT calories, protein_g, carbs_g, fat_g FROM recipe_nutrition WHERE recipe_id = ?",
    )
    .bind(recipe_id)
    .fetch_optional(pool)
    .await?
    .map(|row| Nutrition {
        calories: row.get("calories"),
        protein_g: row.get("protein_g"),
        carbs_g: row.get("carbs_g"),
        fat_g: row.get("fat_g"),
    });

    Ok(Recipe {
        id: recipe.id,
        title: recipe.title,
        base_servings: recipe.base_servings as u32,
        calories: recipe.calories.map(|c| c as u32),
        health_grade: recipe.health_grade,
        video_url: recipe.video_url,
        ingredients,
        instructions,
        nutrition,
        created_at: recipe.created_at,
    })
}

/// Create a new recipe with ingredients, steps and nutrition
/// Takes a Recipe struct (ignoring id and created_at) and creates ingredients if they don't exist
pub async fn create_recipe(pool: &SqlitePool, recipe: &Recipe) -> Result<i64> {
    validate(recipe)?;

    let mut tx = pool.begin().await?;

    let recipe_id = sqlx::query(
        "INSERT INTO recipes (title, base_servings, calories, health_grade, video_url) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&recipe.title)
    .bind(recipe.base_servings as i64)
    .bind(recipe.calories.map(|c| c as i64))
    .bind(&recipe.health_grade)
    .bind(&recipe.video_url)
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    for ingredient in &recipe.ingredients {
        let ingredient_id = find_or_create_ingredient(&mut *tx, &ingredient.name).await?;

        sqlx::query(
            "INSERT INTO recipe_ingredients (recipe_id, ingredient_id, item_key, base_amount, unit, has_in_pantry) VALUES (?, ?, ?, ?, ?, ?)"
        )
        .bind(recipe_id)
        .bind(ingredient_id)
        .bind(&ingredient.id)
        .bind(ingredient.base_amount)
        .bind(&ingredient.unit)
        .bind(ingredient.has_in_pantry)
        .execute(&mut *tx)
        .await?;
    }

    for (position, instruction) in recipe.instructions.iter().enumerate() {
        sqlx::query("INSERT INTO recipe_steps (recipe_id, position, instruction) VALUES (?, ?, ?)")
            .bind(recipe_id)
            .bind(position as i64)
            .bind(instruction)
            .execute(&mut *tx)
            .await?;
    }

    if let Some(nutrition) = &recipe.nutrition {
        sqlx::query(
            "INSERT INTO recipe_nutrition (recipe_id, calories, protein_g, carbs_g, fat_g) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(recipe_id)
        .bind(nutrition.calories)
        .bind(nutrition.protein_g)
        .bind(nutrition.carbs_g)
        .bind(nutrition.fat_g)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    info!(recipe_id, title = %recipe.title, "Saved recipe");

    Ok(recipe_id)
}

/// All saved recipes, oldest first
pub async fn list_recipes(pool: &SqlitePool) -> Result<Vec<RecipeSummary>> {
    let rows = sqlx::query(
        r#"
        SELECT
            r.id,
            r.title,
            r.base_servings,
            r.calories,
            COUNT(ri.id) AS ingredient_count
        FROM recipes r
        LEFT JOIN recipe_ingredients ri ON ri.recipe_id = r.id
        GROUP BY r.id
        ORDER BY r.id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| RecipeSummary {
            id: row.get("id"),
            title: row.get("title"),
            ingredient_count: row.get("ingredient_count"),
            base_servings: row.get::<i64, _>("base_servings") as u32,
            calories: row.get::<Option<i64>, _>("calories").map(|c| c as u32),
        })
        .collect())
}

/// Delete a recipe together with its ingredient rows, steps and nutrition
pub async fn delete_recipe(pool: &SqlitePool, recipe_id: i64) -> Result<()> {
    let mut tx = pool.begin().await?;

    for statement in [
        "DELETE FROM recipe_ingredients WHERE recipe_id = ?",
        "DELETE FROM recipe_steps WHERE recipe_id = ?",
        "DELETE FROM recipe_nutrition WHERE recipe_id = ?",
    ] {
        sqlx::query(statement)
            .bind(recipe_id)
            .execute(&mut *tx)
            .await?;
    }

    let deleted = sqlx::query("DELETE FROM recipes WHERE id = ?")
        .bind(recipe_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if deleted == 0 {
        // dropping tx rolls back
        return Err(YorigoError::RecipeNotFound(recipe_id));
    }

    tx.commit().await?;
    debug!(recipe_id, "Deleted recipe");

    Ok(())
}
