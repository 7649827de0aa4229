use sqlx::prelude::FromRow;

/// A named ingredient, shared by every recipe that uses it
#[derive(Debug, Clone, FromRow)]
pub struct IngredientRecord {
    pub id: i64,
    pub name: String,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_fixtures::test_db;
    use rstest::*;
    use sqlx::SqlitePool;

    #[rstest]
    #[tokio::test]
    async fn test_ingredient_shared_between_recipes(#[future] test_db: SqlitePool) {
        let pool = test_db.await;

        let tofu_id = sqlx::query("INSERT INTO ingredients (name) VALUES ('두부')")
            .execute(&pool)
            .await
            .expect("Failed to insert ingredient")
            .last_insert_rowid();

        for title in ["김치찌개", "된장찌개"] {
            let recipe_id = sqlx::query("INSERT INTO recipes (title, base_servings) VALUES (?, 2)")
                .bind(title)
                .execute(&pool)
                .await
                .expect("Failed to insert recipe")
                .last_insert_rowid();
            sqlx::query(
                "INSERT INTO recipe_ingredients (recipe_id, ingredient_id, item_key, base_amount, unit) VALUES (?, ?, '1', 1, '모')",
            )
            .bind(recipe_id)
            .bind(tofu_id)
            .execute(&pool)
            .await
            .expect("Failed to link ingredient");
        }

        let used_by: Vec<IngredientRecord> = sqlx::query_as(
            r#"
            SELECT i.id, i.name, i.created_at
            FROM recipe_ingredients ri
            JOIN ingredients i ON i.id = ri.ingredient_id
            "#,
        )
        .fetch_all(&pool)
        .await
        .expect("Failed to fetch ingredients");

        assert_eq!(used_by.len(), 2);
        assert!(used_by.iter().all(|i| i.id == tofu_id && i.name == "두부"));
        assert!(!used_by[0].created_at.is_empty());
    }
}
