use sqlx::prelude::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct RecipeIngredientRecord {
    pub id: i64,
    pub recipe_id: i64,
    pub ingredient_id: i64,
    pub item_key: String,
    pub base_amount: f64,
    pub unit: String,
    pub has_in_pantry: bool,
    pub created_at: String,
}
