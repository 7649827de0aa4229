use sqlx::prelude::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct RecipeRecord {
    pub id: i64,
    pub title: String,
    pub base_servings: i64,
    pub calories: Option<i64>,
    pub health_grade: Option<String>,
    pub video_url: Option<String>,
    pub created_at: String,
}
