use rstest::*;
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};

use super::api::Recipe;

/// Test fixture that creates an in-memory SQLite database with migrations applied
///
/// This fixture can be imported and used across all store tests to ensure
/// consistency in test database setup.
#[fixture]
pub async fn test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// The demo kimchi jjigae recipe: 2 servings, three pantry staples (ids 5-7)
#[fixture]
pub fn kimchi_jjigae() -> Recipe {
    super::seed::kimchi_jjigae()
}
