use thiserror::Error;

use crate::video::FetchError;

#[derive(Error, Debug)]
pub enum YorigoError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not a recognised video link: {0}")]
    InvalidVideoUrl(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Recipe not found with id: {0}")]
    RecipeNotFound(i64),

    #[error("Video metadata fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed payload: {0}")]
    Payload(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, YorigoError>;
