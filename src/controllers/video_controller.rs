use sqlx::SqlitePool;
use tracing::info;

use crate::error::{Result, YorigoError};
use crate::models::VideoRecord;
use crate::models::api::VideoMetadata;

/// Persist a resolved video link; saving the same video again refreshes its row
pub async fn save_video(pool: &SqlitePool, video: &VideoMetadata, source_url: &str) -> Result<i64> {
    if video.video_id.is_empty() {
        return Err(YorigoError::InvalidArgument(
            "video id must not be empty".to_string(),
        ));
    }

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO videos (video_id, source_url, title, description, channel_title, published_at, thumbnail_url)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (video_id) DO UPDATE SET
            source_url = excluded.source_url,
            title = excluded.title,
            description = excluded.description,
            channel_title = excluded.channel_title,
            published_at = excluded.published_at,
            thumbnail_url = excluded.thumbnail_url
        RETURNING id
        "#,
    )
    .bind(&video.video_id)
    .bind(source_url)
    .bind(&video.title)
    .bind(&video.description)
    .bind(&video.channel_title)
    .bind(&video.published_at)
    .bind(&video.thumbnail_url)
    .fetch_one(pool)
    .await?;

    info!(video_id = %video.video_id, id, "Saved video");

    Ok(id)
}

/// Look up a saved video by its YouTube id
pub async fn get_video(pool: &SqlitePool, video_id: &str) -> Result<Option<VideoMetadata>> {
    let record = sqlx::query_as::<_, VideoRecord>(
        r#"
        SELECT id, video_id, source_url, title, description, channel_title, published_at, thumbnail_url, created_at
        FROM videos
        WHERE video_id = ?
        "#,
    )
    .bind(video_id)
    .fetch_optional(pool)
    .await?;

    Ok(record.map(VideoMetadata::from))
}
