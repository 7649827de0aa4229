use sqlx::prelude::FromRow;

use super::api::VideoMetadata;

#[derive(Debug, Clone, FromRow)]
pub struct VideoRecord {
    pub id: i64,
    pub video_id: String,
    pub source_url: String,
    pub title: String,
    pub description: String,
    pub channel_title: String,
    pub published_at: Option<String>,
    pub thumbnail_url: String,
    pub created_at: String,
}

impl From<VideoRecord> for VideoMetadata {
    fn from(record: VideoRecord) -> Self {
        Self {
            video_id: record.video_id,
            title: record.title,
            description: record.description,
            channel_title: record.channel_title,
            published_at: record.published_at,
            thumbnail_url: record.thumbnail_url,
        }
    }
}
