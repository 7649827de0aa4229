use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::Result;

/// What the video metadata service reports for a video link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetadata {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub channel_title: String,
    #[serde(default)]
    pub published_at: Option<String>,
    pub thumbnail_url: String,
}

impl VideoMetadata {
    /// Parse the metadata service's JSON response body
    pub fn from_response_json(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    /// Body handed to the recipe-persistence service when a video is saved
    pub fn save_payload(&self, source_url: &str) -> serde_json::Value {
        json!({
            "videoId": self.video_id,
            "title": self.title,
            "description": self.description,
            "thumbnailUrl": self.thumbnail_url,
            "youtubeUrl": source_url,
            "channelTitle": self.channel_title,
            "publishedAt": self.published_at,
        })
    }
}
