//! Video links pasted on the home screen.
//!
//! Metadata comes from a [`VideoMetadataSource`]. When the source fails the
//! caller gets placeholder metadata from [`fallback_metadata`] instead, so a
//! link can always be saved.

use std::future::Future;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::{info, warn};

use crate::error::{Result, YorigoError};
use crate::models::api::VideoMetadata;

static VIDEO_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?:youtube\.com/(?:shorts/|[^/]+/.+/|(?:v|e(?:mbed)?)/|.*[?&]v=)|youtu\.be/)([^"&?/\s]{11})"#,
    )
    .expect("video id pattern is valid")
});

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("metadata service unavailable: {0}")]
    Unavailable(String),

    #[error("no metadata for video {0}")]
    NotFound(String),

    #[error("malformed metadata: {0}")]
    Malformed(String),
}

/// Anything that can look up metadata for a video link
pub trait VideoMetadataSource {
    fn fetch(
        &self,
        url: &str,
    ) -> impl Future<Output = std::result::Result<VideoMetadata, FetchError>> + Send;
}

/// Pull the 11 character YouTube video id out of a link
pub fn extract_video_id(url: &str) -> Option<String> {
    VIDEO_ID
        .captures(url)
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str().to_string())
}

pub fn thumbnail_url(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{}/maxresdefault.jpg", video_id)
}

/// Placeholder metadata used when the source cannot be reached
///
/// Depends only on `url`, so the same link always yields the same value.
pub fn fallback_metadata(url: &str) -> VideoMetadata {
    let video_id = extract_video_id(url).unwrap_or_else(|| "unknown".to_string());
    let short_id: String = video_id.chars().take(8).collect();

    VideoMetadata {
        title: format!("Recipe Video {}", short_id),
        description: format!(
            "This is a fallback description for video {}.\n\n\
             To get real video descriptions, you need to:\n\
             1. Set up your YouTube API key in the backend server\n\
             2. Create a .env file in the server directory\n\
             3. Add: YOUTUBE_API_KEY=your_actual_api_key\n\
             4. Restart your backend server\n\n\
             Ingredients:\n\
             - 2 cups of flour\n\
             - 1 cup of sugar\n\
             - 3 eggs\n\
             - 1/2 cup of butter\n\
             - 1 tsp vanilla extract\n\n\
             Instructions:\n\
             1. Preheat oven to 350°F\n\
             2. Mix dry ingredients in a bowl\n\
             3. Beat eggs and add to mixture\n\
             4. Bake for 25-30 minutes\n\
             5. Let cool before serving\n\n\
             Enjoy this wonderful recipe!",
            video_id
        ),
        channel_title: "Demo Channel".to_string(),
        published_at: None,
        thumbnail_url: thumbnail_url(&video_id),
        video_id,
    }
}

/// Validate `url` and fetch its metadata, falling back to placeholders on failure
pub async fn resolve_video<S: VideoMetadataSource>(source: &S, url: &str) -> Result<VideoMetadata> {
    let url = url.trim();
    if url.is_empty() {
        return Err(YorigoError::InvalidArgument(
            "please enter a YouTube URL".to_string(),
        ));
    }
    if extract_video_id(url).is_none() {
        return Err(YorigoError::InvalidVideoUrl(url.to_string()));
    }

    match source.fetch(url).await {
        Ok(metadata) => {
            info!(video_id = %metadata.video_id, "Fetched video metadata");
            Ok(metadata)
        }
        Err(e) => {
            warn!(error = %e, "Video metadata fetch failed, using fallback");
            Ok(fallback_metadata(url))
        }
    }
}

/// Reads `<video_id>.json` files in the metadata service's response format
pub struct MetadataDir {
    root: PathBuf,
}

impl MetadataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl VideoMetadataSource for MetadataDir {
    async fn fetch(&self, url: &str) -> std::result::Result<VideoMetadata, FetchError> {
        let video_id =
            extract_video_id(url).ok_or_else(|| FetchError::NotFound(url.to_string()))?;
        let path = self.root.join(format!("{}.json", video_id));

        let body = match tokio::fs::read_to_string(&path).await {
            Ok(body) => body,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(FetchError::NotFound(video_id));
            }
            Err(e) => return Err(FetchError::Unavailable(e.to_string())),
        };

        VideoMetadata::from_response_json(&body).map_err(|e| FetchError::Malformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    struct FailingSource;

    impl VideoMetadataSource for FailingSource {
        async fn fetch(&self, _url: &str) -> std::result::Result<VideoMetadata, FetchError> {
            Err(FetchError::Unavailable("connection refused".to_string()))
        }
    }

    struct FixedSource(VideoMetadata);

    impl VideoMetadataSource for FixedSource {
        async fn fetch(&self, _url: &str) -> std::result::Result<VideoMetadata, FetchError> {
            Ok(self.0.clone())
        }
    }

    #[rstest]
    #[case("https://www.youtube.com/watch?v=dQw4w9WgXcQ", "dQw4w9WgXcQ")]
    #[case("https://youtube.com/watch?feature=share&v=dQw4w9WgXcQ", "dQw4w9WgXcQ")]
    #[case("https://youtu.be/dQw4w9WgXcQ?si=abc", "dQw4w9WgXcQ")]
    #[case("https://www.youtube.com/embed/dQw4w9WgXcQ", "dQw4w9WgXcQ")]
    #[case("https://www.youtube.com/v/dQw4w9WgXcQ", "dQw4w9WgXcQ")]
    #[case("https://www.youtube.com/shorts/dQw4w9WgXcQ", "dQw4w9WgXcQ")]
    fn test_extract_video_id(#[case] url: &str, #[case] expected: &str) {
        assert_eq!(extract_video_id(url), Some(expected.to_string()));
    }

    #[rstest]
    #[case("")]
    #[case("https://www.instagram.com/reel/abc")]
    #[case("https://youtu.be/short")]
    fn test_extract_video_id_rejects(#[case] url: &str) {
        assert_eq!(extract_video_id(url), None);
    }

    #[test]
    fn test_fallback_metadata_is_deterministic() {
        let url = "https://youtu.be/dQw4w9WgXcQ";

        let first = fallback_metadata(url);
        let second = fallback_metadata(url);

        assert_eq!(first, second);
        assert_eq!(first.video_id, "dQw4w9WgXcQ");
        assert_eq!(first.title, "Recipe Video dQw4w9Wg");
        assert!(first.description.contains("video dQw4w9WgXcQ"));
        assert_eq!(first.channel_title, "Demo Channel");
        assert_eq!(
            first.thumbnail_url,
            "https://img.youtube.com/vi/dQw4w9WgXcQ/maxresdefault.jpg"
        );
    }

    #[test]
    fn test_fallback_description_template() {
        let description = fallback_metadata("https://youtu.be/dQw4w9WgXcQ").description;

        assert!(description.starts_with(
            "This is a fallback description for video dQw4w9WgXcQ.\n\nTo get real video descriptions"
        ));
        assert!(description.contains("3. Add: YOUTUBE_API_KEY=your_actual_api_key\n"));
        assert!(description.contains("\n\nIngredients:\n- 2 cups of flour\n"));
        assert!(description.contains("\n\nInstructions:\n1. Preheat oven to 350°F\n"));
        assert!(
            description.ends_with("5. Let cool before serving\n\nEnjoy this wonderful recipe!")
        );
    }

    #[test]
    fn test_fallback_metadata_unknown_id() {
        let metadata = fallback_metadata("not a link");

        assert_eq!(metadata.video_id, "unknown");
        assert_eq!(metadata.title, "Recipe Video unknown");
    }

    #[tokio::test]
    async fn test_resolve_video_uses_fallback_on_failure() {
        let url = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

        let metadata = resolve_video(&FailingSource, url)
            .await
            .expect("Fallback should not fail");

        assert_eq!(metadata, fallback_metadata(url));
    }

    #[tokio::test]
    async fn test_resolve_video_prefers_source() {
        let mut expected = fallback_metadata("https://youtu.be/dQw4w9WgXcQ");
        expected.title = "Real title".to_string();
        let source = FixedSource(expected.clone());

        let metadata = resolve_video(&source, "https://youtu.be/dQw4w9WgXcQ")
            .await
            .expect("Failed to resolve");

        assert_eq!(metadata, expected);
    }

    #[tokio::test]
    async fn test_resolve_video_rejects_empty_url() {
        let result = resolve_video(&FailingSource, "   ").await;

        assert!(matches!(result, Err(YorigoError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_resolve_video_rejects_unrecognised_url() {
        let result = resolve_video(&FailingSource, "https://example.com/video").await;

        assert!(matches!(result, Err(YorigoError::InvalidVideoUrl(_))));
    }

    #[tokio::test]
    async fn test_metadata_dir_missing_file() {
        let source = MetadataDir::new(std::env::temp_dir().join("yorigo-no-such-dir"));

        let result = source.fetch("https://youtu.be/dQw4w9WgXcQ").await;

        assert!(matches!(result, Err(FetchError::NotFound(id)) if id == "dQw4w9WgXcQ"));
    }

    #[tokio::test]
    async fn test_metadata_dir_reads_response_file() {
        let root = std::env::temp_dir().join(format!("yorigo-video-{}", std::process::id()));
        tokio::fs::create_dir_all(&root)
            .await
            .expect("Failed to create dir");
        tokio::fs::write(
            root.join("dQw4w9WgXcQ.json"),
            r#"{"videoId":"dQw4w9WgXcQ","title":"Stew","description":"d","channelTitle":"c","thumbnailUrl":"t"}"#,
        )
        .await
        .expect("Failed to write metadata");

        let metadata = MetadataDir::new(root.clone())
            .fetch("https://youtu.be/dQw4w9WgXcQ")
            .await
            .expect("Failed to read metadata");

        assert_eq!(metadata.title, "Stew");
        tokio::fs::remove_dir_all(&root).await.ok();
    }
}
