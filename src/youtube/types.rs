use serde::{Deserialize, Serialize};

/// Response from `GET /search?part=snippet&type=video`.
#[derive(Debug, Deserialize)]
pub struct SearchListResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
    pub error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
pub struct SearchItem {
    pub id: SearchId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchId {
    pub video_id: Option<String>,
}

/// Response from `GET /videos?part=snippet,statistics,contentDetails`.
#[derive(Debug, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
    pub error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoItem {
    pub id: String,
    pub snippet: Option<VideoSnippet>,
    pub statistics: Option<Statistics>,
    pub content_details: Option<ContentDetails>,
}

#[derive(Debug, Deserialize)]
pub struct VideoSnippet {
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Deserialize)]
pub struct Thumbnails {
    pub medium: Option<Thumbnail>,
    pub default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

/// Counters arrive as decimal strings; any of them may be absent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub view_count: Option<String>,
    pub like_count: Option<String>,
    pub dislike_count: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ContentDetails {
    pub duration: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub code: Option<u16>,
    pub message: Option<String>,
}

/// A raw API item flattened into the fields the ranker needs.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoCandidate {
    pub id: String,
    pub title: String,
    pub description: String,
    pub view_count: u64,
    pub like_count: u64,
    pub dislike_count: u64,
    pub thumbnail: String,
    pub duration: String,
}

impl From<VideoItem> for VideoCandidate {
    fn from(item: VideoItem) -> Self {
        let (title, description, thumbnail) = match item.snippet {
            Some(s) => {
                let thumbnail = s
                    .thumbnails
                    .and_then(|t| t.medium.or(t.default))
                    .map(|t| t.url)
                    .unwrap_or_default();
                (
                    s.title.unwrap_or_default(),
                    s.description.unwrap_or_default(),
                    thumbnail,
                )
            }
            None => Default::default(),
        };
        let (view_count, like_count, dislike_count) = match item.statistics {
            Some(s) => (
                parse_counter(s.view_count.as_deref()),
                parse_counter(s.like_count.as_deref()),
                parse_counter(s.dislike_count.as_deref()),
            ),
            None => (0, 0, 0),
        };
        let duration = item
            .content_details
            .and_then(|c| c.duration)
            .unwrap_or_default();

        Self {
            id: item.id,
            title,
            description,
            view_count,
            like_count,
            dislike_count,
            thumbnail,
            duration,
        }
    }
}

fn parse_counter(raw: Option<&str>) -> u64 {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(0)
}

/// A candidate that passed the keyword filter, with its derived rating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedVideo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub url: String,
    pub provider: &'static str,
    pub category: &'static str,
    pub summary: String,
    pub view_count: u64,
    pub like_count: u64,
    pub dislike_count: u64,
    pub views: String,
    pub rating: f64,
    pub duration: String,
    pub duration_minutes: f64,
}
