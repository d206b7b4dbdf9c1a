use std::env;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use super::types::{ApiError, SearchListResponse, VideoItem, VideoListResponse};

const API_BASE: &str = "https://www.googleapis.com/youtube/v3";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
/// Candidate set size for a single search call.
pub const SEARCH_PAGE_SIZE: u8 = 50;

#[derive(Debug, thiserror::Error)]
pub enum YouTubeError {
    #[error("YOUTUBE_API_KEY not set. Create one at https://console.cloud.google.com/apis/credentials")]
    ApiKeyNotSet,

    #[error("API rate limit exceeded. Please retry later.")]
    RateLimited,

    #[error("API quota exhausted: {0}")]
    QuotaExhausted(String),

    #[error("API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Two-step video lookup: search for ids, then fetch details for those ids.
/// Implemented by `YouTubeClient` for production; mock implementations used in tests.
pub trait VideoSource {
    async fn search_ids(&self, query: &str) -> Result<Vec<String>, YouTubeError>;
    async fn video_details(&self, ids: &[String]) -> Result<Vec<VideoItem>, YouTubeError>;
}

#[derive(Clone)]
struct ApiKey(String);

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ApiError>,
}

#[derive(Clone, Debug)]
pub struct YouTubeClient {
    http: Client,
    api_key: ApiKey,
    base_url: String,
}

impl YouTubeClient {
    pub fn from_env(http: Client) -> Result<Self, YouTubeError> {
        let api_key = env::var("YOUTUBE_API_KEY").map_err(|_| YouTubeError::ApiKeyNotSet)?;
        if api_key.trim().is_empty() {
            return Err(YouTubeError::ApiKeyNotSet);
        }
        Ok(Self {
            http,
            api_key: ApiKey(api_key.trim().to_string()),
            base_url: API_BASE.to_string(),
        })
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            api_key: ApiKey("test-key".to_string()),
            base_url: base_url.to_string(),
        }
    }

    async fn get_once<T: DeserializeOwned>(&self, url: &Url) -> Result<T, YouTubeError> {
        debug_assert!(
            url.scheme() == "https" || cfg!(test),
            "API key must only be sent over HTTPS"
        );

        let response = self
            .http
            .get(url.clone())
            .header("User-Agent", crate::USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!("YouTube API rate limited");
            return Err(YouTubeError::RateLimited);
        }

        let text = response.text().await?;
        if !status.is_success() {
            if let Ok(body) = serde_json::from_str::<ErrorEnvelope>(&text)
                && let Some(err) = &body.error
            {
                let classified = classify_api_error(err);
                warn!(error = %classified, "YouTube API error");
                return Err(classified);
            }
            let snippet: String = text.chars().take(200).collect();
            warn!(status = %status, "YouTube API error (no structured body)");
            return Err(YouTubeError::Api {
                code: status.as_u16(),
                message: format!("HTTP {status}: {snippet}"),
            });
        }

        Ok(serde_json::from_str(&text)?)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, YouTubeError> {
        let mut url = Url::parse(&format!("{}{path}", self.base_url))?;
        url.query_pairs_mut()
            .extend_pairs(params)
            .append_pair("key", &self.api_key.0);

        let mut last_err = None;
        for attempt in 0..MAX_RETRIES {
            match self.get_once(&url).await {
                Ok(body) => return Ok(body),
                Err(e) if is_retriable(&e) => {
                    last_err = Some(e);
                    if attempt + 1 < MAX_RETRIES {
                        let delay_ms = jittered_backoff(attempt);
                        debug!(
                            attempt = attempt + 1,
                            delay_ms, "retrying after transient error"
                        );
                        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    }
                }
                Err(e) => return Err(e),
            }
        }
        Err(last_err.unwrap_or(YouTubeError::RateLimited))
    }
}

const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 500;

impl VideoSource for YouTubeClient {
    async fn search_ids(&self, query: &str) -> Result<Vec<String>, YouTubeError> {
        let page_size = SEARCH_PAGE_SIZE.to_string();
        let body: SearchListResponse = self
            .get_json(
                "/search",
                &[
                    ("part", "snippet"),
                    ("q", query),
                    ("type", "video"),
                    ("maxResults", page_size.as_str()),
                ],
            )
            .await?;

        if let Some(err) = &body.error {
            return Err(classify_api_error(err));
        }

        let ids: Vec<String> = body
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .filter(|id| !id.is_empty())
            .collect();
        debug!(count = ids.len(), "youtube search complete");
        Ok(ids)
    }

    async fn video_details(&self, ids: &[String]) -> Result<Vec<VideoItem>, YouTubeError> {
        let joined = ids.join(",");
        let body: VideoListResponse = self
            .get_json(
                "/videos",
                &[("part", "snippet,statistics,contentDetails"), ("id", joined.as_str())],
            )
            .await?;

        if let Some(err) = &body.error {
            return Err(classify_api_error(err));
        }

        debug!(count = body.items.len(), "youtube detail lookup complete");
        Ok(body.items)
    }
}

fn is_retriable(e: &YouTubeError) -> bool {
    matches!(
        e,
        YouTubeError::RateLimited
            | YouTubeError::Api {
                code: 500..=599,
                ..
            }
    )
}

/// Equal jitter backoff: base/2 + rand(0, base/2).
fn jittered_backoff(attempt: u32) -> u64 {
    let base = INITIAL_BACKOFF_MS * 2u64.pow(attempt);
    let half = base / 2;
    half + fastrand::u64(..half.max(1))
}

fn classify_api_error(err: &ApiError) -> YouTubeError {
    let message = err
        .message
        .clone()
        .unwrap_or_else(|| "Unknown error".to_string());

    match err.code {
        Some(429) => YouTubeError::RateLimited,
        Some(403) => YouTubeError::QuotaExhausted(message),
        Some(code) => YouTubeError::Api { code, message },
        None => YouTubeError::Api {
            code: 0,
            message: format!("Unknown error (no status code): {message}"),
        },
    }
}
