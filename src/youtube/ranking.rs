use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, warn};

use super::client::VideoSource;
use super::keywords::{EDUCATIONAL, EXCLUDED};
use super::types::{RankedVideo, VideoCandidate};
use crate::query::SearchQuery;

const VIEW_SATURATION: f64 = 1_000_000.0;
const LIKE_SATURATION: f64 = 100_000.0;
pub const MAX_RATING: f64 = 10.0;

/// Search, filter and score videos for `query`, best first.
///
/// Never fails: any error from `source` is logged and yields an empty list.
/// Ties keep the order the API returned them in.
pub async fn rank(source: &impl VideoSource, query: &SearchQuery) -> Vec<RankedVideo> {
    let ids = match source.search_ids(query.as_str()).await {
        Ok(ids) => ids,
        Err(e) => {
            warn!(error = %e, query = %query, "video search failed");
            return Vec::new();
        }
    };
    if ids.is_empty() {
        debug!(query = %query, "video search returned no candidates");
        return Vec::new();
    }

    let items = match source.video_details(&ids).await {
        Ok(items) => items,
        Err(e) => {
            warn!(error = %e, query = %query, "video detail lookup failed");
            return Vec::new();
        }
    };

    let candidates = items.len();
    let mut ranked: Vec<RankedVideo> = items
        .into_iter()
        .map(VideoCandidate::from)
        .filter(is_educational)
        .map(score)
        .collect();

    // `sort_by` is stable, so equal ratings stay in source order.
    ranked.sort_by(|a, b| b.rating.total_cmp(&a.rating));

    info!(candidates, kept = ranked.len(), "video ranking complete");
    ranked
}

/// True when title or description hits an educational phrase and neither hits an excluded one.
pub fn is_educational(candidate: &VideoCandidate) -> bool {
    let title = candidate.title.to_lowercase();
    let description = candidate.description.to_lowercase();
    let mentions = |kw: &&str| title.contains(*kw) || description.contains(*kw);

    EDUCATIONAL.iter().any(mentions) && !EXCLUDED.iter().any(mentions)
}

pub fn rating(views: u64, likes: u64, dislikes: u64) -> f64 {
    let views = views as f64;
    let likes = likes as f64;
    let dislikes = dislikes as f64;

    let view_score = (views / VIEW_SATURATION).min(1.0) * 4.0;
    let like_score = (likes / LIKE_SATURATION).min(1.0) * 3.0;
    let engagement_score = likes / (likes + dislikes + 1.0) * 3.0;

    let rounded = ((view_score + like_score + engagement_score) * 10.0).round() / 10.0;
    rounded.clamp(0.0, MAX_RATING)
}

fn score(candidate: VideoCandidate) -> RankedVideo {
    let rating = rating(
        candidate.view_count,
        candidate.like_count,
        candidate.dislike_count,
    );
    RankedVideo {
        url: format!("https://www.youtube.com/watch?v={}", candidate.id),
        provider: "YouTube",
        category: "Educational",
        summary: format!("Watch {} on YouTube.", candidate.title),
        views: format_views(candidate.view_count),
        duration_minutes: parse_duration_minutes(&candidate.duration),
        rating,
        id: candidate.id,
        title: candidate.title,
        description: candidate.description,
        thumbnail: candidate.thumbnail,
        view_count: candidate.view_count,
        like_count: candidate.like_count,
        dislike_count: candidate.dislike_count,
        duration: candidate.duration,
    }
}

pub fn format_views(views: u64) -> String {
    if views >= 1_000_000 {
        format!("{:.1}M", views as f64 / 1_000_000.0)
    } else if views >= 1_000 {
        format!("{:.1}K", views as f64 / 1_000.0)
    } else {
        views.to_string()
    }
}

/// `1.2M`-style view count: first number plus an optional `K`/`M` suffix.
static VIEWS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)([KM]?)").expect("views pattern is valid"));

/// ISO-8601 duration components; each group is optional and matched independently.
static DURATION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"PT(\d+H)?(\d+M)?(\d+S)?").expect("duration pattern is valid"));

/// Inverse of [`format_views`]. Anything unrecognisable is 0.
pub fn parse_views(views: &str) -> f64 {
    let Some(caps) = VIEWS_PATTERN.captures(views) else {
        return 0.0;
    };
    let number: f64 = caps[1].parse().unwrap_or(0.0);
    match &caps[2] {
        "K" => number * 1_000.0,
        "M" => number * 1_000_000.0,
        _ => number,
    }
}

/// ISO-8601 `PT#H#M#S` to minutes. Components that do not match count as 0.
pub fn parse_duration_minutes(duration: &str) -> f64 {
    let Some(caps) = DURATION_PATTERN.captures(duration) else {
        return 0.0;
    };
    let component = |i: usize| -> f64 {
        caps.get(i)
            .and_then(|m| m.as_str()[..m.as_str().len() - 1].parse().ok())
            .unwrap_or(0.0)
    };

    component(1) * 60.0 + component(2) + component(3) / 60.0
}

/// Presentation order: rating descending, then view count (as displayed) descending.
pub fn sort_for_display(videos: &mut [RankedVideo]) {
    videos.sort_by(|a, b| {
        b.rating
            .total_cmp(&a.rating)
            .then_with(|| {
                parse_views(&b.views)
                    .partial_cmp(&parse_views(&a.views))
                    .unwrap_or(Ordering::Equal)
            })
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::youtube::client::YouTubeError;
    use crate::youtube::types::VideoItem;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct MockVideos {
        ids: Mutex<VecDeque<Result<Vec<String>, YouTubeError>>>,
        details: Mutex<VecDeque<Result<Vec<VideoItem>, YouTubeError>>>,
        calls: Mutex<Vec<String>>,
    }

    impl MockVideos {
        fn with_items(items: Vec<serde_json::Value>) -> Self {
            let parsed: Vec<VideoItem> = items
                .into_iter()
                .map(|v| serde_json::from_value(v).unwrap())
                .collect();
            let ids = parsed.iter().map(|i| i.id.clone()).collect();
            Self {
                ids: Mutex::new(VecDeque::from([Ok(ids)])),
                details: Mutex::new(VecDeque::from([Ok(parsed)])),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn search_fails(error: YouTubeError) -> Self {
            Self {
                ids: Mutex::new(VecDeque::from([Err(error)])),
                details: Mutex::new(VecDeque::new()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn details_fail(error: YouTubeError) -> Self {
            Self {
                ids: Mutex::new(VecDeque::from([Ok(vec!["a".to_string()])])),
                details: Mutex::new(VecDeque::from([Err(error)])),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl VideoSource for MockVideos {
        async fn search_ids(&self, query: &str) -> Result<Vec<String>, YouTubeError> {
            self.calls.lock().unwrap().push(format!("search:{query}"));
            self.ids
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(YouTubeError::RateLimited))
        }

        async fn video_details(&self, ids: &[String]) -> Result<Vec<VideoItem>, YouTubeError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("details:{}", ids.join(",")));
            self.details
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(YouTubeError::RateLimited))
        }
    }

    fn item(id: &str, title: &str, views: u64, likes: u64) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "snippet": {"title": title, "description": ""},
            "statistics": {"viewCount": views.to_string(), "likeCount": likes.to_string()},
            "contentDetails": {"duration": "PT10M"}
        })
    }

    fn candidate(title: &str, description: &str) -> VideoCandidate {
        VideoCandidate {
            id: "x".into(),
            title: title.into(),
            description: description.into(),
            view_count: 0,
            like_count: 0,
            dislike_count: 0,
            thumbnail: String::new(),
            duration: String::new(),
        }
    }

    fn query(s: &str) -> SearchQuery {
        SearchQuery::parse(s).unwrap()
    }

    #[test]
    fn python_tutorial_scenario_rates_8_5() {
        let r = rating(2_000_000, 50_000, 0);
        assert_eq!(r, 8.5);
        assert_eq!(format_views(2_000_000), "2.0M");
    }

    #[test]
    fn zero_counters_rate_zero_not_nan() {
        let r = rating(0, 0, 0);
        assert_eq!(r, 0.0);
        assert!(!r.is_nan());
    }

    #[test]
    fn rating_is_clamped_for_extreme_counters() {
        for (v, l, d) in [
            (u64::MAX, u64::MAX, 0),
            (u64::MAX, 0, u64::MAX),
            (10, 1_000_000_000, 0),
            (0, 0, 1_000_000),
        ] {
            let r = rating(v, l, d);
            assert!((0.0..=MAX_RATING).contains(&r), "rating {r} for ({v},{l},{d})");
        }
    }

    #[test]
    fn dislikes_reduce_engagement() {
        assert!(rating(500_000, 10_000, 10_000) < rating(500_000, 10_000, 0));
    }

    #[test]
    fn filter_requires_educational_phrase() {
        assert!(is_educational(&candidate("Rust Tutorial", "")));
        assert!(is_educational(&candidate("Ownership", "a complete GUIDE to borrowing")));
        assert!(!is_educational(&candidate("My vacation vlog", "sunny days")));
    }

    #[test]
    fn filter_exclusion_wins_over_educational() {
        assert!(!is_educational(&candidate("Guitar tutorial", "learn this song")));
        assert!(!is_educational(&candidate("Funny coding tutorial", "")));
    }

    #[test]
    fn format_views_thresholds() {
        assert_eq!(format_views(999), "999");
        assert_eq!(format_views(1_000), "1.0K");
        assert_eq!(format_views(950_000), "950.0K");
        assert_eq!(format_views(1_234_567), "1.2M");
    }

    #[test]
    fn parse_views_reads_suffixes() {
        assert_eq!(parse_views("1.2M"), 1_200_000.0);
        assert_eq!(parse_views("950.0K"), 950_000.0);
        assert_eq!(parse_views("999"), 999.0);
        assert_eq!(parse_views("n/a"), 0.0);
        assert_eq!(parse_views("12."), 12.0);
        assert_eq!(parse_views("1.2 M"), 1.2);
    }

    #[test]
    fn duration_to_minutes() {
        assert_eq!(parse_duration_minutes("PT1H2M30S"), 62.5);
        assert_eq!(parse_duration_minutes("PT45S"), 0.75);
        assert_eq!(parse_duration_minutes("PT10M"), 10.0);
        assert_eq!(parse_duration_minutes("P1D"), 0.0);
        assert_eq!(parse_duration_minutes(""), 0.0);
    }

    #[test]
    fn duration_keeps_components_before_unexpected_text() {
        assert_eq!(parse_duration_minutes("PT1H2M3.5S"), 62.0);
        assert_eq!(parse_duration_minutes("PT2M"), 2.0);
        assert_eq!(parse_duration_minutes("P0DT1H"), 0.0);
    }

    #[tokio::test]
    async fn rank_scenario_single_tutorial() {
        let mock = MockVideos::with_items(vec![item(
            "py1",
            "Python tutorial for everyone",
            2_000_000,
            50_000,
        )]);

        let ranked = rank(&mock, &query("python tutorial")).await;
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].rating, 8.5);
        assert_eq!(ranked[0].views, "2.0M");
        assert_eq!(ranked[0].url, "https://www.youtube.com/watch?v=py1");
        assert_eq!(ranked[0].duration_minutes, 10.0);
        assert_eq!(
            mock.calls(),
            vec!["search:python tutorial".to_string(), "details:py1".to_string()]
        );
    }

    #[tokio::test]
    async fn rank_drops_off_topic_and_sorts_descending() {
        let mock = MockVideos::with_items(vec![
            item("low", "Intro to SQL", 1_000, 10),
            item("party", "Dance tutorial", 5_000_000, 200_000),
            item("vlog", "Weekend vlog", 9_000_000, 900_000),
            item("high", "Learn SQL in depth", 3_000_000, 150_000),
        ]);

        let ranked = rank(&mock, &query("sql")).await;
        let ids: Vec<_> = ranked.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["high", "low"]);
    }

    #[tokio::test]
    async fn rank_keeps_source_order_on_ties() {
        let mock = MockVideos::with_items(vec![
            item("first", "Tutorial one", 100, 0),
            item("second", "Tutorial two", 100, 0),
            item("third", "Tutorial three", 100, 0),
        ]);

        let ranked = rank(&mock, &query("tutorial")).await;
        let ids: Vec<_> = ranked.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn rank_search_failure_is_empty() {
        let mock = MockVideos::search_fails(YouTubeError::RateLimited);
        assert!(rank(&mock, &query("rust")).await.is_empty());
        assert_eq!(mock.calls(), vec!["search:rust".to_string()]);
    }

    #[tokio::test]
    async fn rank_detail_failure_is_empty() {
        let mock = MockVideos::details_fail(YouTubeError::QuotaExhausted("quota".into()));
        assert!(rank(&mock, &query("rust")).await.is_empty());
    }

    #[tokio::test]
    async fn rank_skips_detail_call_without_ids() {
        let mock = MockVideos {
            ids: Mutex::new(VecDeque::from([Ok(Vec::new())])),
            details: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        };
        assert!(rank(&mock, &query("rust")).await.is_empty());
        assert_eq!(mock.calls().len(), 1);
    }

    #[test]
    fn display_sort_breaks_ties_by_views() {
        let mut a = score(candidate("Tutorial a", ""));
        a.views = "1.2K".into();
        a.rating = 5.0;
        let mut b = score(candidate("Tutorial b", ""));
        b.views = "3.4M".into();
        b.rating = 5.0;
        let mut c = score(candidate("Tutorial c", ""));
        c.views = "10".into();
        c.rating = 7.0;

        let mut videos = vec![a, b, c];
        sort_for_display(&mut videos);
        let views: Vec<_> = videos.iter().map(|v| v.views.as_str()).collect();
        assert_eq!(views, vec!["10", "3.4M", "1.2K"]);
    }
}
