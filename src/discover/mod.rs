//! Discovery: both pipelines for one query, assembled into a report.

pub mod format;

use futures::future::join;
use serde::Serialize;
use tracing::info;

use crate::books::{self, BookCatalog, BookRecord};
use crate::cache::QueryCache;
use crate::query::SearchQuery;
use crate::youtube::{self, RankedVideo, VideoSource};

/// Size of the "top videos" strip.
pub const DEFAULT_TOP: usize = 10;

/// Popular-resources categories as (heading, search query), queried in this order.
pub const POPULAR_CATEGORIES: [(&str, &str); 3] = [
    ("Web Development", "web development tutorial"),
    ("UI/UX Design", "ui ux design tutorial"),
    ("Data Science", "data science tutorial"),
];
pub const POPULAR_PER_CATEGORY: usize = 5;

#[derive(Debug, Serialize)]
pub struct DiscoveryReport {
    pub query: String,
    /// False when no video API credential is configured.
    pub video_search_enabled: bool,
    /// Display order: rating, then views, descending.
    pub videos: Vec<RankedVideo>,
    pub top_videos: Vec<RankedVideo>,
    pub books: Vec<BookRecord>,
}

impl DiscoveryReport {
    /// Report for blank input, produced without touching the network.
    pub fn empty(raw_query: &str, video_search_enabled: bool) -> Self {
        Self {
            query: raw_query.trim().to_string(),
            video_search_enabled,
            videos: Vec::new(),
            top_videos: Vec::new(),
            books: Vec::new(),
        }
    }
}

/// Run the video and book pipelines for `query`.
///
/// The two pipelines are independent and awaited together; each stays
/// sequential inside. Neither can fail, so the report is always complete,
/// possibly with empty sections. Without `book_cache` every call goes to
/// the catalogs.
pub async fn discover(
    videos: Option<&impl VideoSource>,
    catalog: &impl BookCatalog,
    book_cache: Option<&QueryCache<Vec<BookRecord>>>,
    query: &SearchQuery,
    top: usize,
) -> DiscoveryReport {
    let video_search_enabled = videos.is_some();
    let ranked = async {
        match videos {
            Some(source) => youtube::rank(source, query).await,
            None => Vec::new(),
        }
    };
    let recommended = async {
        match book_cache {
            Some(cache) => books::recommend_cached(cache, catalog, query).await,
            None => books::recommend(catalog, query).await,
        }
    };

    let (mut ranked, books) = join(ranked, recommended).await;
    youtube::sort_for_display(&mut ranked);
    let top_videos = ranked.iter().take(top).cloned().collect();

    info!(
        query = %query,
        videos = ranked.len(),
        books = books.len(),
        "discovery complete"
    );

    DiscoveryReport {
        query: query.to_string(),
        video_search_enabled,
        videos: ranked,
        top_videos,
        books,
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryVideos {
    pub category: &'static str,
    pub query: &'static str,
    /// Ranking order, at most [`POPULAR_PER_CATEGORY`].
    pub videos: Vec<RankedVideo>,
}

/// Best few videos for each of [`POPULAR_CATEGORIES`].
///
/// Categories are ranked one after another. A failing or disabled source
/// leaves that category empty.
pub async fn popular(videos: Option<&impl VideoSource>) -> Vec<CategoryVideos> {
    let mut sections = Vec::with_capacity(POPULAR_CATEGORIES.len());
    for (category, raw) in POPULAR_CATEGORIES {
        let mut ranked = match (videos, SearchQuery::parse(raw)) {
            (Some(source), Some(query)) => youtube::rank(source, &query).await,
            _ => Vec::new(),
        };
        ranked.truncate(POPULAR_PER_CATEGORY);
        sections.push(CategoryVideos {
            category,
            query: raw,
            videos: ranked,
        });
    }
    info!(
        videos = sections.iter().map(|s| s.videos.len()).sum::<usize>(),
        "popular resources complete"
    );
    sections
}
