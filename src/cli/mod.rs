mod args;

pub use args::{Cli, Command};

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};

use crate::books::{self, BookRecord, CatalogClient};
use crate::cache::QueryCache;
use crate::discover::{self, DiscoveryReport, format};
use crate::query::SearchQuery;
use crate::youtube::{self, YouTubeClient};

/// TCP connection establishment timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Global HTTP client timeout covering DNS + connect + response body.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
/// Maximum redirect hops before aborting.
const MAX_REDIRECTS: usize = 5;

const BLANK_QUERY: &str = "Enter a topic to search for.\n";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("failed to encode JSON output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Command handlers sharing one HTTP client.
///
/// Configuration via environment variables:
/// - `YOUTUBE_API_KEY`: enables video search (optional; books work without it)
#[derive(Clone, Debug)]
pub struct App {
    youtube: Option<YouTubeClient>,
    catalog: CatalogClient,
}

fn render<T: Serialize + ?Sized>(
    value: &T,
    json: bool,
    markdown: impl FnOnce(&T) -> String,
) -> Result<String, AppError> {
    if json {
        let mut out = serde_json::to_string_pretty(value)?;
        out.push('\n');
        Ok(out)
    } else {
        Ok(markdown(value))
    }
}

impl App {
    pub fn new() -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(HTTP_TIMEOUT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;
        let youtube = YouTubeClient::from_env(http.clone())
            .inspect_err(|e| warn!("video search disabled: {e}"))
            .ok();
        Ok(Self {
            youtube,
            catalog: CatalogClient::new(http),
        })
    }

    pub async fn run(&self, command: Command) -> Result<(), AppError> {
        let output = match command {
            Command::Videos(args) => self.videos(&args.joined(), args.json).await?,
            Command::Books(args) => self.books(&args.joined(), args.json).await?,
            Command::Ebooks(args) => self.ebooks(&args.joined(), args.json).await?,
            Command::Discover { args, top } => {
                self.discover(&args.joined(), top, args.json).await?
            }
            Command::Popular { json } => self.popular(json).await?,
            Command::Session {
                top,
                cache_size,
                json,
            } => {
                let stdin = tokio::io::BufReader::new(tokio::io::stdin());
                let mut stdout = tokio::io::stdout();
                return self.session(stdin, &mut stdout, top, cache_size, json).await;
            }
        };
        let mut stdout = tokio::io::stdout();
        stdout.write_all(output.as_bytes()).await?;
        stdout.flush().await?;
        Ok(())
    }

    async fn videos(&self, raw: &str, json: bool) -> Result<String, AppError> {
        let Some(query) = SearchQuery::parse(raw) else {
            return blank(json);
        };
        info!(query = %query, "cmd:videos");

        let mut videos = match &self.youtube {
            Some(client) => youtube::rank(client, &query).await,
            None => Vec::new(),
        };
        youtube::sort_for_display(&mut videos);
        render(videos.as_slice(), json, |v| {
            format::format_videos(v, self.youtube.is_some())
        })
    }

    async fn books(&self, raw: &str, json: bool) -> Result<String, AppError> {
        let Some(query) = SearchQuery::parse(raw) else {
            return blank(json);
        };
        info!(query = %query, "cmd:books");

        let books = books::recommend(&self.catalog, &query).await;
        render(books.as_slice(), json, format::format_books)
    }

    async fn ebooks(&self, raw: &str, json: bool) -> Result<String, AppError> {
        let Some(query) = SearchQuery::parse(raw) else {
            return blank(json);
        };
        info!(query = %query, "cmd:ebooks");

        let ebooks = books::search_ebooks(&self.catalog, &query).await;
        render(ebooks.as_slice(), json, format::format_ebooks)
    }

    /// One-shot report; book results are not memoised.
    async fn discover(&self, raw: &str, top: usize, json: bool) -> Result<String, AppError> {
        let report = match self.report(None, raw, top).await {
            Some(report) => report,
            None if json => DiscoveryReport::empty(raw, self.youtube.is_some()),
            None => return Ok(BLANK_QUERY.to_string()),
        };
        render(&report, json, format::format_report)
    }

    /// `None` for blank input.
    async fn report(
        &self,
        cache: Option<&QueryCache<Vec<BookRecord>>>,
        raw: &str,
        top: usize,
    ) -> Option<DiscoveryReport> {
        let query = SearchQuery::parse(raw)?;
        info!(query = %query, top, "cmd:discover");
        Some(discover::discover(self.youtube.as_ref(), &self.catalog, cache, &query, top).await)
    }

    async fn popular(&self, json: bool) -> Result<String, AppError> {
        info!("cmd:popular");
        let sections = discover::popular(self.youtube.as_ref()).await;
        render(sections.as_slice(), json, |s| {
            format::format_popular(s, self.youtube.is_some())
        })
    }

    /// One report per input line, sharing a book cache across lines. Blank lines are skipped.
    async fn session<R, W>(
        &self,
        input: R,
        output: &mut W,
        top: usize,
        cache_size: usize,
        json: bool,
    ) -> Result<(), AppError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let cache = QueryCache::new(cache_size);
        let mut lines = input.lines();
        let mut handled = 0usize;

        while let Some(line) = lines.next_line().await? {
            let Some(report) = self.report(Some(&cache), &line, top).await else {
                continue;
            };
            // One compact JSON object per line.
            let mut text = if json {
                serde_json::to_string(&report)?
            } else {
                format::format_report(&report)
            };
            text.push('\n');
            output.write_all(text.as_bytes()).await?;
            output.flush().await?;
            handled += 1;
        }

        info!(queries = handled, cached = cache.len(), "session ended");
        Ok(())
    }
}

fn blank(json: bool) -> Result<String, AppError> {
    if json {
        Ok("[]\n".to_string())
    } else {
        Ok(BLANK_QUERY.to_string())
    }
}
