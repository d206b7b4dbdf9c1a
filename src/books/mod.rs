//! Book recommendations from three public catalogs behind a fallback chain.

pub mod aggregator;
mod normalize;
pub mod types;

pub use aggregator::{recommend, recommend_cached, search_ebooks};
pub use types::{BookRecord, BookSource, Ebook};

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use types::{GutendexResponse, OpenLibraryResponse, VolumesResponse};

const GOOGLE_BOOKS_BASE: &str = "https://www.googleapis.com/books/v1";
const OPEN_LIBRARY_BASE: &str = "https://openlibrary.org";
const GUTENDEX_BASE: &str = "https://gutendex.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const OPEN_LIBRARY_LIMIT: &str = "20";

/// Errors returned by a single catalog request.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("{0} rate limit exceeded")]
    RateLimited(BookSource),

    #[error("{source_name} API error ({code}): {message}")]
    Api {
        source_name: BookSource,
        code: u16,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Per-catalog search. Implemented by `CatalogClient`; mock implementations used in tests.
pub trait BookCatalog {
    async fn search(
        &self,
        source: BookSource,
        query: &str,
    ) -> Result<Vec<BookRecord>, CatalogError>;

    async fn ebooks(&self, query: &str) -> Result<Vec<Ebook>, CatalogError>;
}

#[derive(Clone, Debug)]
struct Endpoints {
    google_books: String,
    open_library: String,
    gutendex: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            google_books: GOOGLE_BOOKS_BASE.to_string(),
            open_library: OPEN_LIBRARY_BASE.to_string(),
            gutendex: GUTENDEX_BASE.to_string(),
        }
    }
}

/// HTTP client for Google Books, Open Library and Gutendex. None of them need credentials.
#[derive(Clone, Debug)]
pub struct CatalogClient {
    http: Client,
    endpoints: Endpoints,
}

impl CatalogClient {
    pub fn new(http: Client) -> Self {
        Self {
            http,
            endpoints: Endpoints::default(),
        }
    }

    /// Point every catalog at one mock server.
    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            endpoints: Endpoints {
                google_books: base_url.to_string(),
                open_library: base_url.to_string(),
                gutendex: base_url.to_string(),
            },
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        source: BookSource,
        url: Url,
    ) -> Result<T, CatalogError> {
        let response = self
            .http
            .get(url)
            .header("User-Agent", crate::USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        match status.as_u16() {
            200..=299 => {
                let text = response.text().await?;
                Ok(serde_json::from_str(&text)?)
            }
            429 => Err(CatalogError::RateLimited(source)),
            _ => {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| format!("HTTP {status}"));
                Err(CatalogError::Api {
                    source_name: source,
                    code: status.as_u16(),
                    message: body.chars().take(200).collect(),
                })
            }
        }
    }

    fn url(base: &str, path: &str, params: &[(&str, &str)]) -> Result<Url, CatalogError> {
        Ok(Url::parse_with_params(&format!("{base}{path}"), params)?)
    }

    async fn google_books(&self, query: &str) -> Result<Vec<BookRecord>, CatalogError> {
        let max = normalize::MAX_BOOKS.to_string();
        let url = Self::url(
            &self.endpoints.google_books,
            "/volumes",
            &[("q", query), ("maxResults", max.as_str())],
        )?;
        let resp: VolumesResponse = self.get_json(BookSource::GoogleBooks, url).await?;
        Ok(normalize::from_google_books(resp))
    }

    async fn open_library(&self, query: &str) -> Result<Vec<BookRecord>, CatalogError> {
        let url = Self::url(
            &self.endpoints.open_library,
            "/search.json",
            &[("q", query), ("limit", OPEN_LIBRARY_LIMIT)],
        )?;
        let resp: OpenLibraryResponse = self.get_json(BookSource::OpenLibrary, url).await?;
        Ok(normalize::from_open_library(resp))
    }

    async fn gutendex(&self, query: &str) -> Result<GutendexResponse, CatalogError> {
        let url = Self::url(&self.endpoints.gutendex, "/books", &[("search", query)])?;
        self.get_json(BookSource::Gutendex, url).await
    }
}

impl BookCatalog for CatalogClient {
    async fn search(
        &self,
        source: BookSource,
        query: &str,
    ) -> Result<Vec<BookRecord>, CatalogError> {
        let books = match source {
            BookSource::GoogleBooks => self.google_books(query).await?,
            BookSource::OpenLibrary => self.open_library(query).await?,
            BookSource::Gutendex => normalize::from_gutendex(self.gutendex(query).await?),
        };
        debug!(%source, count = books.len(), "catalog search complete");
        Ok(books)
    }

    async fn ebooks(&self, query: &str) -> Result<Vec<Ebook>, CatalogError> {
        let ebooks = normalize::ebooks_from_gutendex(self.gutendex(query).await?);
        debug!(count = ebooks.len(), "ebook search complete");
        Ok(ebooks)
    }
}
