use tracing::{debug, info, warn};

use super::{BookCatalog, BookRecord, BookSource, Ebook};
use crate::cache::QueryCache;
use crate::query::SearchQuery;

/// Walk [`BookSource::PRIORITY`] and return the first non-empty result set.
///
/// A failing catalog counts as empty so the chain keeps going; later
/// catalogs are never queried once one has answered. Order within the
/// winning set is the catalog's own.
pub async fn recommend(catalog: &impl BookCatalog, query: &SearchQuery) -> Vec<BookRecord> {
    for source in BookSource::PRIORITY {
        match catalog.search(source, query.as_str()).await {
            Ok(books) if !books.is_empty() => {
                info!(%source, count = books.len(), "book recommendations found");
                return books;
            }
            Ok(_) => debug!(%source, query = %query, "no books, falling back"),
            Err(e) => warn!(%source, error = %e, "book catalog failed, falling back"),
        }
    }
    info!(query = %query, "no book recommendations from any catalog");
    Vec::new()
}

/// [`recommend`] behind a [`QueryCache`]. Empty results are not memoised, so a
/// query that failed everywhere is retried next time.
pub async fn recommend_cached(
    cache: &QueryCache<Vec<BookRecord>>,
    catalog: &impl BookCatalog,
    query: &SearchQuery,
) -> Vec<BookRecord> {
    if let Some(books) = cache.get(query) {
        debug!(query = %query, "book recommendations served from cache");
        return books;
    }
    let books = recommend(catalog, query).await;
    if !books.is_empty() {
        cache.insert(query, books.clone());
    }
    books
}

pub async fn search_ebooks(catalog: &impl BookCatalog, query: &SearchQuery) -> Vec<Ebook> {
    match catalog.ebooks(query.as_str()).await {
        Ok(ebooks) => ebooks,
        Err(e) => {
            warn!(error = %e, query = %query, "ebook search failed");
            Vec::new()
        }
    }
}
