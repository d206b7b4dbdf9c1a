//! Adapters from each catalog's response shape to [`BookRecord`].

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use super::types::*;

/// Max records taken from any one catalog.
pub const MAX_BOOKS: usize = 10;

const UNTITLED: &str = "Untitled";
const UNKNOWN_AUTHOR: &str = "Unknown Author";
const NO_LINK: &str = "#";

const OPEN_LIBRARY_WEB: &str = "https://openlibrary.org";
const OPEN_LIBRARY_COVERS: &str = "https://covers.openlibrary.org/b/id";

const MIME_PDF: &str = "application/pdf";
const MIME_EPUB: &str = "application/epub+zip";
const MIME_TEXT: &str = "text/plain; charset=utf-8";
const MIME_HTML: &str = "text/html";

/// Characters escaped in a query-string value.
const QUERY_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'<')
    .add(b'>')
    .add(b'=')
    .add(b'?')
    .add(b'`');

fn title_or_default(title: Option<String>) -> String {
    title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string())
}

fn authors_or_default(authors: Option<Vec<String>>) -> Vec<String> {
    let authors: Vec<String> = authors
        .unwrap_or_default()
        .into_iter()
        .filter(|a| !a.trim().is_empty())
        .collect();
    if authors.is_empty() {
        vec![UNKNOWN_AUTHOR.to_string()]
    } else {
        authors
    }
}

pub fn from_google_books(resp: VolumesResponse) -> Vec<BookRecord> {
    resp.items
        .unwrap_or_default()
        .into_iter()
        .filter_map(|v| v.volume_info)
        .take(MAX_BOOKS)
        .map(|info| BookRecord {
            title: title_or_default(info.title),
            authors: authors_or_default(info.authors),
            cover_image: info
                .image_links
                .and_then(|l| l.thumbnail)
                .unwrap_or_default(),
            info_link: info.info_link.unwrap_or_else(|| NO_LINK.to_string()),
            source: BookSource::GoogleBooks,
        })
        .collect()
}

pub fn from_open_library(resp: OpenLibraryResponse) -> Vec<BookRecord> {
    resp.docs
        .unwrap_or_default()
        .into_iter()
        .filter(|doc| doc.cover_i.is_some() || doc.title.is_some())
        .take(MAX_BOOKS)
        .map(|doc| {
            let cover_image = doc
                .cover_i
                .map(|id| format!("{OPEN_LIBRARY_COVERS}/{id}-M.jpg"))
                .unwrap_or_default();
            let title = title_or_default(doc.title);
            let info_link = open_library_link(
                doc.key.as_deref(),
                doc.edition_key.as_deref().unwrap_or_default(),
                &title,
            );
            BookRecord {
                authors: authors_or_default(doc.author_name),
                title,
                cover_image,
                info_link,
                source: BookSource::OpenLibrary,
            }
        })
        .collect()
}

/// Work page, else first edition page, else a catalog search for the title.
fn open_library_link(key: Option<&str>, edition_keys: &[String], title: &str) -> String {
    if let Some(key) = key.filter(|k| k.starts_with('/')) {
        return format!("{OPEN_LIBRARY_WEB}{key}");
    }
    if let Some(olid) = edition_keys.first().filter(|k| !k.is_empty()) {
        return format!("{OPEN_LIBRARY_WEB}/books/{olid}");
    }
    format!(
        "{OPEN_LIBRARY_WEB}/search?q={}",
        utf8_percent_encode(title, QUERY_VALUE)
    )
}

fn gutendex_authors(book: &GutendexBook) -> Vec<String> {
    authors_or_default(
        book.authors
            .as_ref()
            .map(|people| people.iter().map(|p| p.name.clone()).collect()),
    )
}

pub fn from_gutendex(resp: GutendexResponse) -> Vec<BookRecord> {
    resp.results
        .unwrap_or_default()
        .into_iter()
        .take(MAX_BOOKS)
        .map(|book| {
            let info_link = [MIME_PDF, MIME_EPUB, MIME_TEXT, MIME_HTML]
                .iter()
                .find_map(|mime| book.formats.get(*mime).cloned())
                .unwrap_or_else(|| NO_LINK.to_string());
            BookRecord {
                authors: gutendex_authors(&book),
                title: title_or_default(book.title),
                cover_image: String::new(),
                info_link,
                source: BookSource::Gutendex,
            }
        })
        .collect()
}

/// Results offering none of PDF, EPUB or plain text are dropped.
pub fn ebooks_from_gutendex(resp: GutendexResponse) -> Vec<Ebook> {
    resp.results
        .unwrap_or_default()
        .into_iter()
        .filter_map(|mut book| {
            let authors = gutendex_authors(&book);
            let pdf = book.formats.remove(MIME_PDF);
            let epub = book.formats.remove(MIME_EPUB);
            let text = book.formats.remove(MIME_TEXT);
            if pdf.is_none() && epub.is_none() && text.is_none() {
                return None;
            }
            Some(Ebook {
                title: title_or_default(book.title),
                authors,
                pdf,
                epub,
                text,
            })
        })
        .collect()
}
