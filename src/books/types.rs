use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Catalog that produced a [`BookRecord`]. Declaration order is fallback priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BookSource {
    #[serde(rename = "Google Books")]
    GoogleBooks,
    #[serde(rename = "OpenLibrary")]
    OpenLibrary,
    #[serde(rename = "Gutendex")]
    Gutendex,
}

impl BookSource {
    /// The fallback chain, tried front to back.
    pub const PRIORITY: [BookSource; 3] = [
        BookSource::GoogleBooks,
        BookSource::OpenLibrary,
        BookSource::Gutendex,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BookSource::GoogleBooks => "Google Books",
            BookSource::OpenLibrary => "OpenLibrary",
            BookSource::Gutendex => "Gutendex",
        }
    }
}

impl fmt::Display for BookSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A book normalized from any catalog. `cover_image` is empty when the catalog had none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    pub title: String,
    pub authors: Vec<String>,
    pub cover_image: String,
    pub info_link: String,
    pub source: BookSource,
}

impl BookRecord {
    pub fn has_cover(&self) -> bool {
        !self.cover_image.is_empty()
    }
}

/// Public-domain ebook with direct download links per format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ebook {
    pub title: String,
    pub authors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epub: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Response from Google Books `GET /books/v1/volumes`.
#[derive(Deserialize, Debug)]
pub struct VolumesResponse {
    pub items: Option<Vec<Volume>>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub volume_info: Option<VolumeInfo>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    pub title: Option<String>,
    pub authors: Option<Vec<String>>,
    pub image_links: Option<ImageLinks>,
    pub info_link: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct ImageLinks {
    pub thumbnail: Option<String>,
}

/// Response from Open Library `GET /search.json`.
#[derive(Deserialize, Debug)]
pub struct OpenLibraryResponse {
    pub docs: Option<Vec<OpenLibraryDoc>>,
}

#[derive(Deserialize, Debug)]
pub struct OpenLibraryDoc {
    pub title: Option<String>,
    pub author_name: Option<Vec<String>>,
    pub cover_i: Option<u64>,
    pub key: Option<String>,
    pub edition_key: Option<Vec<String>>,
}

/// Response from Gutendex `GET /books`.
#[derive(Deserialize, Debug)]
pub struct GutendexResponse {
    pub results: Option<Vec<GutendexBook>>,
}

#[derive(Deserialize, Debug)]
pub struct GutendexBook {
    pub title: Option<String>,
    pub authors: Option<Vec<GutendexPerson>>,
    /// MIME type → download URL.
    #[serde(default)]
    pub formats: HashMap<String, String>,
}

#[derive(Deserialize, Debug)]
pub struct GutendexPerson {
    pub name: String,
}
