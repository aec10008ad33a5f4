use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_PAGE_SIZE;

/// Raw artwork record as returned from a museum API
pub type RawArtworkData = serde_json::Value;

/// The unified artwork shape shared by every source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedArtwork {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub date: Option<String>,
    pub medium: Option<String>,
    pub department: Option<String>,
    pub culture: Option<String>,
    pub image: Option<String>,
    pub location: Option<String>,
    pub creditline: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub source: String,
    #[serde(default)]
    pub source_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    Medium,
    Date,
}

impl SortBy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "medium" => Some(SortBy::Medium),
            "date" => Some(SortBy::Date),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Unknown values fall back to ascending.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "desc" => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Shared query parameters for one "list artworks" request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchParams {
    pub page: u32,
    pub search: Option<String>,
    pub sort_by: Option<SortBy>,
    pub sort_order: SortOrder,
    pub classifications: Vec<String>,
}

impl Default for FetchParams {
    fn default() -> Self {
        Self {
            page: 1,
            search: None,
            sort_by: None,
            sort_order: SortOrder::Asc,
            classifications: Vec::new(),
        }
    }
}

/// Query string as the gallery front-end sends it. Everything is optional and
/// loosely typed; `FetchParams::from` does the validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtworksQuery {
    pub page: Option<String>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub classifications: Option<String>,
}

impl From<ArtworksQuery> for FetchParams {
    fn from(query: ArtworksQuery) -> Self {
        let page = query
            .page
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .map(|p| p.min(u32::MAX as i64) as u32)
            .unwrap_or(1);

        let search = query
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let classifications = query
            .classifications
            .as_deref()
            .map(split_classifications)
            .unwrap_or_default();

        Self {
            page,
            search,
            sort_by: query.sort_by.as_deref().and_then(SortBy::parse),
            sort_order: query
                .sort_order
                .as_deref()
                .map(SortOrder::parse)
                .unwrap_or_default(),
            classifications,
        }
    }
}

/// Split a `,` or `|` delimited tag list, dropping blanks and duplicates.
pub fn split_classifications(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.split([',', '|']).map(str::trim) {
        if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// One combined page returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtworkPage {
    pub artworks: Vec<NormalizedArtwork>,
    pub total: u64,
    pub total_pages: u64,
    pub current_page: u32,
}

/// A single upstream GET, described independently of the HTTP client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    pub source: &'static str,
    pub url: String,
    pub query: Vec<(String, String)>,
}

impl RequestSpec {
    pub fn new(source: &'static str, url: impl Into<String>) -> Self {
        Self {
            source,
            url: url.into(),
            query: Vec::new(),
        }
    }

    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Records and the reported total match count unwrapped from a list response
#[derive(Debug, Clone, Default)]
pub struct SourcePage {
    pub records: Vec<RawArtworkData>,
    pub total: u64,
}

/// Number of pages needed to show `total` items
pub fn total_pages(total: u64, page_size: usize) -> u64 {
    let size = page_size.max(1) as u64;
    total.div_ceil(size)
}

pub fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}
