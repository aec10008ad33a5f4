/// Source tags and display names. The tag prefixes every artwork id
/// (`<tag>-<native id>`) and must stay stable: exhibition snapshots key on it.

pub const CLEVELAND_TAG: &str = "cleveland";
pub const HARVARD_TAG: &str = "harvard";

pub const CLEVELAND_SOURCE_NAME: &str = "Cleveland Museum of Art";
pub const HARVARD_SOURCE_NAME: &str = "Harvard Art Museums";

pub const CLEVELAND_API_URL: &str = "https://openaccess-api.clevelandart.org/api";
pub const HARVARD_API_URL: &str = "https://api.harvardartmuseums.org";

/// Separator between the source tag and the native id.
pub const ID_SEPARATOR: char = '-';

pub const DEFAULT_TITLE: &str = "Untitled";
pub const DEFAULT_ARTIST: &str = "Unknown";

pub const DEFAULT_PAGE_SIZE: usize = 20;
/// Upper bound on how many records a single source is asked for in one query.
/// Harvard rejects `size` above 100.
pub const DEFAULT_MAX_SOURCE_WINDOW: usize = 100;

pub const CLASSIFICATION_PAGE_SIZE: u32 = 100;
pub const MAX_CLASSIFICATION_PAGES: u32 = 100;

/// Map a source tag to its human readable museum name
pub fn source_name_for_tag(tag: &str) -> Option<&'static str> {
    match tag {
        CLEVELAND_TAG => Some(CLEVELAND_SOURCE_NAME),
        HARVARD_TAG => Some(HARVARD_SOURCE_NAME),
        _ => None,
    }
}
