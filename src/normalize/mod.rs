//! Source-specific normalizers mapping raw museum records into
//! [`NormalizedArtwork`].
//!
//! Normalizers never fail on missing fields: every miss degrades to the
//! documented default. The only record that is dropped (`None`) is one with no
//! native id, since the prefixed id is what detail lookups and the exhibition
//! key on.

pub mod base;
pub mod cleveland;
pub mod harvard;

pub use base::{MetricsNormalizer, NormalizerUtils, SourceNormalizer};
pub use cleveland::ClevelandNormalizer;
pub use harvard::HarvardNormalizer;

use crate::constants::{CLEVELAND_TAG, HARVARD_TAG};
use crate::types::{NormalizedArtwork, RawArtworkData};
use tracing::warn;

/// Normalize a record given its source tag.
pub fn normalize_artwork(source_tag: &str, raw: &RawArtworkData) -> Option<NormalizedArtwork> {
    match source_tag {
        CLEVELAND_TAG => ClevelandNormalizer.normalize(raw),
        HARVARD_TAG => HarvardNormalizer.normalize(raw),
        other => {
            warn!(source = other, "Unknown source");
            None
        }
    }
}
