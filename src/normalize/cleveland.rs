use super::base::{NormalizerUtils, SourceNormalizer};
use crate::constants::{CLEVELAND_SOURCE_NAME, CLEVELAND_TAG, DEFAULT_TITLE};
use crate::types::{NormalizedArtwork, RawArtworkData};

/// Normalizer for the Cleveland Museum of Art open-access API
#[derive(Debug, Default, Clone, Copy)]
pub struct ClevelandNormalizer;

impl SourceNormalizer for ClevelandNormalizer {
    fn normalize(&self, data: &RawArtworkData) -> Option<NormalizedArtwork> {
        let native_id = NormalizerUtils::native_id(data)?;

        Some(NormalizedArtwork {
            id: NormalizerUtils::build_id(CLEVELAND_TAG, &native_id),
            title: NormalizerUtils::string_field(data, "title")
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            artist: NormalizerUtils::artist(data, "creators", "description"),
            date: NormalizerUtils::string_field(data, "creation_date"),
            medium: NormalizerUtils::string_field(data, "technique"),
            department: NormalizerUtils::string_field(data, "department"),
            culture: NormalizerUtils::string_or_list(data, "culture"),
            image: NormalizerUtils::nested_str(data, &["images", "web", "url"]),
            location: NormalizerUtils::string_field(data, "current_location"),
            creditline: NormalizerUtils::string_field_or(data, "creditline", "tombstone"),
            description: NormalizerUtils::string_field_or(data, "description", "tombstone")
                .unwrap_or_default(),
            kind: NormalizerUtils::string_field(data, "type"),
            source: self.source_name().to_string(),
            source_url: NormalizerUtils::string_field(data, "url"),
        })
    }

    fn source_tag(&self) -> &'static str {
        CLEVELAND_TAG
    }

    fn source_name(&self) -> &'static str {
        CLEVELAND_SOURCE_NAME
    }
}
