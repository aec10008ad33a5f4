use super::base::{NormalizerUtils, SourceNormalizer};
use crate::constants::{DEFAULT_TITLE, HARVARD_SOURCE_NAME, HARVARD_TAG};
use crate::types::{NormalizedArtwork, RawArtworkData};

/// Normalizer for Harvard Art Museums object records
#[derive(Debug, Default, Clone, Copy)]
pub struct HarvardNormalizer;

impl SourceNormalizer for HarvardNormalizer {
    fn normalize(&self, data: &RawArtworkData) -> Option<NormalizedArtwork> {
        let native_id = NormalizerUtils::native_id(data)?;

        let image = NormalizerUtils::string_field(data, "primaryimageurl")
            .or_else(|| NormalizerUtils::nested_str(data, &["images", "0", "baseimageurl"]));

        Some(NormalizedArtwork {
            id: NormalizerUtils::build_id(HARVARD_TAG, &native_id),
            title: NormalizerUtils::string_field(data, "title")
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            artist: NormalizerUtils::artist(data, "people", "name"),
            date: NormalizerUtils::string_field(data, "dated"),
            medium: NormalizerUtils::string_field_or(data, "medium", "technique"),
            department: NormalizerUtils::string_field(data, "department"),
            culture: NormalizerUtils::string_field(data, "culture"),
            image,
            // Harvard records carry no gallery location
            location: None,
            creditline: NormalizerUtils::string_field(data, "creditline"),
            description: NormalizerUtils::string_field(data, "description").unwrap_or_default(),
            kind: NormalizerUtils::string_field(data, "classification"),
            source: self.source_name().to_string(),
            source_url: NormalizerUtils::string_field(data, "url"),
        })
    }

    fn source_tag(&self) -> &'static str {
        HARVARD_TAG
    }

    fn source_name(&self) -> &'static str {
        HARVARD_SOURCE_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_record() {
        let raw = json!({
            "id": 299843,
            "title": "Self-Portrait Dedicated to Paul Gauguin",
            "people": [{"name": "Vincent van Gogh", "role": "Artist"}],
            "dated": "1888",
            "medium": "Oil on canvas",
            "technique": "Painting",
            "classification": "Paintings",
            "culture": "Dutch",
            "department": "Department of Modern and Contemporary Art",
            "primaryimageurl": "https://nrs.harvard.edu/urn-3:HUAM:DDC251942_dynmc",
            "creditline": "Harvard Art Museums/Fogg Museum, Bequest from the Collection of Maurice Wertheim",
            "url": "https://www.harvardartmuseums.org/collections/object/299843"
        });

        let artwork = HarvardNormalizer.normalize(&raw).unwrap();
        assert_eq!(artwork.id, "harvard-299843");
        assert_eq!(artwork.artist, "Vincent van Gogh");
        assert_eq!(artwork.date.as_deref(), Some("1888"));
        assert_eq!(artwork.medium.as_deref(), Some("Oil on canvas"));
        assert_eq!(artwork.kind.as_deref(), Some("Paintings"));
        assert_eq!(artwork.culture.as_deref(), Some("Dutch"));
        assert!(artwork.location.is_none());
        assert_eq!(artwork.description, "");
        assert_eq!(artwork.source, "Harvard Art Museums");
    }

    #[test]
    fn test_image_falls_back_to_images_list() {
        let raw = json!({
            "id": 5,
            "primaryimageurl": null,
            "images": [{"baseimageurl": "https://nrs.harvard.edu/urn-3:HUAM:1"}]
        });
        let artwork = HarvardNormalizer.normalize(&raw).unwrap();
        assert_eq!(artwork.image.as_deref(), Some("https://nrs.harvard.edu/urn-3:HUAM:1"));
    }

    #[test]
    fn test_medium_falls_back_to_technique() {
        let raw = json!({"id": 6, "medium": null, "technique": "Etching"});
        assert_eq!(HarvardNormalizer.normalize(&raw).unwrap().medium.as_deref(), Some("Etching"));
    }
}
