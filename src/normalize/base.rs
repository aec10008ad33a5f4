use serde_json::Value;

use crate::constants::{DEFAULT_ARTIST, ID_SEPARATOR};
use crate::metrics;
use crate::types::{NormalizedArtwork, RawArtworkData};

/// Base trait for source-specific normalizers
pub trait SourceNormalizer: Send + Sync {
    /// Map one raw record. `None` means the record cannot be identified.
    fn normalize(&self, raw: &RawArtworkData) -> Option<NormalizedArtwork>;

    /// Tag used as the id prefix
    fn source_tag(&self) -> &'static str;

    /// Human-readable museum name written into `source`
    fn source_name(&self) -> &'static str;
}

/// A wrapper that adds metrics to any normalizer implementation
pub struct MetricsNormalizer<N: SourceNormalizer> {
    inner: N,
}

impl<N: SourceNormalizer> MetricsNormalizer<N> {
    pub fn new(inner: N) -> Self {
        Self { inner }
    }
}

impl<N: SourceNormalizer> SourceNormalizer for MetricsNormalizer<N> {
    fn normalize(&self, raw: &RawArtworkData) -> Option<NormalizedArtwork> {
        let tag = self.inner.source_tag();
        match self.inner.normalize(raw) {
            Some(artwork) => {
                metrics::normalize::record_normalized(tag);
                Some(artwork)
            }
            None => {
                metrics::normalize::record_dropped(tag);
                None
            }
        }
    }

    fn source_tag(&self) -> &'static str {
        self.inner.source_tag()
    }

    fn source_name(&self) -> &'static str {
        self.inner.source_name()
    }
}

/// Field access helpers shared by the normalizers
pub struct NormalizerUtils;

impl NormalizerUtils {
    /// Build the globally unique `<tag>-<native id>` id
    pub fn build_id(tag: &str, native_id: &str) -> String {
        format!("{tag}{ID_SEPARATOR}{native_id}")
    }

    /// Native id as a string; upstreams send numbers but strings are accepted.
    pub fn native_id(data: &Value) -> Option<String> {
        match data.get("id")? {
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        }
    }

    /// Non-empty string field
    pub fn string_field(data: &Value, key: &str) -> Option<String> {
        data.get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
    }

    /// String field or, when absent, the first present fallback
    pub fn string_field_or(data: &Value, key: &str, fallback: &str) -> Option<String> {
        Self::string_field(data, key).or_else(|| Self::string_field(data, fallback))
    }

    /// Join `list[].key` with `", "`, skipping entries without a usable name
    pub fn join_names(data: &Value, list: &str, key: &str) -> Option<String> {
        let names: Vec<&str> = data
            .get(list)?
            .as_array()?
            .iter()
            .filter_map(|entry| entry.get(key).and_then(Value::as_str))
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect();

        if names.is_empty() {
            None
        } else {
            Some(names.join(", "))
        }
    }

    /// Contributor names, defaulting to "Unknown"
    pub fn artist(data: &Value, list: &str, key: &str) -> String {
        Self::join_names(data, list, key).unwrap_or_else(|| DEFAULT_ARTIST.to_string())
    }

    /// A string or an array of strings, joined with `", "`
    pub fn string_or_list(data: &Value, key: &str) -> Option<String> {
        match data.get(key)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Array(items) => {
                let parts: Vec<&str> = items
                    .iter()
                    .filter_map(Value::as_str)
                    .filter(|s| !s.trim().is_empty())
                    .collect();
                (!parts.is_empty()).then(|| parts.join(", "))
            }
            _ => None,
        }
    }

    /// Follow a path of object keys / array indices to a non-empty string
    pub fn nested_str(data: &Value, path: &[&str]) -> Option<String> {
        let mut current = data;
        for segment in path {
            current = match segment.parse::<usize>() {
                Ok(index) => current.get(index)?,
                Err(_) => current.get(segment)?,
            };
        }
        current
            .as_str()
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_native_id_accepts_numbers_and_strings() {
        assert_eq!(NormalizerUtils::native_id(&json!({"id": 12345})).as_deref(), Some("12345"));
        assert_eq!(NormalizerUtils::native_id(&json!({"id": " abc "})).as_deref(), Some("abc"));
        assert_eq!(NormalizerUtils::native_id(&json!({"id": ""})), None);
        assert_eq!(NormalizerUtils::native_id(&json!({"id": null})), None);
        assert_eq!(NormalizerUtils::native_id(&json!({})), None);
    }

    #[test]
    fn test_join_names_skips_blank_entries() {
        let data = json!({"people": [{"name": "A"}, {"name": ""}, {"role": "x"}, {"name": "B"}]});
        assert_eq!(NormalizerUtils::join_names(&data, "people", "name").as_deref(), Some("A, B"));
        assert_eq!(NormalizerUtils::artist(&json!({"people": []}), "people", "name"), "Unknown");
    }

    #[test]
    fn test_nested_str_walks_arrays() {
        let data = json!({"images": [{"baseimageurl": "https://img/1.jpg"}]});
        assert_eq!(
            NormalizerUtils::nested_str(&data, &["images", "0", "baseimageurl"]).as_deref(),
            Some("https://img/1.jpg")
        );
        assert_eq!(NormalizerUtils::nested_str(&data, &["images", "3", "baseimageurl"]), None);
    }

    #[test]
    fn test_string_or_list() {
        assert_eq!(
            NormalizerUtils::string_or_list(&json!({"culture": ["Greek", "Attic"]}), "culture").as_deref(),
            Some("Greek, Attic")
        );
        assert_eq!(
            NormalizerUtils::string_or_list(&json!({"culture": "Chinese"}), "culture").as_deref(),
            Some("Chinese")
        );
        assert_eq!(NormalizerUtils::string_or_list(&json!({"culture": []}), "culture"), None);
    }
}
