use serde_json::Value;
use tracing::warn;

use super::{records_at, trim_base, ClassificationPage, PagedRequest, SourceAdapter};
use crate::constants::{CLASSIFICATION_PAGE_SIZE, HARVARD_SOURCE_NAME, HARVARD_TAG};
use crate::error::Result;
use crate::normalize::{HarvardNormalizer, MetricsNormalizer, SourceNormalizer};
use crate::types::{FetchParams, NormalizedArtwork, RawArtworkData, RequestSpec, SortBy, SourcePage};

/// Harvard Art Museums API. Every request carries the API key.
pub struct HarvardAdapter {
    base_url: String,
    api_key: Option<String>,
    normalizer: MetricsNormalizer<HarvardNormalizer>,
}

impl HarvardAdapter {
    pub fn new(base_url: &str, api_key: Option<String>) -> Self {
        if api_key.is_none() {
            warn!("HARVARD_ART_MUSEUMS_API is not set; Harvard requests will be rejected upstream");
        }
        Self {
            base_url: trim_base(base_url),
            api_key,
            normalizer: MetricsNormalizer::new(HarvardNormalizer),
        }
    }

    fn sort_field(sort_by: SortBy) -> &'static str {
        match sort_by {
            SortBy::Medium => "medium",
            SortBy::Date => "dated",
        }
    }

    fn request(&self, path: &str) -> RequestSpec {
        let spec = RequestSpec::new(HARVARD_TAG, format!("{}/{}", self.base_url, path));
        match &self.api_key {
            Some(key) => spec.param("apikey", key),
            None => spec,
        }
    }
}

impl SourceAdapter for HarvardAdapter {
    fn tag(&self) -> &'static str {
        HARVARD_TAG
    }

    fn name(&self) -> &'static str {
        HARVARD_SOURCE_NAME
    }

    fn build_queries(&self, params: &FetchParams) -> Vec<RequestSpec> {
        let mut spec = self.request("object");

        if let Some(search) = &params.search {
            spec = spec.param("keyword", search);
        }
        // Pipe-separated values are OR-ed upstream
        if !params.classifications.is_empty() {
            spec = spec.param("classification", params.classifications.join("|"));
        }
        if let Some(sort_by) = params.sort_by {
            spec = spec
                .param("sort", Self::sort_field(sort_by))
                .param("sortorder", params.sort_order.as_str());
        }
        vec![spec]
    }

    /// Harvard pages by `page`/`size`. An offset that is not a multiple of
    /// `limit` straddles two pages of that size.
    fn page_request(&self, base: &RequestSpec, offset: u64, limit: usize) -> PagedRequest {
        let size = limit.max(1) as u64;
        let first = offset / size;
        let skip = offset - first * size;

        let mut requests = vec![base.clone().param("size", size).param("page", first + 1)];
        if skip > 0 {
            requests.push(base.clone().param("size", size).param("page", first + 2));
        }
        PagedRequest {
            requests,
            skip: skip as usize,
            limit,
        }
    }

    fn parse_response(&self, raw: &Value) -> Result<SourcePage> {
        let records = records_at(raw, "records")?;
        let total = raw
            .pointer("/info/totalrecords")
            .and_then(Value::as_u64)
            .unwrap_or(records.len() as u64);
        Ok(SourcePage { records, total })
    }

    fn normalize(&self, raw: &RawArtworkData) -> Option<NormalizedArtwork> {
        self.normalizer.normalize(raw)
    }

    fn detail_request(&self, native_id: &str) -> RequestSpec {
        self.request(&format!("object/{native_id}"))
    }

    fn classification_request(&self, page: u32) -> Option<RequestSpec> {
        Some(
            self.request("classification")
                .param("page", page)
                .param("size", CLASSIFICATION_PAGE_SIZE),
        )
    }

    fn parse_classifications(&self, raw: &Value) -> Result<ClassificationPage> {
        let names = records_at(raw, "records")?
            .iter()
            .filter_map(|record| record.get("name").and_then(Value::as_str))
            .map(str::to_string)
            .collect();
        let pages = raw
            .pointer("/info/pages")
            .and_then(Value::as_u64)
            .unwrap_or(1) as u32;
        Ok(ClassificationPage { names, pages })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SortOrder;
    use serde_json::json;

    fn adapter() -> HarvardAdapter {
        HarvardAdapter::new("https://api.harvardartmuseums.org", Some("k3y".into()))
    }

    #[test]
    fn test_build_query_translates_params() {
        let params = FetchParams {
            page: 3,
            search: Some("vase".into()),
            sort_by: Some(SortBy::Date),
            sort_order: SortOrder::Desc,
            classifications: vec!["Paintings".into(), "Prints".into()],
        };

        let specs = adapter().build_queries(&params);
        assert_eq!(specs.len(), 1);
        let spec = &specs[0];
        assert_eq!(spec.url, "https://api.harvardartmuseums.org/object");
        assert_eq!(spec.query_value("apikey"), Some("k3y"));
        assert_eq!(spec.query_value("size"), None);
        assert_eq!(spec.query_value("keyword"), Some("vase"));
        assert_eq!(spec.query_value("classification"), Some("Paintings|Prints"));
        assert_eq!(spec.query_value("sort"), Some("dated"));
        assert_eq!(spec.query_value("sortorder"), Some("desc"));
    }

    #[test]
    fn test_aligned_page_request() {
        let a = adapter();
        let base = a.build_queries(&FetchParams::default()).remove(0);

        let paged = a.page_request(&base, 0, 40);
        assert_eq!(paged.requests.len(), 1);
        assert_eq!(paged.requests[0].query_value("size"), Some("40"));
        assert_eq!(paged.requests[0].query_value("page"), Some("1"));

        let paged = a.page_request(&base, 100, 10);
        assert_eq!(paged.requests.len(), 1);
        assert_eq!(paged.requests[0].query_value("page"), Some("11"));
        assert_eq!(paged.skip, 0);
    }

    #[test]
    fn test_unaligned_page_request_spans_two_pages() {
        let a = adapter();
        let base = a.build_queries(&FetchParams::default()).remove(0);

        let paged = a.page_request(&base, 70, 20);
        let pages: Vec<_> = paged
            .requests
            .iter()
            .map(|r| r.query_value("page").unwrap())
            .collect();
        assert_eq!(pages, vec!["4", "5"]);
        assert!(paged.requests.iter().all(|r| r.query_value("size") == Some("20")));
        assert_eq!(paged.skip, 10);
        assert_eq!(paged.limit, 20);
    }

    #[test]
    fn test_detail_request_carries_key() {
        let spec = adapter().detail_request("299843");
        assert_eq!(spec.url, "https://api.harvardartmuseums.org/object/299843");
        assert_eq!(spec.query_value("apikey"), Some("k3y"));
    }

    #[test]
    fn test_parse_response_total() {
        let raw = json!({"info": {"totalrecords": 77, "pages": 4}, "records": [{"id": 1}]});
        let page = adapter().parse_response(&raw).unwrap();
        assert_eq!(page.total, 77);
        assert_eq!(page.records.len(), 1);
    }

    #[test]
    fn test_parse_classifications() {
        let raw = json!({
            "info": {"pages": 3, "page": 1},
            "records": [{"name": "Paintings", "id": 26}, {"name": "Prints", "id": 23}]
        });
        let page = adapter().parse_classifications(&raw).unwrap();
        assert_eq!(page.names, vec!["Paintings", "Prints"]);
        assert_eq!(page.pages, 3);
    }
}
