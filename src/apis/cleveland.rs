use serde_json::Value;

use super::{records_at, trim_base, PagedRequest, SourceAdapter};
use crate::constants::{CLEVELAND_SOURCE_NAME, CLEVELAND_TAG};
use crate::error::Result;
use crate::normalize::{ClevelandNormalizer, MetricsNormalizer, SourceNormalizer};
use crate::types::{FetchParams, NormalizedArtwork, RawArtworkData, RequestSpec, SortBy, SourcePage};

/// Cleveland Museum of Art open-access API.
///
/// The `type` filter takes a single value, so classification filters fan out
/// to one request per tag. `sort` has no direction, so results always come
/// back ascending.
pub struct ClevelandAdapter {
    base_url: String,
    normalizer: MetricsNormalizer<ClevelandNormalizer>,
}

impl ClevelandAdapter {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: trim_base(base_url),
            normalizer: MetricsNormalizer::new(ClevelandNormalizer),
        }
    }

    fn sort_field(sort_by: SortBy) -> &'static str {
        match sort_by {
            SortBy::Medium => "technique",
            SortBy::Date => "creation_date",
        }
    }

    fn base_query(&self, params: &FetchParams) -> RequestSpec {
        let mut spec = RequestSpec::new(CLEVELAND_TAG, format!("{}/artworks/", self.base_url));

        if let Some(search) = &params.search {
            spec = spec.param("q", search);
        }
        if let Some(sort_by) = params.sort_by {
            spec = spec.param("sort", Self::sort_field(sort_by));
        }
        spec
    }
}

impl SourceAdapter for ClevelandAdapter {
    fn tag(&self) -> &'static str {
        CLEVELAND_TAG
    }

    fn name(&self) -> &'static str {
        CLEVELAND_SOURCE_NAME
    }

    fn build_queries(&self, params: &FetchParams) -> Vec<RequestSpec> {
        if params.classifications.is_empty() {
            return vec![self.base_query(params)];
        }

        params
            .classifications
            .iter()
            .map(|tag| self.base_query(params).param("type", tag))
            .collect()
    }

    fn page_request(&self, base: &RequestSpec, offset: u64, limit: usize) -> PagedRequest {
        PagedRequest {
            requests: vec![base.clone().param("skip", offset).param("limit", limit)],
            skip: 0,
            limit,
        }
    }

    fn sorts_descending(&self) -> bool {
        false
    }

    fn parse_response(&self, raw: &Value) -> Result<SourcePage> {
        let records = records_at(raw, "data")?;
        let total = raw
            .pointer("/info/total")
            .and_then(Value::as_u64)
            .unwrap_or(records.len() as u64);
        Ok(SourcePage { records, total })
    }

    fn normalize(&self, raw: &RawArtworkData) -> Option<NormalizedArtwork> {
        self.normalizer.normalize(raw)
    }

    fn detail_request(&self, native_id: &str) -> RequestSpec {
        RequestSpec::new(
            CLEVELAND_TAG,
            format!("{}/artworks/{}", self.base_url, native_id),
        )
    }

    fn unwrap_detail<'a>(&self, raw: &'a Value) -> &'a Value {
        match raw.get("data") {
            Some(data) if data.is_object() => data,
            _ => raw,
        }
    }
}
