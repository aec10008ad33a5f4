//! Source adapters: one per museum API.
//!
//! An adapter knows how to phrase the shared [`FetchParams`] as that API's
//! requests, how to unwrap its response envelopes, and which normalizer
//! applies. It never performs I/O itself; requests go through
//! [`crate::app::ports::HttpClientPort`].

pub mod cleveland;
pub mod harvard;

use serde_json::Value;
use std::sync::Arc;

use crate::config::SourcesConfig;
use crate::error::{CuratorError, Result};
use crate::types::{FetchParams, NormalizedArtwork, RawArtworkData, RequestSpec, SourcePage};

pub use cleveland::ClevelandAdapter;
pub use harvard::HarvardAdapter;

/// One page of a classification listing
#[derive(Debug, Clone, Default)]
pub struct ClassificationPage {
    pub names: Vec<String>,
    pub pages: u32,
}

/// Upstream requests covering one offset range of a stream. Responses are
/// concatenated in order, `skip` leading records dropped and at most `limit`
/// kept.
#[derive(Debug, Clone)]
pub struct PagedRequest {
    pub requests: Vec<RequestSpec>,
    pub skip: usize,
    pub limit: usize,
}

pub trait SourceAdapter: Send + Sync {
    /// Tag used as the artwork id prefix
    fn tag(&self) -> &'static str;

    /// Human-readable museum name
    fn name(&self) -> &'static str;

    /// Base requests for one list query, one per result stream, without any
    /// paging parameters. Sources without native multi-value filtering return
    /// one request per tag.
    fn build_queries(&self, params: &FetchParams) -> Vec<RequestSpec>;

    /// Address `limit` records starting at `offset` of the stream behind `base`
    fn page_request(&self, base: &RequestSpec, offset: u64, limit: usize) -> PagedRequest;

    /// Whether the native sort honours a descending direction
    fn sorts_descending(&self) -> bool {
        true
    }

    /// Unwrap a list response into raw records and the reported total
    fn parse_response(&self, raw: &Value) -> Result<SourcePage>;

    fn normalize(&self, raw: &RawArtworkData) -> Option<NormalizedArtwork>;

    /// Request for a single record by native id
    fn detail_request(&self, native_id: &str) -> RequestSpec;

    /// Strip any envelope around a detail response
    fn unwrap_detail<'a>(&self, raw: &'a Value) -> &'a Value {
        raw
    }

    /// Request for one page of the classification listing, if the source has one
    fn classification_request(&self, _page: u32) -> Option<RequestSpec> {
        None
    }

    fn parse_classifications(&self, _raw: &Value) -> Result<ClassificationPage> {
        Err(CuratorError::MissingField(format!(
            "{} has no classification listing",
            self.tag()
        )))
    }
}

/// Build the production adapter list in merge order: Cleveland, then Harvard.
pub fn default_adapters(config: &SourcesConfig) -> Vec<Arc<dyn SourceAdapter>> {
    vec![
        Arc::new(ClevelandAdapter::new(&config.cleveland_url)),
        Arc::new(HarvardAdapter::new(
            &config.harvard_url,
            config.harvard_api_key.clone(),
        )),
    ]
}

/// Find the adapter for a source tag
pub fn adapter_for_tag<'a>(
    adapters: &'a [Arc<dyn SourceAdapter>],
    tag: &str,
) -> Option<&'a Arc<dyn SourceAdapter>> {
    adapters.iter().find(|a| a.tag() == tag)
}

/// Read the record array at `key`
pub(crate) fn records_at(raw: &Value, key: &str) -> Result<Vec<RawArtworkData>> {
    raw.get(key)
        .and_then(Value::as_array)
        .cloned()
        .ok_or_else(|| CuratorError::MissingField(format!("{key} array not found")))
}

pub(crate) fn trim_base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
