#![allow(dead_code)]

use async_trait::async_trait;
use exhibition_curator::apis::{ClevelandAdapter, HarvardAdapter, SourceAdapter};
use exhibition_curator::app::ports::{HttpClientPort, HttpGetResult};
use exhibition_curator::app::Aggregator;
use exhibition_curator::error::{CuratorError, Result};
use exhibition_curator::types::RequestSpec;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

pub const CLEVELAND_URL: &str = "http://cleveland.test/api";
pub const HARVARD_URL: &str = "http://harvard.test";

type Handler = dyn Fn(&RequestSpec) -> Result<HttpGetResult> + Send + Sync;

/// In-memory `HttpClientPort` answering through a closure and recording calls
pub struct FakeHttp {
    handler: Box<Handler>,
    calls: Mutex<Vec<RequestSpec>>,
}

impl FakeHttp {
    pub fn new<F>(handler: F) -> Arc<Self>
    where
        F: Fn(&RequestSpec) -> Result<HttpGetResult> + Send + Sync + 'static,
    {
        Arc::new(Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<RequestSpec> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, source: &str) -> Vec<RequestSpec> {
        self.calls()
            .into_iter()
            .filter(|c| c.source == source)
            .collect()
    }
}

#[async_trait]
impl HttpClientPort for FakeHttp {
    async fn get(&self, request: &RequestSpec) -> Result<HttpGetResult> {
        self.calls.lock().unwrap().push(request.clone());
        (self.handler)(request)
    }
}

pub fn ok(body: Value) -> Result<HttpGetResult> {
    Ok(HttpGetResult::json(200, &body))
}

pub fn status(code: u16) -> Result<HttpGetResult> {
    Ok(HttpGetResult::json(code, &json!({"error": "upstream"})))
}

pub fn transport_error(source: &str) -> Result<HttpGetResult> {
    Err(CuratorError::Upstream {
        source_tag: source.to_string(),
        status: 0,
    })
}

pub fn cleveland_list(records: Vec<Value>, total: u64) -> Value {
    json!({"info": {"total": total}, "data": records})
}

pub fn harvard_list(records: Vec<Value>, total: u64) -> Value {
    json!({"info": {"totalrecords": total, "pages": 1}, "records": records})
}

pub fn cleveland_record(id: u64, date: &str, technique: &str) -> Value {
    json!({
        "id": id,
        "title": format!("Cleveland {id}"),
        "creation_date": date,
        "creators": [{"description": "Unknown Maker"}],
        "technique": technique,
        "type": "Vessel",
        "url": format!("https://clevelandart.org/art/{id}")
    })
}

pub fn harvard_record(id: u64, dated: &str, medium: &str) -> Value {
    json!({
        "id": id,
        "title": format!("Harvard {id}"),
        "dated": dated,
        "people": [{"name": "Anonymous"}],
        "medium": medium,
        "classification": "Vessels",
        "url": format!("https://harvardartmuseums.org/collections/object/{id}")
    })
}

fn query_u64(req: &RequestSpec, key: &str) -> u64 {
    req.query_value(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

/// Handler serving `cleveland_total` and `harvard_total` records, honouring
/// Cleveland `skip`/`limit` and Harvard `page`/`size`/`sortorder`. Record `n`
/// in ascending order has id `n + 1` and year `1000 + n`.
pub fn paged_sources(
    cleveland_total: u64,
    harvard_total: u64,
) -> impl Fn(&RequestSpec) -> Result<HttpGetResult> + Send + Sync + 'static {
    move |req| match req.source {
        "cleveland" => {
            let skip = query_u64(req, "skip");
            let end = (skip + query_u64(req, "limit")).min(cleveland_total);
            let records = (skip..end)
                .map(|n| cleveland_record(n + 1, &(1000 + n).to_string(), "oil"))
                .collect();
            ok(cleveland_list(records, cleveland_total))
        }
        _ => {
            let size = query_u64(req, "size");
            let start = query_u64(req, "page").saturating_sub(1) * size;
            let end = (start + size).min(harvard_total);
            let desc = req.query_value("sortorder") == Some("desc");
            let records = (start..end)
                .map(|n| if desc { harvard_total - 1 - n } else { n })
                .map(|n| harvard_record(n + 1, &(1000 + n).to_string(), "ink"))
                .collect();
            ok(harvard_list(records, harvard_total))
        }
    }
}

pub fn adapters() -> Vec<Arc<dyn SourceAdapter>> {
    vec![
        Arc::new(ClevelandAdapter::new(CLEVELAND_URL)),
        Arc::new(HarvardAdapter::new(HARVARD_URL, Some("test-key".into()))),
    ]
}

pub fn aggregator(http: Arc<FakeHttp>) -> Aggregator {
    Aggregator::new(adapters(), http, 20, 100)
}
