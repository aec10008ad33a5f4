use crate::app::ports::{HttpClientPort, HttpGetResult};
use crate::error::Result;
use crate::types::RequestSpec;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// `HttpClientPort` backed by a single shared `reqwest::Client`.
pub struct ReqwestHttp {
    client: reqwest::Client,
}

impl ReqwestHttp {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("exhibition-curator/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClientPort for ReqwestHttp {
    async fn get(&self, request: &RequestSpec) -> Result<HttpGetResult> {
        // Query values may carry an API key, so only the URL is logged
        debug!(source = request.source, url = %request.url, "GET");
        let resp = self
            .client
            .get(&request.url)
            .query(&request.query)
            .send()
            .await?;
        let status = resp.status().as_u16();
        let bytes = resp.bytes().await?.to_vec();
        Ok(HttpGetResult { status, bytes })
    }
}
