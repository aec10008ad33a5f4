pub mod apis;
pub mod app;
pub mod config;
pub mod constants;
pub mod error;
pub mod infra;
pub mod logging;
pub mod metrics;
pub mod normalize;
pub mod server;
pub mod storage;
pub mod types;

use std::sync::Arc;

use crate::app::Aggregator;
use crate::config::Config;
use crate::error::Result;
use crate::infra::http_client::ReqwestHttp;

/// Wire the production adapters and HTTP client from configuration.
pub fn build_aggregator(config: &Config) -> Result<Aggregator> {
    let http = ReqwestHttp::new(config.sources.timeout())?;
    Ok(Aggregator::new(
        apis::default_adapters(&config.sources),
        Arc::new(http),
        config.server.page_size,
        config.sources.max_source_window,
    ))
}
