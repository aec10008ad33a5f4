//! Metrics for upstream requests and normalization, recorded through the
//! `metrics` facade and exported in Prometheus format when `serve` installs
//! the exporter.

use std::fmt;
use std::net::SocketAddr;
use tracing::{info, warn};

/// Every metric name used in the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    SourcesRequestsSuccess,
    SourcesRequestsError,
    SourcesRequestDuration,
    SourcesRecordsReturned,
    NormalizeRecordsProcessed,
    NormalizeRecordsDropped,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::SourcesRequestsSuccess => "curator_sources_requests_success_total",
            MetricName::SourcesRequestsError => "curator_sources_requests_error_total",
            MetricName::SourcesRequestDuration => "curator_sources_request_duration_seconds",
            MetricName::SourcesRecordsReturned => "curator_sources_records_returned_total",
            MetricName::NormalizeRecordsProcessed => "curator_normalize_records_processed_total",
            MetricName::NormalizeRecordsDropped => "curator_normalize_records_dropped_total",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Install the Prometheus exporter on `0.0.0.0:<port>`. Failure is logged, not fatal.
pub fn init_metrics(port: u16) {
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    let builder = metrics_exporter_prometheus::PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => info!(%addr, "Prometheus exporter listening"),
        Err(e) => warn!(%addr, error = %e, "Prometheus exporter install failed"),
    }
}

pub mod sources {
    use super::MetricName;

    pub fn request_success(source: &str) {
        ::metrics::counter!(MetricName::SourcesRequestsSuccess.as_str(), "source" => source.to_string())
            .increment(1);
    }

    pub fn request_error(source: &str) {
        ::metrics::counter!(MetricName::SourcesRequestsError.as_str(), "source" => source.to_string())
            .increment(1);
    }

    pub fn request_duration(source: &str, secs: f64) {
        ::metrics::histogram!(MetricName::SourcesRequestDuration.as_str(), "source" => source.to_string())
            .record(secs);
    }

    pub fn records_returned(source: &str, count: usize) {
        ::metrics::counter!(MetricName::SourcesRecordsReturned.as_str(), "source" => source.to_string())
            .increment(count as u64);
    }
}

pub mod normalize {
    use super::MetricName;

    pub fn record_normalized(source: &str) {
        ::metrics::counter!(MetricName::NormalizeRecordsProcessed.as_str(), "source" => source.to_string())
            .increment(1);
    }

    pub fn record_dropped(source: &str) {
        ::metrics::counter!(MetricName::NormalizeRecordsDropped.as_str(), "source" => source.to_string())
            .increment(1);
    }
}
