use async_trait::async_trait;
use serde_json::Value;

use crate::error::{CuratorError, Result};
use crate::types::RequestSpec;

/// Outbound GET against a museum API
#[async_trait]
pub trait HttpClientPort: Send + Sync {
    async fn get(&self, request: &RequestSpec) -> Result<HttpGetResult>;
}

#[derive(Clone, Debug)]
pub struct HttpGetResult {
    pub status: u16,
    pub bytes: Vec<u8>,
}

impl HttpGetResult {
    pub fn json(status: u16, body: &Value) -> Self {
        Self {
            status,
            bytes: body.to_string().into_bytes(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON, turning a non-2xx status into `Upstream`.
    pub fn into_json(self, source: &str) -> Result<Value> {
        if !self.is_success() {
            return Err(CuratorError::Upstream {
                source_tag: source.to_string(),
                status: self.status,
            });
        }
        Ok(serde_json::from_slice(&self.bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_success_status_is_upstream_error() {
        let result = HttpGetResult::json(503, &json!({"error": "down"}));
        let err = result.into_json("harvard").unwrap_err();
        assert!(matches!(err, CuratorError::Upstream { status: 503, .. }));
    }

    #[test]
    fn test_invalid_body_is_json_error() {
        let result = HttpGetResult {
            status: 200,
            bytes: b"<html>".to_vec(),
        };
        assert!(matches!(result.into_json("cleveland"), Err(CuratorError::Json(_))));
    }
}
