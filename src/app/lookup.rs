use tracing::{info, instrument, warn};

use super::aggregator::Aggregator;
use crate::apis::adapter_for_tag;
use crate::constants::{ID_SEPARATOR, MAX_CLASSIFICATION_PAGES};
use crate::error::{CuratorError, Result};
use crate::types::NormalizedArtwork;

fn is_valid_native_id(native_id: &str) -> bool {
    !native_id.is_empty()
        && native_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

impl Aggregator {
    /// Re-fetch a single artwork by its `<tag>-<native id>` id.
    #[instrument(skip(self))]
    pub async fn lookup(&self, id: &str) -> Result<NormalizedArtwork> {
        let (tag, native_id) = id
            .split_once(ID_SEPARATOR)
            .ok_or_else(|| CuratorError::InvalidSource(id.to_string()))?;

        let adapter = adapter_for_tag(&self.adapters, tag)
            .ok_or_else(|| CuratorError::InvalidSource(tag.to_string()))?;

        if !is_valid_native_id(native_id) {
            return Err(CuratorError::NotFound(id.to_string()));
        }

        let spec = adapter.detail_request(native_id);
        let body = match self.http.get(&spec).await {
            Ok(response) => response.into_json(tag),
            Err(e) => Err(e),
        };
        let body = body.map_err(|e| {
            warn!(source = tag, error = %e, "Detail lookup failed");
            CuratorError::NotFound(id.to_string())
        })?;

        adapter
            .normalize(adapter.unwrap_detail(&body))
            .ok_or_else(|| CuratorError::Normalization(id.to_string()))
    }

    /// Every classification name offered by the first source that lists them,
    /// paging until the upstream page count is exhausted.
    #[instrument(skip(self))]
    pub async fn classifications(&self) -> Result<Vec<String>> {
        let adapter = self
            .adapters
            .iter()
            .find(|a| a.classification_request(1).is_some())
            .ok_or_else(|| {
                CuratorError::Config("no source offers a classification listing".into())
            })?;

        let mut names = Vec::new();
        let mut page = 1;
        loop {
            let spec = adapter.classification_request(page).ok_or_else(|| {
                CuratorError::MissingField(format!("classification page {page}"))
            })?;
            let body = self.http.get(&spec).await?.into_json(adapter.tag())?;
            let listing = adapter.parse_classifications(&body)?;
            names.extend(listing.names);

            if page >= listing.pages || page >= MAX_CLASSIFICATION_PAGES {
                break;
            }
            page += 1;
        }

        info!(source = adapter.tag(), count = names.len(), pages = page, "Loaded classifications");
        Ok(names)
    }
}
