//! Google Books catalog adapter.

use serde_json::Value;

use crate::backends::{http_agent, push_field, CatalogAdapter, ProviderRecord};
use crate::config::SearchConfig;
use crate::error::ProviderError;
use crate::protocol::MediaKind;

const PROVIDER: &str = "google-books";
const VOLUMES_URL: &str = "https://www.googleapis.com/books/v1/volumes";

/// Book search backed by the Google Books volumes API. Queries run
/// anonymously when no API key is configured.
pub struct GoogleBooksAdapter {
    http_client: ureq::Agent,
    api_key: String,
}

impl GoogleBooksAdapter {
    pub fn new(api_key: impl Into<String>, search: &SearchConfig) -> Self {
        Self {
            http_client: http_agent(search),
            api_key: api_key.into(),
        }
    }

    fn map_volume(volume: &Value) -> ProviderRecord {
        let info = volume.get("volumeInfo").cloned().unwrap_or(Value::Null);
        let mut record = ProviderRecord::new();
        push_field(&mut record, "title", info.get("title").cloned());
        push_field(&mut record, "authors", info.get("authors").cloned());
        push_field(
            &mut record,
            "published date",
            info.get("publishedDate").cloned(),
        );
        push_field(&mut record, "language", info.get("language").cloned());
        push_field(&mut record, "description", info.get("description").cloned());
        push_field(
            &mut record,
            "link to book",
            info.get("canonicalVolumeLink").cloned(),
        );
        push_field(
            &mut record,
            "thumbnail",
            info.get("imageLinks")
                .and_then(|links| links.get("thumbnail"))
                .cloned(),
        );
        record
    }
}

impl CatalogAdapter for GoogleBooksAdapter {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn kind(&self) -> MediaKind {
        MediaKind::Book
    }

    fn query(&self, keyword: &str) -> Result<Vec<ProviderRecord>, ProviderError> {
        let mut url = format!("{VOLUMES_URL}?q={}", urlencoding::encode(keyword));
        if !self.api_key.is_empty() {
            url.push_str("&key=");
            url.push_str(&urlencoding::encode(&self.api_key));
        }
        let response = self
            .http_client
            .get(&url)
            .call()
            .map_err(|err| ProviderError::new(PROVIDER, format!("request failed: {err}")))?;
        let payload: Value = response
            .into_json()
            .map_err(|err| ProviderError::new(PROVIDER, format!("response parse failed: {err}")))?;
        let volumes = payload
            .get("items")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        Ok(volumes.iter().map(Self::map_volume).collect())
    }
}
