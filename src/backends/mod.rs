//! Catalog adapter abstractions and concrete implementations.

pub mod anilist;
pub mod google_books;
pub mod kinopoisk;

use std::time::Duration;

use serde_json::Value;

use crate::config::SearchConfig;
use crate::error::ProviderError;
use crate::protocol::MediaKind;

/// Raw provider-shaped search record: named JSON values in provider order.
/// Field names are adapter-internal until normalization.
pub type ProviderRecord = Vec<(String, Value)>;

/// Interface implemented by concrete catalog adapters.
///
/// One provider call per query, no retries. Transport and payload failures
/// surface as `ProviderError`; an empty provider payload is an empty vector,
/// not an error.
pub trait CatalogAdapter {
    /// Stable provider name used in logs.
    fn name(&self) -> &'static str;
    /// Media kind carried by this adapter's records.
    fn kind(&self) -> MediaKind;
    /// Runs one provider search for `keyword`.
    fn query(&self, keyword: &str) -> Result<Vec<ProviderRecord>, ProviderError>;
}

/// Builds the bounded-timeout HTTP agent shared by all adapters.
pub(crate) fn http_agent(search: &SearchConfig) -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout_connect(Duration::from_secs(search.connect_timeout_secs))
        .timeout_read(Duration::from_secs(search.read_timeout_secs))
        .timeout_write(Duration::from_secs(search.read_timeout_secs))
        .build()
}

/// Pushes `value` under `name`, defaulting missing fields to JSON null so
/// the normalizer can strip them uniformly.
pub(crate) fn push_field(record: &mut ProviderRecord, name: &str, value: Option<Value>) {
    record.push((name.to_string(), value.unwrap_or(Value::Null)));
}
