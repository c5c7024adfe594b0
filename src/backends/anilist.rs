//! AniList anime/manga catalog adapter.

use serde_json::{json, Value};

use crate::backends::{http_agent, push_field, CatalogAdapter, ProviderRecord};
use crate::config::SearchConfig;
use crate::error::ProviderError;
use crate::protocol::MediaKind;

const GRAPHQL_URL: &str = "https://graphql.anilist.co";
const PAGE_SIZE: u32 = 10;

const SEARCH_QUERY: &str = "\
query ($search: String, $type: MediaType, $perPage: Int) {
  Page(perPage: $perPage) {
    media(search: $search, type: $type) {
      title { english romaji }
      averageScore
      startDate { year month day }
      genres
      description(asHtml: false)
      coverImage { large }
    }
  }
}";

/// Anime or manga search over the AniList GraphQL endpoint. One instance
/// per target kind; both share the same query document.
pub struct AnilistAdapter {
    http_client: ureq::Agent,
    target: MediaKind,
}

impl AnilistAdapter {
    pub fn anime(search: &SearchConfig) -> Self {
        Self {
            http_client: http_agent(search),
            target: MediaKind::Anime,
        }
    }

    pub fn manga(search: &SearchConfig) -> Self {
        Self {
            http_client: http_agent(search),
            target: MediaKind::Manga,
        }
    }

    fn graphql_media_type(&self) -> &'static str {
        match self.target {
            MediaKind::Manga => "MANGA",
            _ => "ANIME",
        }
    }

    fn start_date(media: &Value) -> Option<Value> {
        let date = media.get("startDate")?;
        let year = date.get("year").and_then(Value::as_i64)?;
        let text = match (
            date.get("month").and_then(Value::as_i64),
            date.get("day").and_then(Value::as_i64),
        ) {
            (Some(month), Some(day)) => format!("{year}-{month:02}-{day:02}"),
            (Some(month), None) => format!("{year}-{month:02}"),
            _ => year.to_string(),
        };
        Some(Value::String(text))
    }

    fn map_media(media: &Value) -> ProviderRecord {
        let mut record = ProviderRecord::new();
        let title = media
            .get("title")
            .and_then(|title| {
                title
                    .get("english")
                    .filter(|value| !value.is_null())
                    .or_else(|| title.get("romaji"))
            })
            .cloned();
        push_field(&mut record, "title", title);
        push_field(&mut record, "score", media.get("averageScore").cloned());
        push_field(&mut record, "start date", Self::start_date(media));
        push_field(&mut record, "genres", media.get("genres").cloned());
        push_field(&mut record, "description", media.get("description").cloned());
        push_field(
            &mut record,
            "cover image",
            media
                .get("coverImage")
                .and_then(|cover| cover.get("large"))
                .cloned(),
        );
        record
    }
}

impl CatalogAdapter for AnilistAdapter {
    fn name(&self) -> &'static str {
        match self.target {
            MediaKind::Manga => "anilist-manga",
            _ => "anilist-anime",
        }
    }

    fn kind(&self) -> MediaKind {
        self.target
    }

    fn query(&self, keyword: &str) -> Result<Vec<ProviderRecord>, ProviderError> {
        let provider = self.name();
        let body = json!({
            "query": SEARCH_QUERY,
            "variables": {
                "search": keyword,
                "type": self.graphql_media_type(),
                "perPage": PAGE_SIZE,
            },
        });
        let response = self
            .http_client
            .post(GRAPHQL_URL)
            .send_json(body)
            .map_err(|err| ProviderError::new(provider, format!("request failed: {err}")))?;
        let payload: Value = response
            .into_json()
            .map_err(|err| ProviderError::new(provider, format!("response parse failed: {err}")))?;
        if let Some(errors) = payload.get("errors").and_then(Value::as_array) {
            if let Some(message) = errors
                .first()
                .and_then(|error| error.get("message"))
                .and_then(Value::as_str)
            {
                return Err(ProviderError::new(provider, message));
            }
        }
        let media = payload
            .pointer("/data/Page/media")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        Ok(media.iter().map(Self::map_media).collect())
    }
}
