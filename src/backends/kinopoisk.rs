//! Kinopoisk movie catalog adapter.

use serde_json::Value;

use crate::backends::{http_agent, push_field, CatalogAdapter, ProviderRecord};
use crate::config::SearchConfig;
use crate::error::ProviderError;
use crate::protocol::MediaKind;

const PROVIDER: &str = "kinopoisk";
const SEARCH_URL: &str = "https://kinopoiskapiunofficial.tech/api/v2.1/films/search-by-keyword";

/// Movie search backed by the unofficial Kinopoisk API.
pub struct KinopoiskAdapter {
    http_client: ureq::Agent,
    api_key: String,
}

impl KinopoiskAdapter {
    pub fn new(api_key: impl Into<String>, search: &SearchConfig) -> Self {
        Self {
            http_client: http_agent(search),
            api_key: api_key.into(),
        }
    }

    fn name_list(film: &Value, field: &str, inner: &str) -> Option<Value> {
        let items = film.get(field)?.as_array()?;
        let names: Vec<Value> = items
            .iter()
            .filter_map(|item| item.get(inner).and_then(Value::as_str))
            .map(|name| Value::String(name.to_string()))
            .collect();
        Some(Value::Array(names))
    }

    fn map_film(film: &Value) -> ProviderRecord {
        let mut record = ProviderRecord::new();
        let title = film
            .get("nameRu")
            .filter(|value| !value.is_null())
            .or_else(|| film.get("nameEn"))
            .cloned();
        push_field(&mut record, "title", title);
        push_field(&mut record, "rating", film.get("rating").cloned());
        push_field(&mut record, "release year", film.get("year").cloned());
        push_field(
            &mut record,
            "countries",
            Self::name_list(film, "countries", "country"),
        );
        push_field(
            &mut record,
            "genres",
            Self::name_list(film, "genres", "genre"),
        );
        let film_page = film
            .get("filmId")
            .and_then(Value::as_i64)
            .map(|id| Value::String(format!("https://www.kinopoisk.ru/film/{id}/")));
        push_field(&mut record, "link to movie", film_page);
        push_field(&mut record, "link to poster", film.get("posterUrl").cloned());
        record
    }
}

impl CatalogAdapter for KinopoiskAdapter {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn kind(&self) -> MediaKind {
        MediaKind::Movie
    }

    fn query(&self, keyword: &str) -> Result<Vec<ProviderRecord>, ProviderError> {
        let url = format!("{SEARCH_URL}?keyword={}", urlencoding::encode(keyword));
        let response = self
            .http_client
            .get(&url)
            .set("X-API-KEY", &self.api_key)
            .call()
            .map_err(|err| ProviderError::new(PROVIDER, format!("request failed: {err}")))?;
        let payload: Value = response
            .into_json()
            .map_err(|err| ProviderError::new(PROVIDER, format!("response parse failed: {err}")))?;
        let films = payload
            .get("films")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        Ok(films.iter().map(Self::map_film).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn film_mapping_extracts_provider_fields() {
        let film = json!({
            "filmId": 535341,
            "nameRu": "1+1",
            "nameEn": "Intouchables",
            "year": "2011",
            "countries": [{"country": "Франция"}],
            "genres": [{"genre": "драма"}, {"genre": "комедия"}],
            "rating": "8.8",
            "posterUrl": "https://example.org/poster.jpg",
        });
        let record = KinopoiskAdapter::map_film(&film);
        let field = |name: &str| {
            record
                .iter()
                .find(|(field, _)| field == name)
                .map(|(_, value)| value.clone())
        };
        assert_eq!(field("title"), Some(json!("1+1")));
        assert_eq!(field("rating"), Some(json!("8.8")));
        assert_eq!(
            field("countries"),
            Some(json!(["Франция"]))
        );
        assert_eq!(field("genres"), Some(json!(["драма", "комедия"])));
        assert_eq!(
            field("link to movie"),
            Some(json!("https://www.kinopoisk.ru/film/535341/"))
        );
        assert_eq!(
            field("link to poster"),
            Some(json!("https://example.org/poster.jpg"))
        );
    }

    #[test]
    fn film_mapping_falls_back_to_english_title() {
        let film = json!({"nameRu": null, "nameEn": "Dune"});
        let record = KinopoiskAdapter::map_film(&film);
        let title = record
            .iter()
            .find(|(field, _)| field == "title")
            .map(|(_, value)| value.clone());
        assert_eq!(title, Some(json!("Dune")));
    }
}
