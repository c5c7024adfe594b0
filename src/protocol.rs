//! Domain types shared by the search pipeline and the tracking list.
//!
//! This module defines the candidate/entry data model exchanged between
//! catalog adapters, the normalizer, the aggregator, and the store.

/// Media-category discriminant attached to every search candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Movie,
    Anime,
    Manga,
    Book,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Anime => "anime",
            MediaKind::Manga => "manga",
            MediaKind::Book => "book",
        }
    }

    /// Name of the field holding the artwork reference in this kind's
    /// provider records.
    pub fn artwork_field(self) -> &'static str {
        match self {
            MediaKind::Movie => "link to poster",
            MediaKind::Anime | MediaKind::Manga => "cover image",
            MediaKind::Book => "thumbnail",
        }
    }

    /// Taxonomy slot pre-selected when a candidate of this kind is promoted
    /// into the tracking list.
    pub fn default_media_type(self) -> MediaType {
        match self {
            MediaKind::Movie => MediaType::Movie,
            MediaKind::Anime => MediaType::Anime,
            MediaKind::Manga => MediaType::Manga,
            MediaKind::Book => MediaType::Book,
        }
    }
}

/// Fixed media taxonomy for persisted entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Movie,
    Series,
    Cartoon,
    Anime,
    Manga,
    Comic,
    Manhwa,
    Manhua,
    Book,
}

impl MediaType {
    pub const ALL: [MediaType; 9] = [
        MediaType::Movie,
        MediaType::Series,
        MediaType::Cartoon,
        MediaType::Anime,
        MediaType::Manga,
        MediaType::Comic,
        MediaType::Manhwa,
        MediaType::Manhua,
        MediaType::Book,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Series => "series",
            MediaType::Cartoon => "cartoon",
            MediaType::Anime => "anime",
            MediaType::Manga => "manga",
            MediaType::Comic => "comic",
            MediaType::Manhwa => "manhwa",
            MediaType::Manhua => "manhua",
            MediaType::Book => "book",
        }
    }

    pub fn parse(value: &str) -> Option<MediaType> {
        MediaType::ALL
            .into_iter()
            .find(|media_type| media_type.as_str() == value)
    }

    /// Noun used when prompting for a progress description of this type.
    pub fn progress_noun(self) -> &'static str {
        match self {
            MediaType::Movie | MediaType::Series | MediaType::Cartoon | MediaType::Anime => {
                "episodes"
            }
            MediaType::Manga | MediaType::Comic | MediaType::Manhwa | MediaType::Manhua => {
                "chapters"
            }
            MediaType::Book => "pages",
        }
    }
}

/// Tracking status of a persisted entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Planned,
    InProgress,
    Finished,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Planned => "planned",
            Status::InProgress => "in_progress",
            Status::Finished => "finished",
        }
    }

    /// Parses a stored or user-supplied status. Accepts the legacy
    /// `progress` spelling for in-progress entries.
    pub fn parse(value: &str) -> Option<Status> {
        match value {
            "planned" => Some(Status::Planned),
            "in_progress" | "progress" => Some(Status::InProgress),
            "finished" => Some(Status::Finished),
            _ => None,
        }
    }
}

/// Status restriction applied to list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Only(Status),
}

impl StatusFilter {
    pub fn parse(value: &str) -> Option<StatusFilter> {
        if value == "all" {
            return Some(StatusFilter::All);
        }
        Status::parse(value).map(StatusFilter::Only)
    }
}

/// Normalized search result, alive for one search response cycle.
///
/// Display fields keep provider order and never hold empty values; the
/// kind-designated artwork field is split out of the display set.
#[derive(Debug, Clone)]
pub struct CandidateRecord {
    pub kind: MediaKind,
    pub display_fields: Vec<(String, String)>,
    pub artwork_url: Option<String>,
}

impl CandidateRecord {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.display_fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Persisted user-curated tracking record. `title` is the sole natural key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingEntry {
    pub title: String,
    pub status: Status,
    pub media_type: MediaType,
    /// Free-form count description, e.g. "12 episodes".
    pub progress: String,
    /// 0 through 10.
    pub rating: u8,
    pub review: String,
}

/// Artwork reference stored 1:1 with a tracking entry by title.
/// An empty `path_or_url` means "use the default placeholder".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtworkRef {
    pub title: String,
    pub path_or_url: String,
}

/// Editable form state for the create/edit flows. Passed explicitly between
/// the search view and the creation flow; there is no ambient shared state.
#[derive(Debug, Clone, Default)]
pub struct EntryDraft {
    pub title: String,
    pub media_type: Option<MediaType>,
    pub status: Status,
    pub progress: String,
    pub rating: u8,
    pub review: String,
    pub artwork: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_type_round_trips_through_storage_text() {
        for media_type in MediaType::ALL {
            assert_eq!(MediaType::parse(media_type.as_str()), Some(media_type));
        }
        assert_eq!(MediaType::parse("vinyl"), None);
    }

    #[test]
    fn status_parser_accepts_legacy_progress_spelling() {
        assert_eq!(Status::parse("progress"), Some(Status::InProgress));
        assert_eq!(Status::parse("in_progress"), Some(Status::InProgress));
        assert_eq!(Status::parse("done"), None);
    }

    #[test]
    fn status_filter_parses_all_and_single_status() {
        assert_eq!(StatusFilter::parse("all"), Some(StatusFilter::All));
        assert_eq!(
            StatusFilter::parse("finished"),
            Some(StatusFilter::Only(Status::Finished))
        );
        assert_eq!(StatusFilter::parse("abandoned"), None);
    }

    #[test]
    fn progress_noun_follows_media_family() {
        assert_eq!(MediaType::Series.progress_noun(), "episodes");
        assert_eq!(MediaType::Manhwa.progress_noun(), "chapters");
        assert_eq!(MediaType::Book.progress_noun(), "pages");
    }
}
