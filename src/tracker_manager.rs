//! Tracking-list lifecycle orchestration.
//!
//! Single writer over the tracking store: validates drafts, materializes
//! entry+artwork pairs, and keys edit/remove flows by the immutable title.

use log::info;

use crate::db_manager::TrackingDb;
use crate::error::TrackerError;
use crate::protocol::{
    ArtworkRef, CandidateRecord, EntryDraft, StatusFilter, TrackingEntry,
};

pub struct TrackerManager {
    db: TrackingDb,
}

impl TrackerManager {
    pub fn new(db: TrackingDb) -> Self {
        Self { db }
    }

    fn materialize(draft: &EntryDraft) -> Result<(TrackingEntry, ArtworkRef), TrackerError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(TrackerError::Validation("a title is required".into()));
        }
        let media_type = draft
            .media_type
            .ok_or_else(|| TrackerError::Validation("a media type must be selected".into()))?;
        if draft.rating > 10 {
            return Err(TrackerError::Validation(
                "rating must be between 0 and 10".into(),
            ));
        }
        let entry = TrackingEntry {
            title: title.to_string(),
            status: draft.status,
            media_type,
            progress: draft.progress.clone(),
            rating: draft.rating,
            review: draft.review.clone(),
        };
        let artwork = ArtworkRef {
            title: title.to_string(),
            path_or_url: draft.artwork.clone(),
        };
        Ok((entry, artwork))
    }

    /// Validates and persists a new entry. A live entry with the same title
    /// is replaced.
    pub fn create(&mut self, draft: &EntryDraft) -> Result<(), TrackerError> {
        let (entry, artwork) = Self::materialize(draft)?;
        self.db.insert(&entry, &artwork)?;
        info!("tracked '{}' as {}", entry.title, entry.media_type.as_str());
        Ok(())
    }

    /// Loads the live entry for `title` as an editable draft.
    pub fn draft_for(&self, title: &str) -> Result<EntryDraft, TrackerError> {
        let (entry, artwork) = self
            .db
            .get(title)?
            .ok_or_else(|| TrackerError::NotFound(title.to_string()))?;
        Ok(EntryDraft {
            title: entry.title,
            media_type: Some(entry.media_type),
            status: entry.status,
            progress: entry.progress,
            rating: entry.rating,
            review: entry.review,
            artwork: artwork.path_or_url,
        })
    }

    /// Replaces the entry stored under `title`. The title is immutable:
    /// whatever the draft carries, the stored title keys the new row.
    pub fn edit(&mut self, title: &str, draft: &EntryDraft) -> Result<(), TrackerError> {
        if self.db.get(title)?.is_none() {
            return Err(TrackerError::NotFound(title.to_string()));
        }
        let mut keyed = draft.clone();
        keyed.title = title.to_string();
        let (entry, artwork) = Self::materialize(&keyed)?;
        self.db.replace(title, &entry, &artwork)?;
        info!("updated '{title}'");
        Ok(())
    }

    /// Removes an entry. Absent titles are a no-op.
    pub fn remove(&mut self, title: &str) -> Result<(), TrackerError> {
        self.db.delete(title)
    }

    /// Points an entry's artwork at a new path or URL.
    pub fn set_artwork(&mut self, title: &str, path_or_url: &str) -> Result<(), TrackerError> {
        self.db.set_artwork(title, path_or_url)
    }

    pub fn list(
        &self,
        filter: StatusFilter,
    ) -> Result<Vec<(TrackingEntry, ArtworkRef)>, TrackerError> {
        self.db.list(filter)
    }

    /// Converts a selected search candidate into a creation draft with
    /// title, media type and artwork pre-filled. The candidate is passed
    /// by value from the search view; nothing is shared ambiently.
    pub fn promote(candidate: &CandidateRecord) -> EntryDraft {
        EntryDraft {
            title: candidate.field("title").unwrap_or_default().to_string(),
            media_type: Some(candidate.kind.default_media_type()),
            artwork: candidate.artwork_url.clone().unwrap_or_default(),
            ..EntryDraft::default()
        }
    }
}
