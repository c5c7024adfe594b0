//! SQLite persistence for the tracking list.
//!
//! Two related tables, `entries` and `artwork`, joined by title. The store
//! is the sole owner of both; every mutation touching both tables runs in
//! one transaction so a half-written pair is never observable.

use std::path::PathBuf;

use log::info;
use rusqlite::{params, Connection, OptionalExtension, Transaction};

use crate::error::TrackerError;
use crate::protocol::{ArtworkRef, MediaType, Status, StatusFilter, TrackingEntry};

pub struct TrackingDb {
    conn: Connection,
}

impl TrackingDb {
    /// Opens (and creates if needed) the tracking database. Without an
    /// override the file lives under the platform data directory.
    pub fn new(override_path: Option<PathBuf>) -> Result<Self, TrackerError> {
        let db_path = override_path.unwrap_or_else(Self::default_path);
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).expect("Could not create data directory");
            }
        }
        info!("tracking database at {}", db_path.display());
        let conn = Connection::open(db_path)?;
        let db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    pub fn new_in_memory() -> Result<Self, TrackerError> {
        let db = Self {
            conn: Connection::open_in_memory()?,
        };
        db.initialize_schema()?;
        Ok(db)
    }

    fn default_path() -> PathBuf {
        dirs::data_dir()
            .expect("Could not find data directory")
            .join("medialog")
            .join("tracking.db")
    }

    fn initialize_schema(&self) -> Result<(), TrackerError> {
        self.conn.execute("PRAGMA foreign_keys = ON", [])?;
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS entries (
                title      TEXT PRIMARY KEY,
                status     TEXT NOT NULL,
                media_type TEXT NOT NULL,
                progress   TEXT NOT NULL,
                rating     INTEGER NOT NULL,
                review     TEXT NOT NULL
            )",
            [],
        )?;
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS artwork (
                title       TEXT PRIMARY KEY REFERENCES entries(title),
                path_or_url TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    fn delete_rows(tx: &Transaction<'_>, title: &str) -> Result<(), TrackerError> {
        tx.execute("DELETE FROM artwork WHERE title = ?1", params![title])?;
        tx.execute("DELETE FROM entries WHERE title = ?1", params![title])?;
        Ok(())
    }

    fn insert_rows(
        tx: &Transaction<'_>,
        entry: &TrackingEntry,
        artwork: &ArtworkRef,
    ) -> Result<(), TrackerError> {
        tx.execute(
            "INSERT INTO entries (title, status, media_type, progress, rating, review)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                entry.title,
                entry.status.as_str(),
                entry.media_type.as_str(),
                entry.progress,
                i64::from(entry.rating),
                entry.review
            ],
        )?;
        tx.execute(
            "INSERT INTO artwork (title, path_or_url) VALUES (?1, ?2)",
            params![entry.title, artwork.path_or_url],
        )?;
        Ok(())
    }

    /// Writes an entry and its artwork atomically. A live entry with the
    /// same title is replaced in the same transaction.
    pub fn insert(
        &mut self,
        entry: &TrackingEntry,
        artwork: &ArtworkRef,
    ) -> Result<(), TrackerError> {
        if entry.title.trim().is_empty() {
            return Err(TrackerError::Validation("title must not be empty".into()));
        }
        let tx = self.conn.transaction()?;
        Self::delete_rows(&tx, &entry.title)?;
        Self::insert_rows(&tx, entry, artwork)?;
        tx.commit()?;
        Ok(())
    }

    /// Removes both rows for `title`. No-op when the title is absent.
    pub fn delete(&mut self, title: &str) -> Result<(), TrackerError> {
        let tx = self.conn.transaction()?;
        Self::delete_rows(&tx, title)?;
        tx.commit()?;
        Ok(())
    }

    /// Delete-then-insert under one transaction, keyed on the existing
    /// title. A concurrent reader observes either the old or the new pair.
    pub fn replace(
        &mut self,
        title: &str,
        entry: &TrackingEntry,
        artwork: &ArtworkRef,
    ) -> Result<(), TrackerError> {
        let tx = self.conn.transaction()?;
        Self::delete_rows(&tx, title)?;
        Self::insert_rows(&tx, entry, artwork)?;
        tx.commit()?;
        Ok(())
    }

    /// Updates the artwork reference without touching the entry.
    pub fn set_artwork(&self, title: &str, path_or_url: &str) -> Result<(), TrackerError> {
        let changed = self.conn.execute(
            "UPDATE artwork SET path_or_url = ?1 WHERE title = ?2",
            params![path_or_url, title],
        )?;
        if changed == 0 {
            return Err(TrackerError::NotFound(title.to_string()));
        }
        Ok(())
    }

    /// Joined lookup of one tracked title.
    pub fn get(&self, title: &str) -> Result<Option<(TrackingEntry, ArtworkRef)>, TrackerError> {
        let row = self
            .conn
            .query_row(
                "SELECT e.title, e.status, e.media_type, e.progress, e.rating, e.review,
                        COALESCE(a.path_or_url, '')
                 FROM entries e LEFT JOIN artwork a ON a.title = e.title
                 WHERE e.title = ?1",
                params![title],
                Self::map_row,
            )
            .optional()?;
        Ok(row)
    }

    /// Joined entry+artwork pairs, most recently inserted first, optionally
    /// restricted to one status. Reverse-insertion order is an observable
    /// contract and rides the rowid of `entries`.
    pub fn list(
        &self,
        filter: StatusFilter,
    ) -> Result<Vec<(TrackingEntry, ArtworkRef)>, TrackerError> {
        const BASE_QUERY: &str = "SELECT e.title, e.status, e.media_type, e.progress, e.rating,
                    e.review, COALESCE(a.path_or_url, '')
             FROM entries e LEFT JOIN artwork a ON a.title = e.title";
        let mut rows = Vec::new();
        match filter {
            StatusFilter::All => {
                let mut stmt = self
                    .conn
                    .prepare(&format!("{BASE_QUERY} ORDER BY e.rowid DESC"))?;
                let mapped = stmt.query_map([], Self::map_row)?;
                for row in mapped {
                    rows.push(row?);
                }
            }
            StatusFilter::Only(status) => {
                let mut stmt = self.conn.prepare(&format!(
                    "{BASE_QUERY} WHERE e.status = ?1 ORDER BY e.rowid DESC"
                ))?;
                let mapped = stmt.query_map(params![status.as_str()], Self::map_row)?;
                for row in mapped {
                    rows.push(row?);
                }
            }
        }
        Ok(rows)
    }

    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<(TrackingEntry, ArtworkRef)> {
        let title: String = row.get(0)?;
        let status_text: String = row.get(1)?;
        let media_type_text: String = row.get(2)?;
        let rating: i64 = row.get(4)?;
        let entry = TrackingEntry {
            title: title.clone(),
            status: Status::parse(&status_text).unwrap_or_default(),
            media_type: MediaType::parse(&media_type_text).unwrap_or(MediaType::Movie),
            progress: row.get(3)?,
            rating: rating.clamp(0, 10) as u8,
            review: row.get(5)?,
        };
        let artwork = ArtworkRef {
            title,
            path_or_url: row.get(6)?,
        };
        Ok((entry, artwork))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str, status: Status) -> TrackingEntry {
        TrackingEntry {
            title: title.to_string(),
            status,
            media_type: MediaType::Anime,
            progress: "12 episodes".to_string(),
            rating: 7,
            review: String::new(),
        }
    }

    fn artwork(title: &str, path: &str) -> ArtworkRef {
        ArtworkRef {
            title: title.to_string(),
            path_or_url: path.to_string(),
        }
    }

    fn open() -> TrackingDb {
        TrackingDb::new_in_memory().expect("failed to create in-memory db")
    }

    #[test]
    fn insert_then_list_returns_the_joined_pair() {
        let mut db = open();
        db.insert(&entry("Monster", Status::Planned), &artwork("Monster", "m.png"))
            .expect("insert should succeed");
        let rows = db.list(StatusFilter::All).expect("list should succeed");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0.title, "Monster");
        assert_eq!(rows[0].1.path_or_url, "m.png");
    }

    #[test]
    fn empty_title_is_rejected_without_writing() {
        let mut db = open();
        let result = db.insert(&entry("  ", Status::Planned), &artwork("  ", ""));
        assert!(matches!(result, Err(TrackerError::Validation(_))));
        assert!(db.list(StatusFilter::All).expect("list").is_empty());
    }

    #[test]
    fn duplicate_title_insert_leaves_exactly_one_latest_entry() {
        let mut db = open();
        db.insert(&entry("Dune", Status::Planned), &artwork("Dune", "old.jpg"))
            .expect("first insert");
        let mut updated = entry("Dune", Status::Finished);
        updated.rating = 9;
        db.insert(&updated, &artwork("Dune", "new.jpg"))
            .expect("replacing insert");
        let rows = db.list(StatusFilter::All).expect("list");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0.status, Status::Finished);
        assert_eq!(rows[0].0.rating, 9);
        assert_eq!(rows[0].1.path_or_url, "new.jpg");
    }

    #[test]
    fn delete_removes_both_rows_and_is_idempotent() {
        let mut db = open();
        db.insert(&entry("Dune", Status::Planned), &artwork("Dune", "d.jpg"))
            .expect("insert");
        db.delete("Dune").expect("delete");
        assert!(db.list(StatusFilter::All).expect("list").is_empty());
        assert!(db.get("Dune").expect("get").is_none());
        // Absent title is a no-op, not an error.
        db.delete("Dune").expect("second delete");
    }

    #[test]
    fn list_filters_by_status_and_orders_reverse_insertion() {
        let mut db = open();
        db.insert(&entry("A", Status::Planned), &artwork("A", ""))
            .expect("insert A");
        db.insert(&entry("B", Status::Finished), &artwork("B", ""))
            .expect("insert B");
        let finished = db
            .list(StatusFilter::Only(Status::Finished))
            .expect("filtered list");
        assert_eq!(finished.len(), 1);
        assert_eq!(finished[0].0.title, "B");
        let all = db.list(StatusFilter::All).expect("list all");
        let titles: Vec<&str> = all.iter().map(|(e, _)| e.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "A"]);
    }

    #[test]
    fn replace_swaps_the_pair_under_the_old_title() {
        let mut db = open();
        db.insert(&entry("Dune", Status::Planned), &artwork("Dune", "d.jpg"))
            .expect("insert");
        let mut edited = entry("Dune", Status::InProgress);
        edited.progress = "part one".to_string();
        db.replace("Dune", &edited, &artwork("Dune", "d2.jpg"))
            .expect("replace");
        let rows = db.list(StatusFilter::All).expect("list");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0.status, Status::InProgress);
        assert_eq!(rows[0].0.progress, "part one");
        assert_eq!(rows[0].1.path_or_url, "d2.jpg");
    }

    #[test]
    fn set_artwork_updates_independently_of_the_entry() {
        let mut db = open();
        db.insert(&entry("Dune", Status::Planned), &artwork("Dune", ""))
            .expect("insert");
        db.set_artwork("Dune", "poster.jpg").expect("set artwork");
        let (unchanged, art) = db.get("Dune").expect("get").expect("entry exists");
        assert_eq!(unchanged.status, Status::Planned);
        assert_eq!(art.path_or_url, "poster.jpg");
    }

    #[test]
    fn set_artwork_on_missing_title_is_not_found() {
        let db = open();
        let result = db.set_artwork("Nothing", "x.jpg");
        assert!(matches!(result, Err(TrackerError::NotFound(_))));
    }
}
