// Copyright 2025 Sandlog (https://github.com/sandlog/sandlog)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Pass-note persistence over sled.
//!
//! One tree, one JSON-encoded document per note. Keys are the
//! organization/location/robot/pass tuple joined with an ASCII unit
//! separator, so all notes for a robot form one contiguous prefix range.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;

use sandlog_core::{PassNote, PassNoteKey};

const NOTES_TREE: &str = "pass_notes";

// Tuple fields must not contain this byte; `PassNoteKey::is_complete`
// callers validate ids upstream.
const KEY_SEP: char = '\u{1f}';

/// Storage-layer errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage failure: {0}")]
    Sled(#[from] sled::Error),

    #[error("stored document is not a valid note: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Result type for note-store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Embedded document store for pass notes.
pub struct NoteStore {
    db: sled::Db,
    notes: sled::Tree,
}

impl NoteStore {
    /// Open (or create) a note store at `path`.
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Self::from_db(sled::open(path)?)
    }

    /// An in-memory store that disappears on drop. Test use.
    pub fn temporary() -> Result<Self> {
        Self::from_db(sled::Config::new().temporary(true).open()?)
    }

    fn from_db(db: sled::Db) -> Result<Self> {
        let notes = db.open_tree(NOTES_TREE)?;
        Ok(Self { db, notes })
    }

    /// Insert or replace the note for a tuple. The new document replaces
    /// any previous one wholesale.
    pub fn upsert(&self, note: &PassNote) -> Result<()> {
        let key = encode_key(&note.key());
        let value = serde_json::to_vec(note)?;
        self.notes.insert(key.as_bytes(), value)?;
        self.notes.flush()?;
        Ok(())
    }

    /// Fetch a single note.
    pub fn get(&self, key: &PassNoteKey) -> Result<Option<PassNote>> {
        match self.notes.get(encode_key(key).as_bytes())? {
            Some(raw) => Ok(Some(serde_json::from_slice(&raw)?)),
            None => Ok(None),
        }
    }

    /// All notes for one robot, in pass-id key order.
    pub fn list_for_robot(
        &self,
        organization_id: &str,
        location_id: &str,
        robot_id: &str,
    ) -> Result<Vec<PassNote>> {
        let prefix = format!("{organization_id}{KEY_SEP}{location_id}{KEY_SEP}{robot_id}{KEY_SEP}");

        let mut notes = Vec::new();
        for item in self.notes.scan_prefix(prefix.as_bytes()) {
            let (_, raw) = item?;
            notes.push(serde_json::from_slice(&raw)?);
        }
        Ok(notes)
    }

    /// Remove the note for a tuple. Returns whether anything was stored.
    pub fn delete(&self, key: &PassNoteKey) -> Result<bool> {
        let removed = self.notes.remove(encode_key(key).as_bytes())?.is_some();
        self.notes.flush()?;
        Ok(removed)
    }

    /// Remove every note last updated strictly before `cutoff`. Returns the
    /// number of notes removed.
    pub fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let mut stale = Vec::new();
        for item in self.notes.iter() {
            let (key, raw) = item?;
            let note: PassNote = serde_json::from_slice(&raw)?;
            if note.updated_at < cutoff {
                stale.push(key);
            }
        }

        for key in &stale {
            self.notes.remove(key)?;
        }
        self.notes.flush()?;

        debug!(removed = stale.len(), %cutoff, "pruned stale notes");
        Ok(stale.len())
    }

    /// Flush pending writes to disk.
    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }
}

fn encode_key(key: &PassNoteKey) -> String {
    format!(
        "{}{KEY_SEP}{}{KEY_SEP}{}{KEY_SEP}{}",
        key.organization_id, key.location_id, key.robot_id, key.pass_id
    )
}
