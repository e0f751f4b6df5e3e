//! Persistence port for client-local state (bookmarks and app settings)

use crate::bookmarks::Bookmark;
use crate::error::QuranError;
use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, Row};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Where the reader session keeps its state.
///
/// `save_bookmarks` replaces the whole persisted list and `set_settings` writes a
/// group of keys; implementations must make both all-or-nothing.
pub trait LocalStore: Send + Sync {
    fn load_bookmarks(&self) -> Result<Vec<Bookmark>, QuranError>;
    fn save_bookmarks(&self, bookmarks: &[Bookmark]) -> Result<(), QuranError>;
    fn get_setting(&self, key: &str) -> Result<Option<String>, QuranError>;
    fn set_settings(&self, entries: &[(&str, &str)]) -> Result<(), QuranError>;

    fn set_setting(&self, key: &str, value: &str) -> Result<(), QuranError> {
        self.set_settings(&[(key, value)])
    }
}

/// `settings.db` backed store. Each call opens its own connection.
pub struct SqliteLocalStore {
    path: PathBuf,
}

impl SqliteLocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the settings database, creating its directory and tables on demand.
    fn connection(&self) -> Result<rusqlite::Connection, QuranError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                QuranError::Storage(format!("Failed to create data directory: {}", e))
            })?;
        }

        let conn = rusqlite::Connection::open(&self.path)
            .map_err(|e| QuranError::Database(format!("unable to open database file: {}", e)))?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS bookmarks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                key TEXT NOT NULL UNIQUE,
                no_surat INTEGER NOT NULL,
                no_ayat INTEGER NOT NULL,
                nm_surat TEXT NOT NULL,
                arab TEXT NOT NULL,
                tafsir TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS app_settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| QuranError::Database(e.to_string()))?;

        Ok(conn)
    }
}

/// A `bookmarks` row before its timestamp is parsed.
struct BookmarkRow {
    key: String,
    chapter_no: u32,
    verse_no: u32,
    chapter_name: String,
    arabic: String,
    translation: String,
    created_at: String,
}

impl BookmarkRow {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            key: row.get(0)?,
            chapter_no: row.get(1)?,
            verse_no: row.get(2)?,
            chapter_name: row.get(3)?,
            arabic: row.get(4)?,
            translation: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    fn into_bookmark(self) -> Result<Bookmark, chrono::ParseError> {
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)?.with_timezone(&Utc);
        Ok(Bookmark {
            key: self.key,
            chapter_no: self.chapter_no,
            verse_no: self.verse_no,
            chapter_name: self.chapter_name,
            arabic: self.arabic,
            translation: self.translation,
            created_at,
        })
    }
}

impl LocalStore for SqliteLocalStore {
    fn load_bookmarks(&self) -> Result<Vec<Bookmark>, QuranError> {
        let conn = self.connection()?;
        let mut stmt = conn
            .prepare(
                "SELECT key, no_surat, no_ayat, nm_surat, arab, tafsir, created_at
                 FROM bookmarks ORDER BY id",
            )
            .map_err(|e: rusqlite::Error| QuranError::Database(e.to_string()))?;

        let rows = stmt
            .query_map([], BookmarkRow::from_row)
            .map_err(|e: rusqlite::Error| QuranError::Database(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e: rusqlite::Error| QuranError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let key = row.key.clone();
                let raw = row.created_at.clone();
                match row.into_bookmark() {
                    Ok(bookmark) => Some(bookmark),
                    Err(e) => {
                        tracing::warn!("Skipping bookmark {} with bad timestamp {:?}: {}", key, raw, e);
                        None
                    }
                }
            })
            .collect())
    }

    fn save_bookmarks(&self, bookmarks: &[Bookmark]) -> Result<(), QuranError> {
        let mut conn = self.connection()?;
        let tx = conn
            .transaction()
            .map_err(|e| QuranError::Database(e.to_string()))?;

        tx.execute("DELETE FROM bookmarks", [])
            .map_err(|e| QuranError::Database(e.to_string()))?;

        for bookmark in bookmarks {
            tx.execute(
                "INSERT INTO bookmarks (key, no_surat, no_ayat, nm_surat, arab, tafsir, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![
                    bookmark.key,
                    bookmark.chapter_no,
                    bookmark.verse_no,
                    bookmark.chapter_name,
                    bookmark.arabic,
                    bookmark.translation,
                    bookmark.created_at.to_rfc3339(),
                ],
            )
            .map_err(|e| QuranError::Database(e.to_string()))?;
        }

        tx.commit().map_err(|e| QuranError::Database(e.to_string()))?;
        Ok(())
    }

    fn get_setting(&self, key: &str) -> Result<Option<String>, QuranError> {
        let conn = self.connection()?;
        conn.query_row(
            "SELECT value FROM app_settings WHERE key = ?1",
            [key],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| QuranError::Database(e.to_string()))
    }

    fn set_settings(&self, entries: &[(&str, &str)]) -> Result<(), QuranError> {
        let mut conn = self.connection()?;
        let tx = conn
            .transaction()
            .map_err(|e| QuranError::Database(e.to_string()))?;

        for (key, value) in entries {
            tx.execute(
                "INSERT OR REPLACE INTO app_settings (key, value) VALUES (?1, ?2)",
                rusqlite::params![key, value],
            )
            .map_err(|e| QuranError::Database(e.to_string()))?;
        }

        tx.commit().map_err(|e| QuranError::Database(e.to_string()))?;
        Ok(())
    }
}

/// In-process store for ephemeral sessions and tests.
#[derive(Default)]
pub struct MemoryLocalStore {
    bookmarks: Mutex<Vec<Bookmark>>,
    settings: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
    failing_setting: Mutex<Option<String>>,
}

impl MemoryLocalStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_writable(&self) -> Result<(), QuranError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(QuranError::Storage("local store is read-only".to_string()));
        }
        Ok(())
    }

    fn lock_err<T>(_: T) -> QuranError {
        QuranError::Other("Failed to acquire local store lock".to_string())
    }
}

#[cfg(test)]
impl MemoryLocalStore {
    /// Make every subsequent write fail.
    pub(crate) fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Reject any settings batch that touches `key`.
    pub(crate) fn fail_setting(&self, key: &str) {
        if let Ok(mut failing) = self.failing_setting.lock() {
            *failing = Some(key.to_string());
        }
    }
}

impl LocalStore for MemoryLocalStore {
    fn load_bookmarks(&self) -> Result<Vec<Bookmark>, QuranError> {
        Ok(self.bookmarks.lock().map_err(Self::lock_err)?.clone())
    }

    fn save_bookmarks(&self, bookmarks: &[Bookmark]) -> Result<(), QuranError> {
        self.check_writable()?;
        *self.bookmarks.lock().map_err(Self::lock_err)? = bookmarks.to_vec();
        Ok(())
    }

    fn get_setting(&self, key: &str) -> Result<Option<String>, QuranError> {
        Ok(self.settings.lock().map_err(Self::lock_err)?.get(key).cloned())
    }

    fn set_settings(&self, entries: &[(&str, &str)]) -> Result<(), QuranError> {
        self.check_writable()?;
        if let Some(failing) = self.failing_setting.lock().map_err(Self::lock_err)?.as_deref() {
            if entries.iter().any(|(key, _)| *key == failing) {
                return Err(QuranError::Storage(format!("cannot write setting {}", failing)));
            }
        }

        let mut settings = self.settings.lock().map_err(Self::lock_err)?;
        for (key, value) in entries {
            settings.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }
}
