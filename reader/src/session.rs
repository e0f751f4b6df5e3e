//! Reader session: the explicit application state handed to rendering code

use crate::bookmarks::{Bookmark, BookmarkLedger, BookmarkSnapshot, ToggleOutcome};
use crate::error::QuranError;
use crate::local_store::{LocalStore, SqliteLocalStore};
use crate::models::Verse;
use crate::paths::get_settings_db_path;
use crate::preferences::{FontSize, Preferences};
use std::sync::Arc;

/// Bookmarks and display preferences for one local user. All writes go through the
/// injected [`LocalStore`]; in-memory state changes only after a write succeeds.
pub struct ReaderSession {
    store: Arc<dyn LocalStore>,
    bookmarks: BookmarkLedger,
    preferences: Preferences,
}

impl ReaderSession {
    pub fn open(store: Arc<dyn LocalStore>) -> Result<Self, QuranError> {
        let bookmarks = BookmarkLedger::load(store.clone())?;
        let preferences = Preferences::load(store.as_ref())?;
        tracing::info!(
            "Reader session opened: {} bookmarks, dark_mode={}, font_size={}",
            bookmarks.len(),
            preferences.dark_mode,
            preferences.font_size.level()
        );
        Ok(Self { store, bookmarks, preferences })
    }

    /// Session persisted in `settings.db` under the default data directory.
    pub fn open_default() -> Result<Self, QuranError> {
        let path = get_settings_db_path();
        tracing::debug!("Using settings database {:?}", path);
        Self::open(Arc::new(SqliteLocalStore::new(path)))
    }

    pub fn preferences(&self) -> Preferences {
        self.preferences
    }

    pub fn bookmarks(&self) -> &BookmarkLedger {
        &self.bookmarks
    }

    pub fn list_bookmarks(&self) -> Vec<Bookmark> {
        self.bookmarks.list()
    }

    pub fn is_bookmarked(&self, verse: &Verse) -> bool {
        self.bookmarks.contains(verse.chapter_no, verse.verse_no)
    }

    /// Toggle the bookmark for `verse`, capturing its display fields when added.
    pub fn toggle_bookmark(
        &mut self,
        verse: &Verse,
        chapter_name: &str,
    ) -> Result<ToggleOutcome, QuranError> {
        let snapshot = BookmarkSnapshot {
            chapter_name: chapter_name.to_string(),
            arabic: verse.arabic.clone(),
            translation: verse.translation.clone(),
        };
        self.bookmarks.toggle(verse.chapter_no, verse.verse_no, snapshot)
    }

    pub fn remove_bookmark(&mut self, key: &str) -> Result<bool, QuranError> {
        self.bookmarks.remove(key)
    }

    pub fn clear_bookmarks(&mut self) -> Result<(), QuranError> {
        self.bookmarks.clear_all()
    }

    pub fn toggle_dark_mode(&mut self) -> Result<bool, QuranError> {
        let next = Preferences {
            dark_mode: !self.preferences.dark_mode,
            ..self.preferences
        };
        self.apply(next)?;
        Ok(next.dark_mode)
    }

    pub fn set_font_size(&mut self, level: u8) -> Result<FontSize, QuranError> {
        let font_size = FontSize::new(level)?;
        self.apply(Preferences { font_size, ..self.preferences })?;
        Ok(font_size)
    }

    pub fn increase_font_size(&mut self) -> Result<FontSize, QuranError> {
        let font_size = self.preferences.font_size.larger();
        self.apply(Preferences { font_size, ..self.preferences })?;
        Ok(font_size)
    }

    pub fn decrease_font_size(&mut self) -> Result<FontSize, QuranError> {
        let font_size = self.preferences.font_size.smaller();
        self.apply(Preferences { font_size, ..self.preferences })?;
        Ok(font_size)
    }

    fn apply(&mut self, next: Preferences) -> Result<(), QuranError> {
        if next == self.preferences {
            return Ok(());
        }
        next.save(self.store.as_ref())?;
        self.preferences = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_store::MemoryLocalStore;
    use crate::models::sample_verse;

    #[test]
    fn test_toggle_bookmark_from_verse() {
        let mut session = ReaderSession::open(Arc::new(MemoryLocalStore::new())).unwrap();
        let verse = sample_verse(1, 1);

        assert_eq!(session.toggle_bookmark(&verse, "Al-Fatihah").unwrap(), ToggleOutcome::Added);
        assert!(session.is_bookmarked(&verse));
        let listed = session.list_bookmarks();
        assert_eq!(listed[0].key, "1-1");
        assert_eq!(listed[0].arabic, verse.arabic);
        assert_eq!(listed[0].translation, verse.translation);

        assert_eq!(session.toggle_bookmark(&verse, "Al-Fatihah").unwrap(), ToggleOutcome::Removed);
        assert!(!session.is_bookmarked(&verse));
    }

    #[test]
    fn test_preferences_persist_across_sessions() {
        let dir = tempfile::tempdir().unwrap();
        let store: Arc<dyn LocalStore> = Arc::new(SqliteLocalStore::new(dir.path().join("settings.db")));

        {
            let mut session = ReaderSession::open(store.clone()).unwrap();
            assert!(session.toggle_dark_mode().unwrap());
            assert_eq!(session.set_font_size(4).unwrap().level(), 4);
            session.toggle_bookmark(&sample_verse(2, 255), "Al-Baqarah").unwrap();
        }

        let session = ReaderSession::open(store).unwrap();
        assert!(session.preferences().dark_mode);
        assert_eq!(session.preferences().font_size.level(), 4);
        assert_eq!(session.list_bookmarks()[0].key, "2-255");
    }

    #[test]
    fn test_font_size_steps_saturate() {
        let mut session = ReaderSession::open(Arc::new(MemoryLocalStore::new())).unwrap();
        for _ in 0..4 {
            session.increase_font_size().unwrap();
        }
        assert_eq!(session.preferences().font_size.level(), 5);
        for _ in 0..6 {
            session.decrease_font_size().unwrap();
        }
        assert_eq!(session.preferences().font_size.level(), 1);
        assert!(matches!(session.set_font_size(7), Err(QuranError::InvalidInput(_))));
        assert_eq!(session.preferences().font_size.level(), 1);
    }

    #[test]
    fn test_partially_rejected_preference_write_persists_nothing() {
        let store = Arc::new(MemoryLocalStore::new());
        let mut session = ReaderSession::open(store.clone()).unwrap();
        store.fail_setting("fontSize");

        assert!(session.toggle_dark_mode().is_err());
        assert!(!session.preferences().dark_mode);
        assert_eq!(store.get_setting("darkMode").unwrap(), None);

        let reopened = ReaderSession::open(store).unwrap();
        assert!(!reopened.preferences().dark_mode);
    }

    #[test]
    fn test_session_opens_despite_corrupt_bookmark_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.db");
        let store: Arc<dyn LocalStore> = Arc::new(SqliteLocalStore::new(&path));
        {
            let mut session = ReaderSession::open(store.clone()).unwrap();
            session.toggle_bookmark(&sample_verse(1, 1), "Al-Fatihah").unwrap();
        }

        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.execute("UPDATE bookmarks SET created_at = 'not a time'", []).unwrap();
        conn.execute(
            "INSERT INTO bookmarks (key, no_surat, no_ayat, nm_surat, arab, tafsir, created_at)
             VALUES ('1-2', 1, 2, 'Al-Fatihah', '', '', '2026-01-01T08:00:00+00:00')",
            [],
        )
        .unwrap();

        let session = ReaderSession::open(store).unwrap();
        let keys: Vec<String> = session.list_bookmarks().into_iter().map(|b| b.key).collect();
        assert_eq!(keys, vec!["1-2"]);
    }

    #[test]
    fn test_failed_preference_write_keeps_state() {
        let store = Arc::new(MemoryLocalStore::new());
        let mut session = ReaderSession::open(store.clone()).unwrap();
        store.set_fail_writes(true);
        assert!(session.toggle_dark_mode().is_err());
        assert!(!session.preferences().dark_mode);
    }
}
