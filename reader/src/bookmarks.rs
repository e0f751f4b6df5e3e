//! Client-local bookmark ledger keyed by `"{chapter}-{verse}"`

use crate::error::QuranError;
use crate::local_store::LocalStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

pub fn bookmark_key(chapter_no: u32, verse_no: u32) -> String {
    format!("{}-{}", chapter_no, verse_no)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    pub key: String,
    #[serde(rename = "no_surat")]
    pub chapter_no: u32,
    #[serde(rename = "no_ayat")]
    pub verse_no: u32,
    #[serde(rename = "nm_surat")]
    pub chapter_name: String,
    #[serde(rename = "arab")]
    pub arabic: String,
    #[serde(rename = "tafsir")]
    pub translation: String,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Display fields captured when a bookmark is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkSnapshot {
    pub chapter_name: String,
    pub arabic: String,
    pub translation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleOutcome {
    Added,
    Removed,
}

/// Every mutation writes the full list through the store first and only then
/// replaces the in-memory entries, so a failed write leaves both sides unchanged.
pub struct BookmarkLedger {
    entries: Vec<Bookmark>,
    store: Arc<dyn LocalStore>,
}

impl BookmarkLedger {
    pub fn load(store: Arc<dyn LocalStore>) -> Result<Self, QuranError> {
        let mut seen = HashSet::new();
        let entries: Vec<Bookmark> = store
            .load_bookmarks()?
            .into_iter()
            .filter(|b| {
                let fresh = seen.insert(b.key.clone());
                if !fresh {
                    tracing::warn!("Dropping duplicate bookmark {}", b.key);
                }
                fresh
            })
            .collect();

        tracing::debug!("Loaded {} bookmarks", entries.len());
        Ok(Self { entries, store })
    }

    /// Newest first; entries created at the same instant keep reverse insertion order.
    pub fn list(&self) -> Vec<Bookmark> {
        let mut listed: Vec<Bookmark> = self.entries.iter().rev().cloned().collect();
        listed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        listed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, chapter_no: u32, verse_no: u32) -> bool {
        let key = bookmark_key(chapter_no, verse_no);
        self.entries.iter().any(|b| b.key == key)
    }

    pub fn toggle(
        &mut self,
        chapter_no: u32,
        verse_no: u32,
        snapshot: BookmarkSnapshot,
    ) -> Result<ToggleOutcome, QuranError> {
        self.toggle_at(chapter_no, verse_no, snapshot, Utc::now())
    }

    /// Insert when absent, remove when present. An existing entry's snapshot is never
    /// refreshed.
    pub fn toggle_at(
        &mut self,
        chapter_no: u32,
        verse_no: u32,
        snapshot: BookmarkSnapshot,
        now: DateTime<Utc>,
    ) -> Result<ToggleOutcome, QuranError> {
        let key = bookmark_key(chapter_no, verse_no);
        let mut next = self.entries.clone();

        let outcome = match next.iter().position(|b| b.key == key) {
            Some(idx) => {
                next.remove(idx);
                ToggleOutcome::Removed
            }
            None => {
                next.push(Bookmark {
                    key: key.clone(),
                    chapter_no,
                    verse_no,
                    chapter_name: snapshot.chapter_name,
                    arabic: snapshot.arabic,
                    translation: snapshot.translation,
                    created_at: now,
                });
                ToggleOutcome::Added
            }
        };

        self.commit(next)?;
        tracing::info!("Bookmark {} {:?}", key, outcome);
        Ok(outcome)
    }

    /// Remove by key; returns whether an entry was removed.
    pub fn remove(&mut self, key: &str) -> Result<bool, QuranError> {
        if !self.entries.iter().any(|b| b.key == key) {
            return Ok(false);
        }
        let next: Vec<Bookmark> = self.entries.iter().filter(|b| b.key != key).cloned().collect();
        self.commit(next)?;
        Ok(true)
    }

    pub fn clear_all(&mut self) -> Result<(), QuranError> {
        self.commit(Vec::new())?;
        tracing::info!("Cleared all bookmarks");
        Ok(())
    }

    fn commit(&mut self, next: Vec<Bookmark>) -> Result<(), QuranError> {
        self.store.save_bookmarks(&next)?;
        self.entries = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_store::MemoryLocalStore;
    use chrono::{Duration, TimeZone};

    fn snapshot(name: &str) -> BookmarkSnapshot {
        BookmarkSnapshot {
            chapter_name: name.to_string(),
            arabic: "الْحَمْدُ لِلّٰهِ".to_string(),
            translation: "Segala puji bagi Allah".to_string(),
        }
    }

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap()
    }

    fn keys(ledger: &BookmarkLedger) -> Vec<String> {
        ledger.list().into_iter().map(|b| b.key).collect()
    }

    fn empty_ledger() -> (Arc<MemoryLocalStore>, BookmarkLedger) {
        let store = Arc::new(MemoryLocalStore::new());
        let ledger = BookmarkLedger::load(store.clone()).unwrap();
        (store, ledger)
    }

    #[test]
    fn test_toggle_adds_exactly_one_entry() {
        let (store, mut ledger) = empty_ledger();
        let outcome = ledger.toggle_at(1, 2, snapshot("Al-Fatihah"), base_time()).unwrap();
        assert_eq!(outcome, ToggleOutcome::Added);
        assert_eq!(ledger.len(), 1);
        assert!(ledger.contains(1, 2));
        assert_eq!(keys(&ledger), vec!["1-2"]);
        assert_eq!(store.load_bookmarks().unwrap().len(), 1);
    }

    #[test]
    fn test_toggle_twice_restores_key_set() {
        let (store, mut ledger) = empty_ledger();
        ledger.toggle_at(2, 255, snapshot("Al-Baqarah"), base_time()).unwrap();
        let before = keys(&ledger);

        ledger.toggle_at(1, 1, snapshot("Al-Fatihah"), base_time()).unwrap();
        let outcome = ledger.toggle_at(1, 1, snapshot("Ignored"), base_time()).unwrap();
        assert_eq!(outcome, ToggleOutcome::Removed);
        assert_eq!(keys(&ledger), before);
        assert_eq!(store.load_bookmarks().unwrap().len(), 1);
    }

    #[test]
    fn test_newest_first_after_toggle_sequence() {
        let (_store, mut ledger) = empty_ledger();
        let t = base_time();
        ledger.toggle_at(1, 1, snapshot("Al-Fatihah"), t).unwrap();
        ledger.toggle_at(2, 1, snapshot("Al-Baqarah"), t + Duration::seconds(10)).unwrap();
        ledger.toggle_at(3, 1, snapshot("Ali Imran"), t + Duration::seconds(20)).unwrap();
        ledger.toggle_at(2, 1, snapshot("Al-Baqarah"), t + Duration::seconds(30)).unwrap();
        ledger.toggle_at(2, 1, snapshot("Al-Baqarah"), t + Duration::seconds(40)).unwrap();

        assert_eq!(keys(&ledger), vec!["2-1", "3-1", "1-1"]);
        let listed = ledger.list();
        assert!(listed.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }

    #[test]
    fn test_same_instant_lists_latest_insert_first() {
        let (_store, mut ledger) = empty_ledger();
        ledger.toggle_at(1, 1, snapshot("Al-Fatihah"), base_time()).unwrap();
        ledger.toggle_at(1, 2, snapshot("Al-Fatihah"), base_time()).unwrap();
        assert_eq!(keys(&ledger), vec!["1-2", "1-1"]);
    }

    #[test]
    fn test_snapshot_never_updated_in_place() {
        let (_store, mut ledger) = empty_ledger();
        ledger.toggle_at(1, 1, snapshot("First"), base_time()).unwrap();
        assert_eq!(ledger.list()[0].chapter_name, "First");
        // a second toggle removes rather than refreshing the snapshot
        ledger.toggle_at(1, 1, snapshot("Second"), base_time()).unwrap();
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_clear_all_and_remove() {
        let (store, mut ledger) = empty_ledger();
        ledger.toggle_at(1, 1, snapshot("Al-Fatihah"), base_time()).unwrap();
        ledger.toggle_at(1, 2, snapshot("Al-Fatihah"), base_time()).unwrap();

        assert!(ledger.remove("1-1").unwrap());
        assert!(!ledger.remove("1-1").unwrap());
        assert_eq!(keys(&ledger), vec!["1-2"]);

        ledger.clear_all().unwrap();
        assert!(ledger.is_empty());
        assert!(store.load_bookmarks().unwrap().is_empty());
    }

    #[test]
    fn test_failed_write_leaves_ledger_unchanged() {
        let (store, mut ledger) = empty_ledger();
        ledger.toggle_at(1, 1, snapshot("Al-Fatihah"), base_time()).unwrap();
        store.set_fail_writes(true);

        assert!(ledger.toggle_at(1, 2, snapshot("Al-Fatihah"), base_time()).is_err());
        assert!(ledger.clear_all().is_err());
        assert_eq!(keys(&ledger), vec!["1-1"]);
        assert_eq!(store.load_bookmarks().unwrap().len(), 1);
    }

    #[test]
    fn test_load_drops_duplicate_keys() {
        let store = Arc::new(MemoryLocalStore::new());
        let entry = Bookmark {
            key: bookmark_key(1, 1),
            chapter_no: 1,
            verse_no: 1,
            chapter_name: "Al-Fatihah".to_string(),
            arabic: String::new(),
            translation: String::new(),
            created_at: base_time(),
        };
        store.save_bookmarks(&[entry.clone(), entry]).unwrap();
        let ledger = BookmarkLedger::load(store).unwrap();
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_wire_format_matches_local_storage_records() {
        let (_store, mut ledger) = empty_ledger();
        ledger.toggle_at(1, 1, snapshot("Al-Fatihah"), base_time()).unwrap();
        let json = serde_json::to_value(ledger.list()).unwrap();
        assert_eq!(json[0]["key"], "1-1");
        assert_eq!(json[0]["nm_surat"], "Al-Fatihah");
        assert_eq!(json[0]["timestamp"], "2026-01-01T08:00:00Z");
    }
}
