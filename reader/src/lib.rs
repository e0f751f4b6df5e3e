//! Quran Reader - chapter, juz and ayat reading with tajwid highlighting
//!
//! Backend library providing the read-only content store, verse annotation and
//! client-local bookmarks and preferences.

pub mod error;
pub mod models;
pub mod sections;
pub mod store;
pub mod markup;
pub mod tajwid;
pub mod annotate;
pub mod bookmarks;
pub mod local_store;
pub mod preferences;
pub mod session;
pub mod paths;

pub use error::QuranError;
pub use models::{AnnotationRow, Chapter, ChapterDetail, ChapterNeighbors, Commentary, Verse, VerseDetail};
pub use sections::{all_sections, section_info, SectionInfo};
pub use store::ContentStore;
pub use markup::{SpanStyle, StyledSpan};
pub use tajwid::{classify, classify_runs, legend, LegendEntry, TajwidGlyph, TajwidRule, TajwidRun};
pub use annotate::{annotate_verse, AnnotatedVerse, ChapterView};
pub use bookmarks::{bookmark_key, Bookmark, BookmarkLedger, BookmarkSnapshot, ToggleOutcome};
pub use local_store::{LocalStore, MemoryLocalStore, SqliteLocalStore};
pub use preferences::{FontSize, Preferences};
pub use session::ReaderSession;
pub use paths::{get_data_dir, get_settings_db_path};
