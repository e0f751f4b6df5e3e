//! Read-only content store over the Quran SQLite database

use crate::error::QuranError;
use crate::models::{AnnotationRow, Chapter, ChapterDetail, Verse, VerseDetail};
use crate::sections::{section_info, SectionInfo};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const VERSE_COLUMNS: &str = "no_surat, no_ayat, no_juz, no_hal, arab, tafsir, tafsir_muasir, tafsir_clearQuran, tafsir_sureQuran";
const CHAPTER_COLUMNS: &str = "no_surat, nm_surat, nm_surat2, arti_surat, jml_ayat, tmp_turun";

fn db_err(e: rusqlite::Error) -> QuranError {
    QuranError::Database(e.to_string())
}

fn row_to_verse(row: &Row) -> rusqlite::Result<Verse> {
    Ok(Verse {
        chapter_no: row.get(0)?,
        verse_no: row.get(1)?,
        section_no: row.get(2)?,
        page_no: row.get(3)?,
        arabic: row.get(4)?,
        translation: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        tafsir_muyassar: row.get(6)?,
        tafsir_clear_quran: row.get(7)?,
        tafsir_sure_quran: row.get(8)?,
    })
}

fn row_to_chapter(row: &Row) -> rusqlite::Result<Chapter> {
    Ok(Chapter {
        chapter_no: row.get(0)?,
        name: row.get(1)?,
        name_arabic: row.get(2)?,
        meaning: row.get(3)?,
        verse_count: row.get(4)?,
        revelation_place: row.get(5)?,
    })
}

/// Forward every column of an annotation row as JSON, keyed by column name.
fn row_to_annotation(row: &Row) -> rusqlite::Result<AnnotationRow> {
    let stmt = row.as_ref();
    let mut map = AnnotationRow::new();
    for idx in 0..stmt.column_count() {
        let name = stmt.column_name(idx)?.to_string();
        let value = match row.get_ref(idx)? {
            ValueRef::Null => serde_json::Value::Null,
            ValueRef::Integer(i) => serde_json::Value::from(i),
            ValueRef::Real(f) => serde_json::Value::from(f),
            ValueRef::Text(t) => serde_json::Value::from(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => serde_json::Value::from(b.to_vec()),
        };
        map.insert(name, value);
    }
    Ok(map)
}

/// Read-only query surface. The connection is opened once and shared.
pub struct ContentStore {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
}

impl ContentStore {
    /// Open the database file read-only.
    pub fn open(db_path: &Path) -> Result<Self, QuranError> {
        let conn = Connection::open_with_flags(
            db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| QuranError::Database(format!("unable to open {:?}: {}", db_path, e)))?;

        tracing::info!("Opened content store at {:?}", db_path);
        Ok(Self {
            conn: Mutex::new(conn),
            db_path: Some(db_path.to_path_buf()),
        })
    }

    /// Wrap an already opened connection (in-memory databases, fixtures).
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
            db_path: None,
        }
    }

    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T, QuranError>) -> Result<T, QuranError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| QuranError::Other("Failed to acquire content store lock".to_string()))?;
        f(&conn)
    }

    /// All chapters, one row per chapter number.
    pub fn chapter_list(&self) -> Result<Vec<Chapter>, QuranError> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {} FROM m_quran_t GROUP BY no_surat ORDER BY no_surat",
                    CHAPTER_COLUMNS
                ))
                .map_err(db_err)?;

            let chapters = stmt
                .query_map([], row_to_chapter)
                .map_err(db_err)?
                .collect::<Result<Vec<_>, _>>()
                .map_err(db_err)?;

            tracing::debug!("chapter_list returned {} rows", chapters.len());
            Ok(chapters)
        })
    }

    pub fn chapter_info(&self, chapter_no: u32) -> Result<Option<Chapter>, QuranError> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {} FROM m_quran_t WHERE no_surat = ?1 LIMIT 1", CHAPTER_COLUMNS),
                [chapter_no],
                row_to_chapter,
            )
            .optional()
            .map_err(db_err)
        })
    }

    /// Chapter metadata plus its verses in verse order.
    pub fn chapter(&self, chapter_no: u32) -> Result<ChapterDetail, QuranError> {
        let info = self
            .chapter_info(chapter_no)?
            .ok_or_else(|| QuranError::NotFound(format!("Chapter {}", chapter_no)))?;

        let verses = self.with_conn(|conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {} FROM m_surat_t WHERE no_surat = ?1 ORDER BY no_ayat",
                    VERSE_COLUMNS
                ))
                .map_err(db_err)?;

            let verses = stmt
                .query_map([chapter_no], row_to_verse)
                .map_err(db_err)?
                .collect::<Result<Vec<_>, _>>()
                .map_err(db_err)?;
            Ok(verses)
        })?;

        tracing::debug!("chapter {} has {} verses", chapter_no, verses.len());
        Ok(ChapterDetail { info, verses })
    }

    /// Verses whose section number matches, in (chapter, verse) order.
    pub fn section(&self, section_no: u32) -> Result<Vec<Verse>, QuranError> {
        let verses = self.with_conn(|conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {} FROM m_surat_t WHERE no_juz = ?1 ORDER BY no_surat, no_ayat",
                    VERSE_COLUMNS
                ))
                .map_err(db_err)?;

            let verses = stmt
                .query_map([section_no], row_to_verse)
                .map_err(db_err)?
                .collect::<Result<Vec<_>, _>>()
                .map_err(db_err)?;
            Ok(verses)
        })?;

        if verses.is_empty() {
            return Err(QuranError::NotFound(format!("Juz {}", section_no)));
        }
        Ok(verses)
    }

    /// Section metadata for every juz present in `m_juz_t`.
    pub fn section_list(&self) -> Result<Vec<SectionInfo>, QuranError> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT DISTINCT no_juz FROM m_juz_t ORDER BY no_juz")
                .map_err(db_err)?;

            let numbers = stmt
                .query_map([], |row| row.get::<_, u32>(0))
                .map_err(db_err)?
                .collect::<Result<Vec<_>, _>>()
                .map_err(db_err)?;

            Ok(numbers
                .into_iter()
                .filter_map(|no| {
                    let info = section_info(no);
                    if info.is_none() {
                        tracing::warn!("m_juz_t has out-of-range juz number {}", no);
                    }
                    info
                })
                .collect())
        })
    }

    /// One verse plus its footer and choice annotation rows.
    pub fn verse(&self, chapter_no: u32, verse_no: u32) -> Result<VerseDetail, QuranError> {
        self.with_conn(|conn| {
            let verse = conn
                .query_row(
                    &format!(
                        "SELECT {} FROM m_surat_t WHERE no_surat = ?1 AND no_ayat = ?2",
                        VERSE_COLUMNS
                    ),
                    [chapter_no, verse_no],
                    row_to_verse,
                )
                .optional()
                .map_err(db_err)?
                .ok_or_else(|| QuranError::NotFound(format!("Ayat {}:{}", chapter_no, verse_no)))?;

            let footer = Self::annotations(conn, "d_footer_t", chapter_no, verse_no)?;
            let choices = Self::annotations(conn, "d_pilihan_t", chapter_no, verse_no)?;

            Ok(VerseDetail { verse, footer, choices })
        })
    }

    fn annotations(
        conn: &Connection,
        table: &str,
        chapter_no: u32,
        verse_no: u32,
    ) -> Result<Vec<AnnotationRow>, QuranError> {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT * FROM {} WHERE no_surat = ?1 AND no_ayat = ?2",
                table
            ))
            .map_err(db_err)?;

        let rows = stmt
            .query_map([chapter_no, verse_no], row_to_annotation)
            .map_err(db_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_err)?;
        Ok(rows)
    }

    /// Verses whose Arabic text or primary translation contains `query`.
    ///
    /// `instr` keeps the match case- and diacritic-sensitive, unlike `LIKE`. Whitespace
    /// is an ordinary substring; only the empty query matches nothing.
    pub fn search(&self, query: &str) -> Result<Vec<Verse>, QuranError> {
        if query.is_empty() {
            return Ok(Vec::new());
        }

        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {} FROM m_surat_t
                     WHERE instr(arab, ?1) > 0 OR instr(tafsir, ?1) > 0
                     ORDER BY no_surat, no_ayat",
                    VERSE_COLUMNS
                ))
                .map_err(db_err)?;

            let verses = stmt
                .query_map([query], row_to_verse)
                .map_err(db_err)?
                .collect::<Result<Vec<_>, _>>()
                .map_err(db_err)?;

            tracing::debug!("search {:?} matched {} verses", query, verses.len());
            Ok(verses)
        })
    }
}
