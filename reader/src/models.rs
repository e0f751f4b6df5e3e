//! Row types for the content store
//!
//! Field names are English in Rust; the wire names follow the column names of the
//! source tables so clients see the same JSON keys as the database schema.

use serde::{Deserialize, Serialize};

/// Chapter numbers run 1..=114.
pub const CHAPTER_COUNT: u32 = 114;

/// Chapter 9 (At-Taubah) is the only chapter that does not open with the basmala.
const CHAPTER_WITHOUT_BISMILLAH: u32 = 9;

/// A single verse row from `m_surat_t`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verse {
    #[serde(rename = "no_surat")]
    pub chapter_no: u32,
    #[serde(rename = "no_ayat")]
    pub verse_no: u32,
    #[serde(rename = "no_juz")]
    pub section_no: u32,
    #[serde(rename = "no_hal")]
    pub page_no: u32,
    #[serde(rename = "arab")]
    pub arabic: String,
    #[serde(rename = "tafsir")]
    pub translation: String,
    #[serde(rename = "tafsir_muasir")]
    pub tafsir_muyassar: Option<String>,
    #[serde(rename = "tafsir_clearQuran")]
    pub tafsir_clear_quran: Option<String>,
    #[serde(rename = "tafsir_sureQuran")]
    pub tafsir_sure_quran: Option<String>,
}

/// Secondary commentary columns with their display labels, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Commentary {
    Muyassar,
    ClearQuran,
    SureQuran,
}

impl Commentary {
    pub const ALL: [Commentary; 3] = [Commentary::Muyassar, Commentary::ClearQuran, Commentary::SureQuran];

    pub fn label(&self) -> &'static str {
        match self {
            Commentary::Muyassar => "Tafsir Muyassar",
            Commentary::ClearQuran => "Tafsir Clear Quran",
            Commentary::SureQuran => "Tafsir Sure Quran",
        }
    }
}

impl Verse {
    pub fn bookmark_key(&self) -> String {
        format!("{}-{}", self.chapter_no, self.verse_no)
    }

    pub fn commentary(&self, which: Commentary) -> Option<&str> {
        let text = match which {
            Commentary::Muyassar => self.tafsir_muyassar.as_deref(),
            Commentary::ClearQuran => self.tafsir_clear_quran.as_deref(),
            Commentary::SureQuran => self.tafsir_sure_quran.as_deref(),
        };
        text.filter(|t| !t.trim().is_empty())
    }

    /// Present commentaries in display order, skipping null or blank columns.
    pub fn commentaries(&self) -> impl Iterator<Item = (Commentary, &str)> {
        Commentary::ALL
            .into_iter()
            .filter_map(move |c| self.commentary(c).map(|text| (c, text)))
    }

    /// Plain-text form used when a reader shares a verse.
    pub fn share_text(&self, chapter_name: &str) -> String {
        format!(
            "{}\n\n\"{}\"\n\n- QS. {}:{}",
            self.arabic, self.translation, chapter_name, self.verse_no
        )
    }
}

/// A chapter row from `m_quran_t`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    #[serde(rename = "no_surat")]
    pub chapter_no: u32,
    #[serde(rename = "nm_surat")]
    pub name: String,
    #[serde(rename = "nm_surat2")]
    pub name_arabic: Option<String>,
    #[serde(rename = "arti_surat")]
    pub meaning: Option<String>,
    #[serde(rename = "jml_ayat")]
    pub verse_count: Option<u32>,
    #[serde(rename = "tmp_turun")]
    pub revelation_place: Option<String>,
}

impl Chapter {
    pub fn shows_bismillah(&self) -> bool {
        self.chapter_no != CHAPTER_WITHOUT_BISMILLAH
    }

    pub fn neighbors(&self) -> ChapterNeighbors {
        ChapterNeighbors::of(self.chapter_no)
    }
}

/// Previous/next chapter links, bounded to 1..=114.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterNeighbors {
    pub previous: Option<u32>,
    pub next: Option<u32>,
}

impl ChapterNeighbors {
    pub fn of(chapter_no: u32) -> Self {
        let previous = (chapter_no > 1 && chapter_no <= CHAPTER_COUNT).then(|| chapter_no - 1);
        let next = (chapter_no >= 1 && chapter_no < CHAPTER_COUNT).then(|| chapter_no + 1);
        Self { previous, next }
    }
}

/// An opaque `d_footer_t` / `d_pilihan_t` row, every column forwarded as-is.
pub type AnnotationRow = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Serialize)]
pub struct ChapterDetail {
    #[serde(rename = "infoSurat")]
    pub info: Chapter,
    #[serde(rename = "ayat")]
    pub verses: Vec<Verse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerseDetail {
    #[serde(rename = "ayat")]
    pub verse: Verse,
    pub footer: Vec<AnnotationRow>,
    #[serde(rename = "pilihan")]
    pub choices: Vec<AnnotationRow>,
}

#[cfg(test)]
pub(crate) fn sample_verse(chapter_no: u32, verse_no: u32) -> Verse {
    Verse {
        chapter_no,
        verse_no,
        section_no: 1,
        page_no: 1,
        arabic: "بِسْمِ اللّٰهِ".to_string(),
        translation: "Dengan nama Allah".to_string(),
        tafsir_muyassar: None,
        tafsir_clear_quran: None,
        tafsir_sure_quran: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verse_wire_names_follow_columns() {
        let verse = sample_verse(1, 1);
        let json = serde_json::to_value(&verse).unwrap();
        assert_eq!(json["no_surat"], 1);
        assert_eq!(json["no_ayat"], 1);
        assert_eq!(json["arab"], "بِسْمِ اللّٰهِ");
        assert!(json["tafsir_clearQuran"].is_null());
    }

    #[test]
    fn test_commentaries_skip_blank_columns() {
        let mut verse = sample_verse(2, 255);
        verse.tafsir_muyassar = Some("   ".to_string());
        verse.tafsir_sure_quran = Some("Ayat Kursi".to_string());
        let present: Vec<_> = verse.commentaries().collect();
        assert_eq!(present, vec![(Commentary::SureQuran, "Ayat Kursi")]);
    }

    #[test]
    fn test_share_text_layout() {
        let verse = sample_verse(1, 1);
        assert_eq!(
            verse.share_text("Al-Fatihah"),
            "بِسْمِ اللّٰهِ\n\n\"Dengan nama Allah\"\n\n- QS. Al-Fatihah:1"
        );
        assert_eq!(verse.bookmark_key(), "1-1");
    }

    #[test]
    fn test_chapter_neighbors_are_bounded() {
        assert_eq!(ChapterNeighbors::of(1), ChapterNeighbors { previous: None, next: Some(2) });
        assert_eq!(ChapterNeighbors::of(114), ChapterNeighbors { previous: Some(113), next: None });
        assert_eq!(ChapterNeighbors::of(50), ChapterNeighbors { previous: Some(49), next: Some(51) });
        assert_eq!(ChapterNeighbors::of(0), ChapterNeighbors { previous: None, next: None });
    }

    #[test]
    fn test_bismillah_skipped_only_for_taubah() {
        let mut chapter = Chapter {
            chapter_no: 9,
            name: "At-Taubah".to_string(),
            name_arabic: None,
            meaning: None,
            verse_count: Some(129),
            revelation_place: Some("Madaniyah".to_string()),
        };
        assert!(!chapter.shows_bismillah());
        chapter.chapter_no = 1;
        assert!(chapter.shows_bismillah());
    }
}
