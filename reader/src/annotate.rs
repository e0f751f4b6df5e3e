//! Render-ready views of verses and chapters
//!
//! Views are rebuilt on every render from the stored rows; nothing here is cached or
//! persisted.

use crate::markup::{self, StyledSpan};
use crate::models::{Chapter, ChapterDetail, ChapterNeighbors, Commentary, Verse};
use crate::session::ReaderSession;
use crate::tajwid::{self, TajwidRun};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedCommentary {
    pub kind: Commentary,
    pub label: &'static str,
    pub spans: Vec<StyledSpan>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedVerse {
    #[serde(rename = "no_surat")]
    pub chapter_no: u32,
    #[serde(rename = "no_ayat")]
    pub verse_no: u32,
    #[serde(rename = "no_juz")]
    pub section_no: u32,
    #[serde(rename = "no_hal")]
    pub page_no: u32,
    #[serde(rename = "arab")]
    pub arabic: Vec<TajwidRun>,
    #[serde(rename = "tafsir")]
    pub translation: Vec<StyledSpan>,
    pub commentaries: Vec<AnnotatedCommentary>,
    pub bookmarked: bool,
}

pub fn annotate_verse(verse: &Verse, session: Option<&ReaderSession>) -> AnnotatedVerse {
    AnnotatedVerse {
        chapter_no: verse.chapter_no,
        verse_no: verse.verse_no,
        section_no: verse.section_no,
        page_no: verse.page_no,
        arabic: tajwid::classify_runs(&verse.arabic),
        translation: markup::decode(&verse.translation),
        commentaries: verse
            .commentaries()
            .map(|(kind, text)| AnnotatedCommentary {
                kind,
                label: kind.label(),
                spans: markup::decode(text),
            })
            .collect(),
        bookmarked: session.is_some_and(|s| s.is_bookmarked(verse)),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChapterView {
    pub info: Chapter,
    pub show_bismillah: bool,
    pub neighbors: ChapterNeighbors,
    pub verses: Vec<AnnotatedVerse>,
}

impl ChapterView {
    pub fn build(detail: &ChapterDetail, session: Option<&ReaderSession>) -> Self {
        Self {
            info: detail.info.clone(),
            show_bismillah: detail.info.shows_bismillah(),
            neighbors: detail.info.neighbors(),
            verses: detail
                .verses
                .iter()
                .map(|v| annotate_verse(v, session))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_store::MemoryLocalStore;
    use crate::markup::SpanStyle;
    use crate::models::sample_verse;
    use crate::store::tests::fixture_store;
    use std::sync::Arc;

    #[test]
    fn test_annotated_verse_keeps_text() {
        let mut verse = sample_verse(1, 2);
        verse.translation = "Segala puji bagi <i>Allah</i>".to_string();
        verse.tafsir_clear_quran = Some("All praise is for <b>Allah</b>".to_string());

        let view = annotate_verse(&verse, None);
        let arabic: String = view.arabic.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(arabic, verse.arabic);
        assert_eq!(view.translation[1].style, SpanStyle::Italic);
        assert_eq!(view.commentaries.len(), 1);
        assert_eq!(view.commentaries[0].label, "Tafsir Clear Quran");
        assert_eq!(view.commentaries[0].spans[1].text, "Allah");
        assert!(!view.bookmarked);
    }

    #[test]
    fn test_annotated_wire_names_match_verse_columns() {
        let json = serde_json::to_value(annotate_verse(&sample_verse(1, 1), None)).unwrap();
        assert_eq!(json["no_surat"], 1);
        assert!(json["arab"].is_array());
        assert_eq!(json["tafsir"][0]["text"], "Dengan nama Allah");
        assert!(json.get("arabic").is_none());
        assert!(json.get("translation").is_none());
    }

    #[test]
    fn test_bookmarked_flag_from_session() {
        let mut session = ReaderSession::open(Arc::new(MemoryLocalStore::new())).unwrap();
        let verse = sample_verse(1, 1);
        session.toggle_bookmark(&verse, "Al-Fatihah").unwrap();
        assert!(annotate_verse(&verse, Some(&session)).bookmarked);
        assert!(!annotate_verse(&sample_verse(1, 2), Some(&session)).bookmarked);
    }

    #[test]
    fn test_chapter_view_from_store() {
        let store = fixture_store();
        let detail = store.chapter(1).unwrap();
        let view = ChapterView::build(&detail, None);
        assert!(view.show_bismillah);
        assert_eq!(view.neighbors.previous, None);
        assert_eq!(view.neighbors.next, Some(2));
        assert_eq!(view.verses.len(), 3);
        assert_eq!(view.verses[1].translation[1].text, "Allah");
    }
}
