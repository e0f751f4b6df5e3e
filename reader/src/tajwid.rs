//! Tajwid (pronunciation rule) classification of Arabic verse text
//!
//! Every code point of a verse gets at most one rule tag. The tag is decided by a
//! window of the preceding code point, the current one and the next two; nothing
//! outside that window is consulted. Rules are evaluated in a fixed priority order
//! and the first match wins, so a code point that satisfies several patterns gets
//! the tag of the earliest rule in [`RULES`].
//!
//! Letters and diacritics are separate code points, so the "next" character of a
//! letter is usually its vowel mark rather than the following letter.

use serde::{Deserialize, Serialize};

const NUN: char = 'ن';
const MIM: char = 'م';
const LAM: char = 'ل';
const RA: char = 'ر';
const ALIF: char = 'ا';
const ALIF_MADDA: char = 'آ';
const WAW: char = 'و';
const YA: char = 'ي';
const BA: char = 'ب';

const FATHATAN: char = '\u{064B}';
const DAMMATAN: char = '\u{064C}';
const KASRATAN: char = '\u{064D}';
const FATHA: char = '\u{064E}';
const DAMMA: char = '\u{064F}';
const KASRA: char = '\u{0650}';
const SHADDA: char = '\u{0651}';
const SUKUN: char = '\u{0652}';
const MADDA: char = '\u{0653}';
/// Quranic small high dotless head of khah, used as sukun in Uthmani text.
const SMALL_HIGH_SUKUN: char = '\u{06E1}';

const QALQALAH_LETTERS: &[char] = &['ق', 'ط', 'ب', 'ج', 'د'];
const IDGHAM_LETTERS: &[char] = &['ي', 'ر', 'م', 'ل', 'و', 'ن'];
const IKHFA_LETTERS: &[char] = &[
    'ص', 'ذ', 'ث', 'ك', 'ج', 'ش', 'ق', 'س', 'د', 'ط', 'ز', 'ف', 'ت', 'ض', 'ظ',
];
const SUN_LETTERS: &[char] = &[
    'ت', 'ث', 'د', 'ذ', 'ر', 'ز', 'س', 'ش', 'ص', 'ض', 'ط', 'ظ', 'ل', 'ن',
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TajwidRule {
    Ghunnah,
    Qalqalah,
    Idgham,
    Iqlab,
    Ikhfa,
    Mad,
    LamRule,
    RaTafkhim,
    RaTarqiq,
}

impl TajwidRule {
    /// Rules in evaluation order.
    pub const ALL: [TajwidRule; 9] = [
        TajwidRule::Ghunnah,
        TajwidRule::Qalqalah,
        TajwidRule::Idgham,
        TajwidRule::Iqlab,
        TajwidRule::Ikhfa,
        TajwidRule::Mad,
        TajwidRule::LamRule,
        TajwidRule::RaTafkhim,
        TajwidRule::RaTarqiq,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TajwidRule::Ghunnah => "ghunnah",
            TajwidRule::Qalqalah => "qalqalah",
            TajwidRule::Idgham => "idgham",
            TajwidRule::Iqlab => "iqlab",
            TajwidRule::Ikhfa => "ikhfa",
            TajwidRule::Mad => "mad",
            TajwidRule::LamRule => "lam-rule",
            TajwidRule::RaTafkhim => "ra-tafkhim",
            TajwidRule::RaTarqiq => "ra-tarqiq",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TajwidRule::Ghunnah => "Ghunnah (nasalization)",
            TajwidRule::Qalqalah => "Qalqalah (echo)",
            TajwidRule::Idgham => "Idgham (assimilation)",
            TajwidRule::Iqlab => "Iqlab (conversion to mim)",
            TajwidRule::Ikhfa => "Ikhfa (concealment)",
            TajwidRule::Mad => "Mad (lengthening)",
            TajwidRule::LamRule => "Lam Syamsiyah (assimilated lam)",
            TajwidRule::RaTafkhim => "Ra Tafkhim (heavy ra)",
            TajwidRule::RaTarqiq => "Ra Tarqiq (light ra)",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            TajwidRule::Ghunnah => "#16a34a",
            TajwidRule::Qalqalah => "#2563eb",
            TajwidRule::Idgham => "#9333ea",
            TajwidRule::Iqlab => "#db2777",
            TajwidRule::Ikhfa => "#ea580c",
            TajwidRule::Mad => "#dc2626",
            TajwidRule::LamRule => "#0891b2",
            TajwidRule::RaTafkhim => "#854d0e",
            TajwidRule::RaTarqiq => "#65a30d",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub name: &'static str,
    pub label: &'static str,
    pub color: &'static str,
}

pub fn legend() -> Vec<LegendEntry> {
    TajwidRule::ALL
        .iter()
        .map(|rule| LegendEntry {
            name: rule.name(),
            label: rule.label(),
            color: rule.color(),
        })
        .collect()
}

/// The code points a rule predicate may look at.
#[derive(Debug, Clone, Copy)]
pub struct Window {
    pub prev: Option<char>,
    pub current: char,
    pub next: Option<char>,
    pub next2: Option<char>,
}

impl Window {
    fn at(chars: &[char], idx: usize) -> Self {
        Self {
            prev: idx.checked_sub(1).map(|i| chars[i]),
            current: chars[idx],
            next: chars.get(idx + 1).copied(),
            next2: chars.get(idx + 2).copied(),
        }
    }

    fn next_is(&self, pred: impl Fn(char) -> bool) -> bool {
        self.next.is_some_and(pred)
    }

    fn prev_is(&self, pred: impl Fn(char) -> bool) -> bool {
        self.prev.is_some_and(pred)
    }

    fn is_nun_sukun(&self) -> bool {
        self.current == NUN && self.next_is(is_sukun)
    }

    /// First code point in the window after `current` that is neither a combining
    /// mark nor whitespace.
    fn next_letter(&self) -> Option<char> {
        [self.next, self.next2]
            .into_iter()
            .flatten()
            .find(|&c| !is_mark(c) && !c.is_whitespace())
    }
}

fn is_tanwin(c: char) -> bool {
    matches!(c, FATHATAN | DAMMATAN | KASRATAN)
}

fn is_sukun(c: char) -> bool {
    matches!(c, SUKUN | SMALL_HIGH_SUKUN)
}

/// Arabic combining marks: harakat, tanwin, shadda, sukun, madda and the Quranic
/// annotation signs.
fn is_mark(c: char) -> bool {
    matches!(c, '\u{064B}'..='\u{065F}' | '\u{0670}' | '\u{06D6}'..='\u{06ED}')
}

fn ghunnah(w: &Window) -> bool {
    matches!(w.current, NUN | MIM) && w.prev_is(|c| c == SHADDA || is_tanwin(c))
}

fn qalqalah(w: &Window) -> bool {
    QALQALAH_LETTERS.contains(&w.current)
        && w.next.map_or(true, |c| is_sukun(c) || c.is_whitespace())
}

fn idgham(w: &Window) -> bool {
    w.is_nun_sukun() && w.next2.is_some_and(|c| IDGHAM_LETTERS.contains(&c))
}

fn nun_sukun_or_tanwin(w: &Window) -> bool {
    w.is_nun_sukun() || is_tanwin(w.current)
}

fn iqlab(w: &Window) -> bool {
    nun_sukun_or_tanwin(w) && w.next_letter() == Some(BA)
}

fn ikhfa(w: &Window) -> bool {
    nun_sukun_or_tanwin(w) && w.next_letter().is_some_and(|c| IKHFA_LETTERS.contains(&c))
}

fn mad(w: &Window) -> bool {
    match w.current {
        ALIF_MADDA => true,
        ALIF => w.next == Some(MADDA) || w.prev == Some(FATHA),
        WAW => w.prev == Some(DAMMA),
        YA => w.prev == Some(KASRA),
        _ => false,
    }
}

fn lam_rule(w: &Window) -> bool {
    w.current == LAM && w.prev == Some(ALIF) && w.next_is(|c| SUN_LETTERS.contains(&c))
}

fn ra_tafkhim(w: &Window) -> bool {
    w.current == RA && w.next_is(|c| c == FATHA || c == DAMMA)
}

fn ra_tarqiq(w: &Window) -> bool {
    w.current == RA && w.next == Some(KASRA)
}

/// Priority-ordered rule table; the first predicate that holds decides the tag.
pub const RULES: [(TajwidRule, fn(&Window) -> bool); 9] = [
    (TajwidRule::Ghunnah, ghunnah),
    (TajwidRule::Qalqalah, qalqalah),
    (TajwidRule::Idgham, idgham),
    (TajwidRule::Iqlab, iqlab),
    (TajwidRule::Ikhfa, ikhfa),
    (TajwidRule::Mad, mad),
    (TajwidRule::LamRule, lam_rule),
    (TajwidRule::RaTafkhim, ra_tafkhim),
    (TajwidRule::RaTarqiq, ra_tarqiq),
];

pub fn rule_for(window: &Window) -> Option<TajwidRule> {
    RULES
        .iter()
        .find(|(_, predicate)| predicate(window))
        .map(|(rule, _)| *rule)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TajwidGlyph {
    pub ch: char,
    pub rule: Option<TajwidRule>,
}

/// Tag every code point of `text`.
pub fn classify(text: &str) -> Vec<TajwidGlyph> {
    let chars: Vec<char> = text.chars().collect();
    (0..chars.len())
        .map(|idx| TajwidGlyph {
            ch: chars[idx],
            rule: rule_for(&Window::at(&chars, idx)),
        })
        .collect()
}

/// Consecutive code points sharing a tag, coalesced for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TajwidRun {
    pub text: String,
    pub rule: Option<TajwidRule>,
}

pub fn classify_runs(text: &str) -> Vec<TajwidRun> {
    let mut runs: Vec<TajwidRun> = Vec::new();
    for glyph in classify(text) {
        match runs.last_mut() {
            Some(run) if run.rule == glyph.rule => run.text.push(glyph.ch),
            _ => runs.push(TajwidRun {
                text: glyph.ch.to_string(),
                rule: glyph.rule,
            }),
        }
    }
    runs
}
