//! Static catalog of the 30 juz (reading sections)

use serde::Serialize;

pub const SECTION_COUNT: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionInfo {
    #[serde(rename = "no_juz")]
    pub section_no: u32,
    /// Traditional opening words of the juz.
    pub name: &'static str,
    pub start: &'static str,
    pub end: &'static str,
    pub pages: &'static str,
}

// (opening words, first verse, last verse, mushaf pages)
const CATALOG: [(&str, &str, &str, &str); SECTION_COUNT as usize] = [
    ("الم", "Al-Fatihah : 1", "Al-Baqarah : 141", "1-21"),
    ("سيقول", "Al-Baqarah : 142", "Al-Baqarah : 252", "22-41"),
    ("تلك الرسل", "Al-Baqarah : 253", "Ali Imran : 92", "42-62"),
    ("لن تنالوا", "Ali Imran : 93", "An-Nisa : 23", "63-82"),
    ("والمحصنات", "An-Nisa : 24", "An-Nisa : 147", "83-102"),
    ("لا يحب الله", "An-Nisa : 148", "Al-Ma'idah : 81", "103-121"),
    ("وإذا سمعوا", "Al-Ma'idah : 82", "Al-An'am : 110", "122-142"),
    ("ولو أننا", "Al-An'am : 111", "Al-A'raf : 87", "143-162"),
    ("قال الملأ", "Al-A'raf : 88", "Al-Anfal : 40", "163-182"),
    ("واعلموا", "Al-Anfal : 41", "At-Taubah : 92", "183-202"),
    ("يعتذرون", "At-Taubah : 93", "Hud : 5", "203-222"),
    ("وما من دابة", "Hud : 6", "Yusuf : 52", "223-242"),
    ("وما أبرئ", "Yusuf : 53", "Ibrahim : 52", "243-262"),
    ("ربما", "Al-Hijr : 1", "An-Nahl : 128", "263-282"),
    ("سبحان الذي", "Al-Isra : 1", "Al-Kahf : 74", "283-302"),
    ("قال ألم", "Al-Kahf : 75", "Ta Ha : 135", "303-322"),
    ("اقترب للناس", "Al-Anbiya : 1", "Al-Hajj : 78", "323-342"),
    ("قد أفلح", "Al-Mu'minun : 1", "Al-Furqan : 20", "343-362"),
    ("وقال الذين", "Al-Furqan : 21", "An-Naml : 55", "363-382"),
    ("أمن خلق", "An-Naml : 56", "Al-Ankabut : 45", "383-402"),
    ("اتل ما أوحي", "Al-Ankabut : 46", "Al-Ahzab : 30", "403-422"),
    ("ومن يقنت", "Al-Ahzab : 31", "Yasin : 27", "423-442"),
    ("وما لي", "Yasin : 28", "Az-Zumar : 31", "443-462"),
    ("فمن أظلم", "Az-Zumar : 32", "Fussilat : 46", "463-482"),
    ("إليه يرد", "Fussilat : 47", "Al-Jathiyah : 37", "483-502"),
    ("حم", "Al-Ahqaf : 1", "Az-Zariyat : 30", "503-522"),
    ("قال فما خطبكم", "Az-Zariyat : 31", "Al-Hadid : 29", "523-542"),
    ("قد سمع الله", "Al-Mujadila : 1", "At-Tahrim : 12", "543-562"),
    ("تبارك الذي", "Al-Mulk : 1", "Al-Mursalat : 50", "563-582"),
    ("عم", "An-Naba : 1", "An-Nas : 6", "583-604"),
];

pub fn is_valid_section(section_no: u32) -> bool {
    (1..=SECTION_COUNT).contains(&section_no)
}

pub fn section_info(section_no: u32) -> Option<SectionInfo> {
    if !is_valid_section(section_no) {
        return None;
    }
    let (name, start, end, pages) = CATALOG[(section_no - 1) as usize];
    Some(SectionInfo { section_no, name, start, end, pages })
}

pub fn all_sections() -> Vec<SectionInfo> {
    (1..=SECTION_COUNT).filter_map(section_info).collect()
}
