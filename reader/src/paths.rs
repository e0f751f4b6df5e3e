//! Location of client-local data

use std::path::PathBuf;

pub const DATA_DIR_ENV: &str = "QURAN_READER_DATA_DIR";

/// Get the data directory
///
/// - `QURAN_READER_DATA_DIR` when set
/// - otherwise the platform data directory (`~/.local/share/QuranReader`,
///   `~/Library/Application Support/QuranReader`, `%APPDATA%\QuranReader`)
/// - `./data` as a last resort
pub fn get_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }

    if let Some(data_dir) = dirs::data_dir() {
        return data_dir.join("QuranReader");
    }

    tracing::warn!("No platform data directory, falling back to ./data");
    PathBuf::from("data")
}

/// Settings database (bookmarks and preferences) inside the data directory.
pub fn get_settings_db_path() -> PathBuf {
    get_data_dir().join("settings.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_db_lives_in_data_dir() {
        let path = get_settings_db_path();
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("settings.db"));
        assert_eq!(path.parent().map(PathBuf::from), Some(get_data_dir()));
    }
}
