//! Display preferences: dark mode and font-size level

use crate::error::QuranError;
use crate::local_store::LocalStore;
use serde::{Deserialize, Serialize};

const DARK_MODE_KEY: &str = "darkMode";
const FONT_SIZE_KEY: &str = "fontSize";

/// Font-size level, always within 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct FontSize(u8);

impl FontSize {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(level: u8) -> Result<Self, QuranError> {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Ok(Self(level))
        } else {
            Err(QuranError::InvalidInput(format!(
                "font size {} outside {}..={}",
                level,
                Self::MIN,
                Self::MAX
            )))
        }
    }

    pub fn level(&self) -> u8 {
        self.0
    }

    pub fn larger(self) -> Self {
        Self(self.0.saturating_add(1).min(Self::MAX))
    }

    pub fn smaller(self) -> Self {
        Self(self.0.saturating_sub(1).max(Self::MIN))
    }
}

impl Default for FontSize {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<u8> for FontSize {
    type Error = QuranError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

impl From<FontSize> for u8 {
    fn from(size: FontSize) -> u8 {
        size.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preferences {
    pub dark_mode: bool,
    pub font_size: FontSize,
}

impl Preferences {
    /// Read stored preferences; missing or unreadable values fall back to defaults.
    pub fn load(store: &dyn LocalStore) -> Result<Self, QuranError> {
        let defaults = Self::default();

        let dark_mode = match store.get_setting(DARK_MODE_KEY)?.as_deref() {
            Some("true") => true,
            Some("false") | None => false,
            Some(other) => {
                tracing::warn!("Ignoring stored darkMode value {:?}", other);
                defaults.dark_mode
            }
        };

        let font_size = match store.get_setting(FONT_SIZE_KEY)? {
            None => defaults.font_size,
            Some(raw) => match raw.parse::<u8>().map_err(|e| e.to_string()).and_then(|n| {
                FontSize::new(n).map_err(|e| e.to_string())
            }) {
                Ok(size) => size,
                Err(e) => {
                    tracing::warn!("Ignoring stored fontSize {:?}: {}", raw, e);
                    defaults.font_size
                }
            },
        };

        Ok(Self { dark_mode, font_size })
    }

    /// Write both keys in one batch.
    pub fn save(&self, store: &dyn LocalStore) -> Result<(), QuranError> {
        let font_size = self.font_size.level().to_string();
        store.set_settings(&[
            (DARK_MODE_KEY, if self.dark_mode { "true" } else { "false" }),
            (FONT_SIZE_KEY, font_size.as_str()),
        ])
    }
}
