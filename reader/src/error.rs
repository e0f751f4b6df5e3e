//! Error types for the Quran reader

use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuranError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("{0}")]
    Other(String),
}

impl QuranError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, QuranError::NotFound(_))
    }
}

impl serde::Serialize for QuranError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
