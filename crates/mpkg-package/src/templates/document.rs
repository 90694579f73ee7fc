//! A text document paired with the language its comment slots use.

use super::language::Language;
use crate::error::{Error, Result};
use camino::Utf8Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    text: String,
    language: Language,
}

impl Document {
    pub fn new(text: impl Into<String>, language: Language) -> Self {
        Self {
            text: text.into(),
            language,
        }
    }

    /// Read a document, inferring its language from the file extension
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::read_failure(path, e))?;
        Ok(Self::new(text, Language::from_path(path)))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn into_text(self) -> String {
        self.text
    }
}
