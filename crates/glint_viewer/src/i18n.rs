//! UI string tables.
//!
//! A language is one JSON object of key -> text. The table is loaded into
//! an explicit context owned by the session and passed to the panels;
//! switching language is just loading a new context. Missing keys fall
//! back to the key itself so untranslated strings stay visible rather
//! than vanishing.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};

pub const LANGUAGES_DIR: &str = "i18n";
pub const DEFAULT_LANGUAGE: &str = "English";

pub struct I18n {
    language: String,
    entries: HashMap<String, String>,
}

impl I18n {
    /// Load `<dir>/<language>.json`.
    pub fn load_from_dir(dir: impl AsRef<Path>, language: &str) -> Result<Self> {
        let path = dir.as_ref().join(format!("{language}.json"));
        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("reading language file {}", path.display()))?;
        let entries: HashMap<String, String> = serde_json::from_str(&json)
            .with_context(|| format!("parsing language file {}", path.display()))?;
        log::info!("Loaded {} strings for language '{language}'", entries.len());
        Ok(Self {
            language: language.to_string(),
            entries,
        })
    }

    pub fn load(language: &str) -> Result<Self> {
        Self::load_from_dir(LANGUAGES_DIR, language)
    }

    /// Empty table; every lookup falls back to the key.
    pub fn fallback() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            entries: HashMap::new(),
        }
    }

    pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
        self.entries.get(key).map(String::as_str).unwrap_or(key)
    }

    pub fn language(&self) -> &str {
        &self.language
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_and_fallback() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("Test.json"),
            r#"{ "menu.file": "File", "menu.help": "Help" }"#,
        )
        .unwrap();

        let i18n = I18n::load_from_dir(dir.path(), "Test").unwrap();
        assert_eq!(i18n.language(), "Test");
        assert_eq!(i18n.get("menu.file"), "File");
        // Unknown keys surface as themselves.
        assert_eq!(i18n.get("menu.missing"), "menu.missing");
    }

    #[test]
    fn test_missing_language_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(I18n::load_from_dir(dir.path(), "Nope").is_err());
    }

    #[test]
    fn test_malformed_table_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Bad.json"), "[1, 2]").unwrap();
        assert!(I18n::load_from_dir(dir.path(), "Bad").is_err());
    }
}
