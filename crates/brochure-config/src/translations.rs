//! Per-language translation files and key lookup.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::site::SiteConfig;

/// Localized strings for one language.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationSet {
    entries: BTreeMap<String, String>,
}

impl TranslationSet {
    /// Parse a flat JSON object of string values. `path` is only used in error messages.
    pub fn from_json(path: &Path, content: &str) -> Result<Self, TranslationError> {
        let malformed = |message: String| TranslationError::Malformed {
            path: path.to_path_buf(),
            message,
        };

        let value: Value = serde_json::from_str(content).map_err(|e| malformed(e.to_string()))?;
        let Value::Object(map) = value else {
            return Err(malformed(
                "expected an object mapping keys to strings".to_string(),
            ));
        };

        let mut entries = BTreeMap::new();
        for (key, value) in map {
            match value {
                Value::String(text) => {
                    entries.insert(key, text);
                }
                other => {
                    return Err(malformed(format!(
                        "value for `{key}` must be a string, found {other}"
                    )));
                }
            }
        }

        Ok(Self { entries })
    }

    /// Localized value for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TranslationSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A key that a language does not define.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingKey {
    /// Language lacking the key
    pub language: String,
    /// The missing translation key
    pub key: String,
    /// Whether the default language supplied the value
    pub fallback: bool,
}

impl fmt::Display for MissingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` has no translation for `{}`", self.language, self.key)?;
        if self.fallback {
            write!(f, " (using default language value)")
        } else {
            write!(f, " (rendered empty)")
        }
    }
}

/// Errors that can occur when loading translations.
#[derive(Debug, thiserror::Error)]
pub enum TranslationError {
    #[error("No translation file for language `{language}`: {} not found", .path.display())]
    Missing { language: String, path: PathBuf },

    #[error("Failed to read {}: {message}", .path.display())]
    Read { path: PathBuf, message: String },

    #[error("Malformed translation file {}: {message}", .path.display())]
    Malformed { path: PathBuf, message: String },
}

/// Translation sets for every configured language.
#[derive(Debug, Clone)]
pub struct TranslationStore {
    default_language: String,
    sets: BTreeMap<String, TranslationSet>,
}

impl TranslationStore {
    /// Load `<dir>/<code>.json` for every language in the configuration.
    ///
    /// Files for languages the configuration does not list are ignored.
    pub fn load(dir: &Path, config: &SiteConfig) -> Result<Self, TranslationError> {
        let mut sets = BTreeMap::new();

        for language in &config.languages {
            let path = dir.join(format!("{}.json", language.code));
            if !path.is_file() {
                return Err(TranslationError::Missing {
                    language: language.code.clone(),
                    path,
                });
            }

            let content = fs::read_to_string(&path).map_err(|e| TranslationError::Read {
                path: path.clone(),
                message: e.to_string(),
            })?;
            let set = TranslationSet::from_json(&path, &content)?;
            if set.is_empty() {
                tracing::warn!("{} has no translations", path.display());
            }

            tracing::debug!(
                "Loaded {} translations for `{}` from {}",
                set.len(),
                language.code,
                path.display()
            );
            sets.insert(language.code.clone(), set);
        }

        Ok(Self {
            default_language: config.default_language.clone(),
            sets,
        })
    }

    /// Build a store from already-parsed sets.
    pub fn from_sets(
        default_language: impl Into<String>,
        sets: impl IntoIterator<Item = (String, TranslationSet)>,
    ) -> Self {
        Self {
            default_language: default_language.into(),
            sets: sets.into_iter().collect(),
        }
    }

    /// Translation set for a language code.
    pub fn get(&self, language: &str) -> Option<&TranslationSet> {
        self.sets.get(language)
    }

    /// Lookup view for one language, falling back to the default language.
    pub fn translator<'a>(&'a self, language: &'a str) -> Translator<'a> {
        let fallback = if language == self.default_language {
            None
        } else {
            self.sets.get(&self.default_language)
        };

        Translator {
            language,
            set: self.sets.get(language),
            fallback,
            missing: Vec::new(),
        }
    }

    /// Every key referenced by the configuration that a language does not define.
    ///
    /// Reported in language order, then key order.
    pub fn missing_keys(&self, config: &SiteConfig) -> Vec<MissingKey> {
        let keys = config.referenced_keys();
        let default_set = self.sets.get(&self.default_language);

        let mut missing = Vec::new();
        for language in &config.languages {
            let set = self.sets.get(&language.code);
            for key in &keys {
                if set.is_some_and(|s| s.contains(key)) {
                    continue;
                }
                let fallback = language.code != self.default_language
                    && default_set.is_some_and(|s| s.contains(key));
                missing.push(MissingKey {
                    language: language.code.clone(),
                    key: key.to_string(),
                    fallback,
                });
            }
        }

        missing
    }
}

/// Key lookup for a single language that records the keys it could not resolve.
#[derive(Debug)]
pub struct Translator<'a> {
    language: &'a str,
    set: Option<&'a TranslationSet>,
    fallback: Option<&'a TranslationSet>,
    missing: Vec<MissingKey>,
}

impl<'a> Translator<'a> {
    /// Resolve a key: own value, then default language value, then empty.
    ///
    /// Every unresolved key is recorded once. An empty key resolves to an empty string.
    pub fn translate(&mut self, key: &str) -> String {
        if key.is_empty() {
            return String::new();
        }

        if let Some(value) = self.set.and_then(|s| s.get(key)) {
            return value.to_string();
        }

        let fallback = self.fallback.and_then(|s| s.get(key));
        if !self.missing.iter().any(|m| m.key == key) {
            tracing::warn!(
                "Missing translation `{}` for `{}`{}",
                key,
                self.language,
                if fallback.is_some() {
                    ", using default language"
                } else {
                    ""
                }
            );
            self.missing.push(MissingKey {
                language: self.language.to_string(),
                key: key.to_string(),
                fallback: fallback.is_some(),
            });
        }

        fallback.unwrap_or_default().to_string()
    }

    /// Translate an optional key reference.
    pub fn translate_opt(&mut self, key: Option<&str>) -> String {
        key.map(|k| self.translate(k)).unwrap_or_default()
    }

    /// Keys that could not be resolved so far.
    pub fn missing(&self) -> &[MissingKey] {
        &self.missing
    }

    pub fn into_missing(self) -> Vec<MissingKey> {
        self.missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn store() -> TranslationStore {
        TranslationStore::from_sets(
            "en",
            [
                (
                    "en".to_string(),
                    TranslationSet::from_iter([("hero_title", "Run your business"), ("only_en", "Hi")]),
                ),
                (
                    "de".to_string(),
                    TranslationSet::from_iter([("hero_title", "Führen Sie Ihr Unternehmen")]),
                ),
            ],
        )
    }

    fn config() -> SiteConfig {
        SiteConfig::from_json(
            Path::new("config.json"),
            r#"{
                "default_language": "en",
                "demo_url": "",
                "languages": { "en": { "name": "English" }, "de": { "name": "Deutsch" } },
                "sections": [
                    { "type": "cta", "title": "hero_title", "button": "only_en" },
                    { "type": "cta", "enabled": false, "title": "disabled_title", "button": "x" }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn translates_own_value() {
        let store = store();
        let mut t = store.translator("de");

        assert_eq!(t.translate("hero_title"), "Führen Sie Ihr Unternehmen");
        assert!(t.missing().is_empty());
    }

    #[test]
    fn falls_back_to_default_language() {
        let store = store();
        let mut t = store.translator("de");

        assert_eq!(t.translate("only_en"), "Hi");
        assert_eq!(
            t.into_missing(),
            vec![MissingKey {
                language: "de".to_string(),
                key: "only_en".to_string(),
                fallback: true,
            }]
        );
    }

    #[test]
    fn renders_empty_when_no_language_has_key() {
        let store = store();
        let mut t = store.translator("de");

        assert_eq!(t.translate("nowhere"), "");
        assert_eq!(t.translate("nowhere"), "");
        assert_eq!(t.missing().len(), 1);
        assert!(!t.missing()[0].fallback);
    }

    #[test]
    fn default_language_does_not_fall_back_to_itself() {
        let store = store();
        let mut t = store.translator("en");

        assert_eq!(t.translate("nowhere"), "");
        assert!(!t.missing()[0].fallback);
    }

    #[test]
    fn empty_key_is_not_a_miss() {
        let store = store();
        let mut t = store.translator("de");

        assert_eq!(t.translate(""), "");
        assert_eq!(t.translate_opt(None), "");
        assert!(t.missing().is_empty());
    }

    #[test]
    fn reports_missing_keys_for_enabled_sections() {
        let store = store();
        let missing = store.missing_keys(&config());

        let pairs: Vec<(&str, &str, bool)> = missing
            .iter()
            .map(|m| (m.language.as_str(), m.key.as_str(), m.fallback))
            .collect();

        assert_eq!(
            pairs,
            vec![
                ("en", "site_title", false),
                ("en", "site_brand", false),
                ("en", "footer_text", false),
                ("de", "site_title", false),
                ("de", "site_brand", false),
                ("de", "footer_text", false),
                ("de", "only_en", true),
            ]
        );
    }

    #[test]
    fn loads_configured_languages() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("en.json"), r#"{ "hero_title": "Hello" }"#).unwrap();
        fs::write(temp.path().join("de.json"), r#"{ "hero_title": "Hallo" }"#).unwrap();
        fs::write(temp.path().join("fr.json"), r#"{ "hero_title": "Bonjour" }"#).unwrap();

        let store = TranslationStore::load(temp.path(), &config()).unwrap();

        assert_eq!(store.get("de").unwrap().get("hero_title"), Some("Hallo"));
        assert!(store.get("fr").is_none());
    }

    #[test]
    fn loads_empty_translation_file() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("en.json"), r#"{ "hero_title": "Hello" }"#).unwrap();
        fs::write(temp.path().join("de.json"), "{}").unwrap();

        let store = TranslationStore::load(temp.path(), &config()).unwrap();

        assert!(store.get("de").unwrap().is_empty());
        assert_eq!(store.get("en").unwrap().len(), 1);
        assert_eq!(store.translator("de").translate("hero_title"), "Hello");
    }

    #[test]
    fn errors_on_missing_language_file() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("en.json"), "{}").unwrap();

        let err = TranslationStore::load(temp.path(), &config()).unwrap_err();

        assert!(matches!(err, TranslationError::Missing { ref language, .. } if language == "de"));
    }

    #[test]
    fn errors_on_non_string_value() {
        let err = TranslationSet::from_json(Path::new("en.json"), r#"{ "count": 3 }"#).unwrap_err();

        assert!(matches!(err, TranslationError::Malformed { .. }));
        assert!(err.to_string().contains("count"));
    }

    #[test]
    fn errors_on_invalid_json() {
        let err = TranslationSet::from_json(Path::new("en.json"), "[1, 2").unwrap_err();

        assert!(matches!(err, TranslationError::Malformed { .. }));
    }
}
