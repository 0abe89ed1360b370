//! Site configuration loading and validation.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

/// Translation keys used by the page chrome regardless of which sections are enabled.
pub const PAGE_KEYS: &[&str] = &["site_title", "site_brand", "footer_text"];

/// Validated site configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteConfig {
    /// Language whose page is also written at the output root
    pub default_language: String,

    /// Target of the "view demo" buttons
    pub demo_url: String,

    /// Prefix for language links, relative media and sitemap entries
    pub base_url: String,

    /// Booking link; adds a third hero button when set
    pub calendly_url: Option<String>,

    /// Contact address exposed to templates
    pub contact_email: Option<String>,

    /// Configured languages, in document order
    pub languages: Vec<Language>,

    /// Page sections, in document order
    pub sections: Vec<SectionConfig>,
}

/// A configured site language.
#[derive(Debug, Clone, PartialEq)]
pub struct Language {
    /// Language code (e.g. "en")
    pub code: String,
    /// Display name for the language switcher
    pub name: String,
    /// Sales phone number for this market
    pub phone: String,
}

/// One configured page section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SectionConfig {
    /// Disabled sections render nothing and need no translations
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Section kind and its translation key references
    #[serde(flatten)]
    pub kind: SectionKind,
}

/// The closed set of section kinds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SectionKind {
    Hero(HeroSection),
    #[serde(alias = "features_grid")]
    Features(FeaturesSection),
    #[serde(alias = "testimonials")]
    Testimonial(TestimonialSection),
    Cta(CtaSection),
}

/// Hero banner with headline and call-to-action buttons.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HeroSection {
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default = "default_primary_button")]
    pub primary_button: String,
    #[serde(default = "default_secondary_button")]
    pub secondary_button: String,
    #[serde(default = "default_booking_button")]
    pub booking_button: String,
    /// CSS background value, used verbatim
    #[serde(default)]
    pub gradient: Option<String>,
    #[serde(default, alias = "image")]
    pub media: Option<Media>,
    #[serde(default)]
    pub media_type: MediaType,
}

/// Grid of feature cards.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeaturesSection {
    pub title: String,
    #[serde(default)]
    pub items: Vec<FeatureItem>,
    #[serde(default)]
    pub background: Option<String>,
}

/// A single feature card.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeatureItem {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub bullets: Vec<String>,
    /// Literal glyph shown when the card has no media
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default, alias = "image")]
    pub media: Option<String>,
    #[serde(default)]
    pub media_type: MediaType,
}

/// Customer quotes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TestimonialSection {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub items: Vec<TestimonialItem>,
    #[serde(default)]
    pub background: Option<String>,
}

/// A quote with its attribution.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TestimonialItem {
    pub quote: String,
    pub author: String,
    #[serde(default)]
    pub company: Option<String>,
}

/// Closing call to action.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CtaSection {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub button: String,
    /// Button target; the site demo URL when absent
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
}

/// Media reference: one URL, or a per-language map with an optional `default`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Media {
    Url(String),
    Localized(LocalizedMedia),
}

/// Per-language media URLs with optional intrinsic size.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LocalizedMedia {
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(flatten)]
    pub by_language: BTreeMap<String, String>,
}

impl Media {
    /// URL to use for a language: its own entry, then `default`.
    pub fn url_for(&self, language: &str) -> Option<&str> {
        let url = match self {
            Media::Url(url) => Some(url.as_str()),
            Media::Localized(media) => media
                .by_language
                .get(language)
                .or(media.default.as_ref())
                .map(String::as_str),
        };
        url.filter(|u| !u.is_empty())
    }

    /// Intrinsic width and height, when configured.
    pub fn size(&self) -> (Option<u32>, Option<u32>) {
        match self {
            Media::Url(_) => (None, None),
            Media::Localized(media) => (media.width, media.height),
        }
    }
}

/// Kind of media element to emit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Image,
    Video,
}

/// A language code becomes the `<code>/` output directory, so it must be a
/// single path segment that cannot resolve to the output root or above it.
fn is_valid_language_code(code: &str) -> bool {
    !code.is_empty()
        && code != "."
        && !code.contains("..")
        && !code.contains(['/', '\\'])
}

fn default_true() -> bool {
    true
}
fn default_primary_button() -> String {
    "view_demo".to_string()
}
fn default_secondary_button() -> String {
    "contact_sales".to_string()
}
fn default_booking_button() -> String {
    "book_demo".to_string()
}

/// Configuration as it appears in the document, before validation.
#[derive(Debug, Deserialize)]
struct SiteConfigRaw {
    default_language: String,
    demo_url: String,
    #[serde(default)]
    base_url: String,
    #[serde(default)]
    calendly_url: Option<String>,
    #[serde(default)]
    contact_email: Option<String>,
    languages: Value,
    sections: Value,
}

#[derive(Debug, Deserialize)]
struct LanguageRaw {
    name: String,
    #[serde(default)]
    phone: String,
}

/// Errors that can occur when loading the site configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {message}", .path.display())]
    Read { path: PathBuf, message: String },

    #[error("Failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Invalid `{field}` in {}: {message}", .path.display())]
    Invalid {
        path: PathBuf,
        field: String,
        message: String,
    },
}

impl SiteConfig {
    /// Read and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Self::from_json(path, &content)
    }

    /// Parse and validate configuration text. `path` is only used in error messages.
    pub fn from_json(path: &Path, content: &str) -> Result<Self, ConfigError> {
        let raw: SiteConfigRaw = serde_json::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let invalid = |field: String, message: String| ConfigError::Invalid {
            path: path.to_path_buf(),
            field,
            message,
        };

        let Value::Object(language_map) = raw.languages else {
            return Err(invalid(
                "languages".to_string(),
                "expected an object keyed by language code".to_string(),
            ));
        };

        let mut languages = Vec::with_capacity(language_map.len());
        for (code, value) in language_map {
            if !is_valid_language_code(&code) {
                return Err(invalid(
                    format!("languages.{code}"),
                    "language code must be a non-empty path segment without `/`, `\\` or `..`"
                        .to_string(),
                ));
            }
            let language: LanguageRaw = serde_json::from_value(value)
                .map_err(|e| invalid(format!("languages.{code}"), e.to_string()))?;
            languages.push(Language {
                code,
                name: language.name,
                phone: language.phone,
            });
        }

        if languages.is_empty() {
            return Err(invalid(
                "languages".to_string(),
                "at least one language is required".to_string(),
            ));
        }

        if !languages.iter().any(|l| l.code == raw.default_language) {
            return Err(invalid(
                "default_language".to_string(),
                format!("`{}` is not one of the configured languages", raw.default_language),
            ));
        }

        let Value::Array(section_values) = raw.sections else {
            return Err(invalid(
                "sections".to_string(),
                "expected an array of sections".to_string(),
            ));
        };

        let sections = section_values
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                serde_json::from_value::<SectionConfig>(value)
                    .map_err(|e| invalid(format!("sections[{index}]"), e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            default_language: raw.default_language,
            demo_url: raw.demo_url,
            base_url: raw.base_url.trim_end_matches('/').to_string(),
            calendly_url: raw.calendly_url.filter(|u| !u.is_empty()),
            contact_email: raw.contact_email.filter(|e| !e.is_empty()),
            languages,
            sections,
        })
    }

    /// Look up a configured language by code.
    pub fn language(&self, code: &str) -> Option<&Language> {
        self.languages.iter().find(|l| l.code == code)
    }

    /// Enabled sections, in configured order.
    pub fn enabled_sections(&self) -> impl Iterator<Item = &SectionKind> {
        self.sections.iter().filter(|s| s.enabled).map(|s| &s.kind)
    }

    /// Every translation key the rendered page consumes, deduplicated, in first-use order.
    ///
    /// Disabled sections contribute no keys.
    pub fn referenced_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = PAGE_KEYS.to_vec();

        for section in self.enabled_sections() {
            for key in section.translation_keys(self.calendly_url.is_some()) {
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }

        keys
    }
}

impl SectionKind {
    /// Short name used in logs and markup classes.
    pub fn name(&self) -> &'static str {
        match self {
            SectionKind::Hero(_) => "hero",
            SectionKind::Features(_) => "features",
            SectionKind::Testimonial(_) => "testimonial",
            SectionKind::Cta(_) => "cta",
        }
    }

    /// Translation keys this section looks up. Empty references are skipped.
    pub fn translation_keys(&self, with_booking: bool) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();

        match self {
            SectionKind::Hero(hero) => {
                keys.push(&hero.title);
                keys.extend(hero.subtitle.as_deref());
                keys.push(&hero.primary_button);
                keys.push(&hero.secondary_button);
                if with_booking {
                    keys.push(&hero.booking_button);
                }
            }
            SectionKind::Features(features) => {
                keys.push(&features.title);
                for item in &features.items {
                    keys.push(&item.title);
                    keys.extend(item.description.as_deref());
                    keys.extend(item.bullets.iter().map(String::as_str));
                }
            }
            SectionKind::Testimonial(testimonial) => {
                keys.extend(testimonial.title.as_deref());
                for item in &testimonial.items {
                    keys.push(&item.quote);
                    keys.push(&item.author);
                    keys.extend(item.company.as_deref());
                }
            }
            SectionKind::Cta(cta) => {
                keys.push(&cta.title);
                keys.extend(cta.description.as_deref());
                keys.push(&cta.button);
            }
        }

        keys.retain(|k| !k.is_empty());
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(json: &str) -> Result<SiteConfig, ConfigError> {
        SiteConfig::from_json(Path::new("config.json"), json)
    }

    const CONFIG: &str = r#"{
        "default_language": "en",
        "demo_url": "https://demo.example.com",
        "languages": {
            "en": { "name": "English", "phone": "+1 555 0100" },
            "de": { "name": "Deutsch", "phone": "+49 30 1234" }
        },
        "sections": [
            { "type": "hero", "title": "hero_title", "subtitle": "hero_subtitle" },
            { "type": "testimonial", "enabled": false,
              "items": [{ "quote": "quote_1", "author": "author_1" }] },
            { "type": "cta", "title": "cta_title", "button": "cta_button" }
        ]
    }"#;

    #[test]
    fn parses_valid_config() {
        let config = parse(CONFIG).unwrap();

        assert_eq!(config.default_language, "en");
        assert_eq!(config.base_url, "");
        assert_eq!(
            config
                .languages
                .iter()
                .map(|l| l.code.as_str())
                .collect::<Vec<_>>(),
            vec!["en", "de"]
        );
        assert_eq!(config.language("de").unwrap().phone, "+49 30 1234");
        assert_eq!(config.sections.len(), 3);
        assert!(!config.sections[1].enabled);

        let SectionKind::Hero(hero) = &config.sections[0].kind else {
            panic!("expected hero");
        };
        assert_eq!(hero.primary_button, "view_demo");
        assert_eq!(hero.media_type, MediaType::Image);
    }

    #[test]
    fn referenced_keys_skip_disabled_sections() {
        let config = parse(CONFIG).unwrap();

        assert_eq!(
            config.referenced_keys(),
            vec![
                "site_title",
                "site_brand",
                "footer_text",
                "hero_title",
                "hero_subtitle",
                "view_demo",
                "contact_sales",
                "cta_title",
                "cta_button",
            ]
        );
    }

    #[test]
    fn booking_button_key_requires_calendly() {
        let json = CONFIG.replace(
            r#""demo_url""#,
            r#""calendly_url": "https://calendly.com/acme", "demo_url""#,
        );
        let config = parse(&json).unwrap();

        assert!(config.referenced_keys().contains(&"book_demo"));
        assert!(!parse(CONFIG).unwrap().referenced_keys().contains(&"book_demo"));
    }

    #[test]
    fn accepts_legacy_section_names() {
        let json = r#"{
            "default_language": "en",
            "demo_url": "",
            "languages": { "en": { "name": "English" } },
            "sections": [
                { "type": "features_grid", "title": "t", "items": [{ "title": "a", "bullets": ["b1"] }] },
                { "type": "testimonials", "items": [] }
            ]
        }"#;

        let config = parse(json).unwrap();

        assert_eq!(config.sections[0].kind.name(), "features");
        assert_eq!(config.sections[1].kind.name(), "testimonial");
    }

    #[test]
    fn errors_on_missing_default_language() {
        let json = r#"{ "demo_url": "", "languages": {}, "sections": [] }"#;

        let err = parse(json).unwrap_err();

        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("default_language"));
    }

    #[test]
    fn errors_on_unknown_default_language() {
        let json = CONFIG.replace(r#""default_language": "en""#, r#""default_language": "fr""#);

        let err = parse(&json).unwrap_err();

        assert!(
            matches!(err, ConfigError::Invalid { ref field, .. } if field == "default_language")
        );
    }

    #[test]
    fn errors_on_language_codes_that_are_not_path_segments() {
        for code in ["", ".", "..", "../x", "en/us", "en\\us"] {
            let json = format!(
                r#"{{
                    "default_language": "en",
                    "demo_url": "",
                    "languages": {{
                        "en": {{ "name": "English" }},
                        "{}": {{ "name": "Other" }}
                    }},
                    "sections": []
                }}"#,
                code.replace('\\', "\\\\")
            );

            let err = parse(&json).unwrap_err();

            assert!(
                matches!(err, ConfigError::Invalid { ref field, .. } if *field == format!("languages.{code}")),
                "code {code:?} should be rejected, got {err}"
            );
        }

        assert!(is_valid_language_code("pt-BR"));
    }

    #[test]
    fn errors_when_sections_is_not_an_array() {
        let json = r#"{
            "default_language": "en",
            "demo_url": "",
            "languages": { "en": { "name": "English" } },
            "sections": { "type": "hero" }
        }"#;

        let err = parse(json).unwrap_err();

        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "sections"));
    }

    #[test]
    fn errors_on_section_without_type() {
        let json = r#"{
            "default_language": "en",
            "demo_url": "",
            "languages": { "en": { "name": "English" } },
            "sections": [{ "title": "hero_title" }]
        }"#;

        let err = parse(json).unwrap_err();

        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "sections[0]"));
        assert!(err.to_string().contains("type"));
    }

    #[test]
    fn errors_on_unknown_section_type() {
        let json = r#"{
            "default_language": "en",
            "demo_url": "",
            "languages": { "en": { "name": "English" } },
            "sections": [{ "type": "carousel" }]
        }"#;

        let err = parse(json).unwrap_err();

        assert!(err.to_string().contains("carousel"));
    }

    #[test]
    fn resolves_localized_media() {
        let media: Media = serde_json::from_str(
            r#"{ "de": "/img/de.png", "default": "/img/en.png", "width": 640 }"#,
        )
        .unwrap();

        assert_eq!(media.url_for("de"), Some("/img/de.png"));
        assert_eq!(media.url_for("fr"), Some("/img/en.png"));
        assert_eq!(media.size(), (Some(640), None));

        let single = Media::Url("/img/hero.png".to_string());
        assert_eq!(single.url_for("de"), Some("/img/hero.png"));
    }
}
