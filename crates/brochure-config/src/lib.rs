//! Site configuration and translation loading.
//!
//! This crate reads the `config.json` site description and the per-language
//! translation files, and resolves translation keys with default-language fallback.

pub mod site;
pub mod translations;

pub use site::{
    ConfigError, CtaSection, FeatureItem, FeaturesSection, HeroSection, Language, LocalizedMedia,
    Media, MediaType, SectionConfig, SectionKind, SiteConfig, TestimonialItem,
    TestimonialSection, PAGE_KEYS,
};
pub use translations::{MissingKey, TranslationError, TranslationSet, TranslationStore, Translator};
