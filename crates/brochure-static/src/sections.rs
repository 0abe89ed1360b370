//! Section composition: one markup fragment per enabled section.

use brochure_config::{
    CtaSection, FeaturesSection, HeroSection, Language, MediaType, SectionKind, SiteConfig,
    TestimonialSection, Translator,
};
use minijinja::context;
use serde::Serialize;

use crate::templates::{RenderError, TemplateEngine};

/// A resolved media element.
#[derive(Debug, Clone, Serialize)]
struct MediaContext {
    url: String,
    video: bool,
    size_attrs: String,
}

#[derive(Debug, Clone, Serialize)]
struct ButtonContext {
    href: String,
    class: &'static str,
    label: String,
}

#[derive(Debug, Clone, Serialize)]
struct FeatureContext {
    title: String,
    description: String,
    bullets: Vec<String>,
    icon: String,
    media: Option<MediaContext>,
}

#[derive(Debug, Clone, Serialize)]
struct TestimonialContext {
    quote: String,
    author: String,
    company: String,
}

/// Renders the configured sections for one language.
pub struct SectionComposer<'a> {
    templates: &'a TemplateEngine,
    config: &'a SiteConfig,
    language: &'a Language,
}

impl<'a> SectionComposer<'a> {
    pub fn new(templates: &'a TemplateEngine, config: &'a SiteConfig, language: &'a Language) -> Self {
        Self {
            templates,
            config,
            language,
        }
    }

    /// Render every enabled section in configured order.
    pub fn compose(&self, t: &mut Translator<'_>) -> Result<Vec<String>, RenderError> {
        self.config
            .enabled_sections()
            .map(|section| self.render_section(section, t))
            .collect()
    }

    /// Render a single section.
    pub fn render_section(
        &self,
        section: &SectionKind,
        t: &mut Translator<'_>,
    ) -> Result<String, RenderError> {
        match section {
            SectionKind::Hero(hero) => self.hero(hero, t),
            SectionKind::Features(features) => self.features(features, t),
            SectionKind::Testimonial(testimonial) => self.testimonial(testimonial, t),
            SectionKind::Cta(cta) => self.cta(cta, t),
        }
    }

    fn hero(&self, hero: &HeroSection, t: &mut Translator<'_>) -> Result<String, RenderError> {
        let mut buttons = vec![
            ButtonContext {
                href: self.config.demo_url.clone(),
                class: "btn-primary",
                label: t.translate(&hero.primary_button),
            },
            ButtonContext {
                href: format!("tel:{}", self.language.phone),
                class: "btn-secondary",
                label: t.translate(&hero.secondary_button),
            },
        ];

        if let Some(calendly_url) = &self.config.calendly_url {
            buttons.push(ButtonContext {
                href: calendly_url.clone(),
                class: "btn-primary",
                label: t.translate(&hero.booking_button),
            });
        }

        let media = hero.media.as_ref().and_then(|media| {
            let url = media.url_for(&self.language.code)?;
            let (width, height) = media.size();
            Some(MediaContext {
                url: self.resolve_url(url),
                video: hero.media_type == MediaType::Video,
                size_attrs: size_attrs(width, height),
            })
        });

        self.templates.render_section(
            "hero",
            context! {
                title => t.translate(&hero.title),
                subtitle => t.translate_opt(hero.subtitle.as_deref()),
                gradient => hero.gradient,
                buttons => buttons,
                media => media,
            },
        )
    }

    fn features(
        &self,
        features: &FeaturesSection,
        t: &mut Translator<'_>,
    ) -> Result<String, RenderError> {
        let items: Vec<FeatureContext> = features
            .items
            .iter()
            .map(|item| FeatureContext {
                title: t.translate(&item.title),
                description: t.translate_opt(item.description.as_deref()),
                bullets: item.bullets.iter().map(|b| t.translate(b)).collect(),
                icon: item.icon.clone().unwrap_or_else(|| "●".to_string()),
                media: item
                    .media
                    .as_deref()
                    .filter(|m| !m.is_empty())
                    .map(|url| MediaContext {
                        url: self.resolve_url(url),
                        video: item.media_type == MediaType::Video,
                        size_attrs: String::new(),
                    }),
            })
            .collect();

        let grid_2_1 = features.items.iter().any(|item| !item.bullets.is_empty());

        self.templates.render_section(
            "features",
            context! {
                title => t.translate(&features.title),
                items => items,
                grid_2_1 => grid_2_1,
                background => features.background,
            },
        )
    }

    fn testimonial(
        &self,
        testimonial: &TestimonialSection,
        t: &mut Translator<'_>,
    ) -> Result<String, RenderError> {
        let items: Vec<TestimonialContext> = testimonial
            .items
            .iter()
            .map(|item| TestimonialContext {
                quote: t.translate(&item.quote),
                author: t.translate(&item.author),
                company: t.translate_opt(item.company.as_deref()),
            })
            .collect();

        self.templates.render_section(
            "testimonial",
            context! {
                title => t.translate_opt(testimonial.title.as_deref()),
                items => items,
                background => testimonial.background,
            },
        )
    }

    fn cta(&self, cta: &CtaSection, t: &mut Translator<'_>) -> Result<String, RenderError> {
        let href = cta
            .href
            .as_deref()
            .map(|href| self.resolve_url(href))
            .unwrap_or_else(|| self.config.demo_url.clone());

        self.templates.render_section(
            "cta",
            context! {
                title => t.translate(&cta.title),
                description => t.translate_opt(cta.description.as_deref()),
                button => t.translate(&cta.button),
                href => href,
                background => cta.background,
            },
        )
    }

    /// Prefix site-relative URLs with the base URL.
    fn resolve_url(&self, url: &str) -> String {
        if url.starts_with("http://")
            || url.starts_with("https://")
            || url.starts_with("//")
            || url.starts_with("mailto:")
            || url.starts_with("tel:")
            || url.starts_with('#')
        {
            url.to_string()
        } else {
            format!("{}{}", self.config.base_url, url)
        }
    }
}

/// ` width="…" height="…"` attributes for the configured dimensions.
fn size_attrs(width: Option<u32>, height: Option<u32>) -> String {
    let mut attrs = String::new();
    if let Some(width) = width {
        attrs.push_str(&format!(r#" width="{width}""#));
    }
    if let Some(height) = height {
        attrs.push_str(&format!(r#" height="{height}""#));
    }
    attrs
}
