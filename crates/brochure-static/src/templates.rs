//! Template engine for rendering pages and sections.

use minijinja::{AutoEscape, Environment};
use serde::Serialize;

/// Placeholder the section markup is inserted at.
pub const CONTENT_PLACEHOLDER: &str = "CONTENT";

/// Placeholders the page skeleton may use, as `{{NAME}}`.
const PAGE_PLACEHOLDERS: [&str; 11] = [
    "TITLE",
    "LANG",
    "LANG_NAME",
    "BASE_URL",
    "NAV_TITLE",
    "PHONE",
    "DEMO_URL",
    "CONTACT_EMAIL",
    "LANG_SWITCHER",
    CONTENT_PLACEHOLDER,
    "FOOTER_TEXT",
];

/// Values substituted into the page skeleton.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    /// Site title (`site_title` translation)
    pub title: String,
    /// Language code
    pub lang: String,
    /// Language display name
    pub lang_name: String,
    /// Site base URL, without trailing slash
    pub base_url: String,
    /// Brand shown in the header (`site_brand` translation)
    pub nav_title: String,
    /// Sales phone number for the language
    pub phone: String,
    /// Demo link
    pub demo_url: String,
    /// Contact address, empty when not configured
    pub contact_email: String,
    /// Links to every language version
    pub lang_switcher: String,
    /// Rendered section markup
    pub content: String,
    /// Footer text (`footer_text` translation)
    pub footer_text: String,
}

impl PageContext {
    fn value(&self, placeholder: &str) -> Option<&str> {
        let value = match placeholder {
            "TITLE" => &self.title,
            "LANG" => &self.lang,
            "LANG_NAME" => &self.lang_name,
            "BASE_URL" => &self.base_url,
            "NAV_TITLE" => &self.nav_title,
            "PHONE" => &self.phone,
            "DEMO_URL" => &self.demo_url,
            "CONTACT_EMAIL" => &self.contact_email,
            "LANG_SWITCHER" => &self.lang_switcher,
            "CONTENT" => &self.content,
            "FOOTER_TEXT" => &self.footer_text,
            _ => return None,
        };
        Some(value)
    }
}

/// Errors that can occur while preparing or rendering templates.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Page template has no `{{{{{0}}}}}` insertion point")]
    MissingInsertionPoint(&'static str),

    #[error("Invalid section template: {0}")]
    Template(String),

    #[error("Failed to render {name}: {message}")]
    Render { name: String, message: String },
}

/// Template engine.
///
/// The page skeleton is plain HTML: only `{{NAME}}` placeholders are
/// replaced, so inline CSS and scripts pass through untouched. The built-in
/// section templates are compiled with minijinja. Values are inserted
/// verbatim: translations are trusted markup.
pub struct TemplateEngine {
    page: String,
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create an engine around a page skeleton.
    ///
    /// Fails if the skeleton never references `{{CONTENT}}`. Unknown
    /// placeholders are kept as written and logged.
    pub fn new(page_source: impl Into<String>) -> Result<Self, RenderError> {
        let page = page_source.into();

        let names = placeholders(&page);
        if !names.contains(&CONTENT_PLACEHOLDER) {
            return Err(RenderError::MissingInsertionPoint(CONTENT_PLACEHOLDER));
        }
        for name in unknown_placeholders(&names) {
            tracing::warn!(
                "Page template uses unknown placeholder `{{{{{name}}}}}`; it is left as written"
            );
        }

        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);

        for (name, source) in SECTION_TEMPLATES {
            env.add_template(name, source)
                .map_err(|e| RenderError::Template(format!("{name}: {e}")))?;
        }

        Ok(Self { page, env })
    }

    /// Render the page skeleton in a single pass, so inserted values are
    /// never scanned for placeholders themselves.
    pub fn render_page(&self, context: &PageContext) -> String {
        let mut out = String::with_capacity(self.page.len() + context.content.len());
        let mut rest = self.page.as_str();

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let tail = &rest[start..];
            match placeholder_at(tail) {
                Some(name) => {
                    let token = &tail[..name.len() + 4];
                    out.push_str(context.value(name).unwrap_or(token));
                    rest = &tail[token.len()..];
                }
                None => {
                    out.push('{');
                    rest = &tail[1..];
                }
            }
        }
        out.push_str(rest);

        out
    }

    /// Render one of the built-in section templates.
    pub fn render_section<S: Serialize>(&self, name: &str, context: S) -> Result<String, RenderError> {
        let name = format!("sections/{name}.html");
        let render_error = |e: minijinja::Error| RenderError::Render {
            name: name.clone(),
            message: e.to_string(),
        };

        self.env
            .get_template(&name)
            .map_err(render_error)?
            .render(context)
            .map_err(render_error)
    }
}

/// Name of the `{{NAME}}` token at the start of `source`, if there is one.
fn placeholder_at(source: &str) -> Option<&str> {
    let inner = source.strip_prefix("{{")?;
    let len = inner
        .bytes()
        .take_while(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || *b == b'_')
        .count();

    (len > 0 && inner[len..].starts_with("}}")).then(|| &inner[..len])
}

/// Every `{{NAME}}` token in `source`, in order of appearance.
fn placeholders(source: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = source;

    while let Some(start) = rest.find("{{") {
        let tail = &rest[start..];
        match placeholder_at(tail) {
            Some(name) => {
                names.push(name);
                rest = &tail[name.len() + 4..];
            }
            None => rest = &tail[1..],
        }
    }

    names
}

fn unknown_placeholders<'a>(names: &[&'a str]) -> Vec<&'a str> {
    let mut unknown: Vec<&str> = names
        .iter()
        .copied()
        .filter(|name| !PAGE_PLACEHOLDERS.contains(name))
        .collect();
    unknown.sort_unstable();
    unknown.dedup();
    unknown
}

const SECTION_TEMPLATES: [(&str, &str); 4] = [
    ("sections/hero.html", HERO_TEMPLATE),
    ("sections/features.html", FEATURES_TEMPLATE),
    ("sections/testimonial.html", TESTIMONIAL_TEMPLATE),
    ("sections/cta.html", CTA_TEMPLATE),
];

const HERO_TEMPLATE: &str = r##"<section class="hero"{% if gradient %} style="background: {{ gradient }};"{% endif %}>
  <div class="container">
    <div class="hero-content">
      <h1>{{ title }}</h1>
      {% if subtitle %}
      <p class="hero-subtitle">{{ subtitle }}</p>
      {% endif %}
      <div class="cta-buttons">
        {% for button in buttons %}
        <a href="{{ button.href }}" class="btn {{ button.class }}">{{ button.label }}</a>
        {% endfor %}
      </div>
    </div>
    {% if media %}
    <div class="hero-image-wrapper">
      {% if media.video %}
      <video src="{{ media.url }}" class="hero-video" autoplay loop muted playsinline{{ media.size_attrs }}></video>
      {% else %}
      <img src="{{ media.url }}" alt="{{ title }}" class="hero-image"{{ media.size_attrs }}>
      {% endif %}
    </div>
    {% endif %}
  </div>
</section>
"##;

const FEATURES_TEMPLATE: &str = r##"<section class="features-section{% if background %} section-has-background{% endif %}"{% if background %} style="background: {{ background }};"{% endif %}>
  <div class="container">
    <h2>{{ title }}</h2>
    <div class="features-grid{% if grid_2_1 %} grid-2-1{% endif %}">
      {% for item in items %}
      <div class="feature-card">
        {% if item.media %}
        {% if item.media.video %}
        <video src="{{ item.media.url }}" class="feature-video" autoplay loop muted playsinline></video>
        {% else %}
        <img src="{{ item.media.url }}" alt="{{ item.title }}" class="feature-image">
        {% endif %}
        {% else %}
        <div class="feature-icon">{{ item.icon }}</div>
        {% endif %}
        <h3>{{ item.title }}</h3>
        {% if item.description %}
        <p>{{ item.description }}</p>
        {% endif %}
        {% if item.bullets %}
        <ul>
          {% for bullet in item.bullets %}
          <li>{{ bullet }}</li>
          {% endfor %}
        </ul>
        {% endif %}
      </div>
      {% endfor %}
    </div>
  </div>
</section>
"##;

const TESTIMONIAL_TEMPLATE: &str = r##"<section class="testimonials-section{% if background %} section-has-background{% endif %}"{% if background %} style="background: {{ background }};"{% endif %}>
  <div class="container">
    {% if title %}
    <h2>{{ title }}</h2>
    {% endif %}
    <div class="testimonials-grid">
      {% for item in items %}
      <div class="testimonial-card">
        <blockquote>
          <p>"{{ item.quote }}"</p>
          <footer>&mdash; {{ item.author }}{% if item.company %}, {{ item.company }}{% endif %}</footer>
        </blockquote>
      </div>
      {% endfor %}
    </div>
  </div>
</section>
"##;

const CTA_TEMPLATE: &str = r##"<section class="cta-section{% if background %} section-has-background{% endif %}"{% if background %} style="background: {{ background }};"{% endif %}>
  <div class="container">
    <h2>{{ title }}</h2>
    {% if description %}
    <p class="section-subtitle">{{ description }}</p>
    {% endif %}
    <a href="{{ href }}" class="btn btn-primary">{{ button }}</a>
  </div>
</section>
"##;
