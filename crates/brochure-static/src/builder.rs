//! Static site builder.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;

use brochure_config::{
    ConfigError, Language, MissingKey, SiteConfig, TranslationError, TranslationStore,
};

use crate::assets::AssetPipeline;
use crate::sections::SectionComposer;
use crate::templates::{PageContext, RenderError, TemplateEngine};

/// Input and output locations for a build.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Site configuration file
    pub config_path: PathBuf,

    /// Directory holding `<code>.json` translation files
    pub translations_dir: PathBuf,

    /// HTML page skeleton
    pub template_path: PathBuf,

    /// Static assets copied to `<output>/assets`
    pub assets_dir: PathBuf,

    /// Output directory, recreated on every build
    pub output_dir: PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from("config.json"),
            translations_dir: PathBuf::from("translations"),
            template_path: PathBuf::from("template.html"),
            assets_dir: PathBuf::from("assets"),
            output_dir: PathBuf::from("dist"),
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of pages written, including the root copy
    pub pages: usize,

    /// Number of asset files copied
    pub assets: usize,

    /// Translation keys that fell back or rendered empty
    pub missing: Vec<MissingKey>,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Translation(#[from] TranslationError),

    #[error("{}: {error}", .path.display())]
    Render { path: PathBuf, error: RenderError },

    #[error("Failed to read {}: {message}", .path.display())]
    ReadError { path: PathBuf, message: String },

    #[error("Failed to write {}: {message}", .path.display())]
    WriteError { path: PathBuf, message: String },
}

/// The fully substituted page for one language.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    /// Language code
    pub language: String,

    /// Complete HTML document
    pub html: String,

    /// Keys this language lacked while rendering
    pub missing: Vec<MissingKey>,
}

/// Everything loaded for a build: configuration, translations and templates.
pub struct Site {
    config: SiteConfig,
    translations: TranslationStore,
    templates: TemplateEngine,
}

impl Site {
    pub fn new(config: SiteConfig, translations: TranslationStore, templates: TemplateEngine) -> Self {
        Self {
            config,
            translations,
            templates,
        }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn translations(&self) -> &TranslationStore {
        &self.translations
    }

    /// Render the page for every configured language, in configured order.
    pub fn render_all(&self) -> Result<Vec<RenderedPage>, RenderError> {
        self.config
            .languages
            .par_iter()
            .map(|language| self.render_page(language))
            .collect()
    }

    /// Render the page for a single language.
    pub fn render_page(&self, language: &Language) -> Result<RenderedPage, RenderError> {
        let mut t = self.translations.translator(&language.code);

        let sections =
            SectionComposer::new(&self.templates, &self.config, language).compose(&mut t)?;

        let context = PageContext {
            title: t.translate("site_title"),
            lang: language.code.clone(),
            lang_name: language.name.clone(),
            base_url: self.config.base_url.clone(),
            nav_title: t.translate("site_brand"),
            phone: language.phone.clone(),
            demo_url: self.config.demo_url.clone(),
            contact_email: self.config.contact_email.clone().unwrap_or_default(),
            lang_switcher: self.language_switcher(&language.code),
            content: sections.join("\n"),
            footer_text: t.translate("footer_text"),
        };

        let html = self.templates.render_page(&context);

        Ok(RenderedPage {
            language: language.code.clone(),
            html,
            missing: t.into_missing(),
        })
    }

    /// Links to every language version of the page.
    fn language_switcher(&self, current: &str) -> String {
        self.config
            .languages
            .iter()
            .map(|l| {
                let class = if l.code == current { r#" class="active""# } else { "" };
                format!(
                    r#"<a href="{}/{}/"{}>{}</a>"#,
                    escape_xml(&self.config.base_url),
                    escape_xml(&l.code),
                    class,
                    escape_xml(&l.name)
                )
            })
            .collect::<Vec<_>>()
            .join(" | ")
    }

    /// `sitemap.xml` listing each language page with its alternates.
    fn sitemap(&self) -> String {
        let base = escape_xml(&self.config.base_url);
        let alternates: String = self
            .config
            .languages
            .iter()
            .map(|l| {
                format!(
                    "    <xhtml:link rel=\"alternate\" hreflang=\"{code}\" href=\"{base}/{code}/\"/>\n",
                    code = escape_xml(&l.code)
                )
            })
            .chain(std::iter::once(format!(
                "    <xhtml:link rel=\"alternate\" hreflang=\"x-default\" href=\"{base}/\"/>\n"
            )))
            .collect();

        let urls: String = self
            .config
            .languages
            .iter()
            .map(|l| {
                format!(
                    "  <url>\n    <loc>{base}/{}/</loc>\n{alternates}  </url>\n",
                    escape_xml(&l.code)
                )
            })
            .collect();

        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9" xmlns:xhtml="http://www.w3.org/1999/xhtml">
{urls}</urlset>
"#
        )
    }
}

/// Static site builder.
pub struct StaticBuilder {
    config: BuildConfig,
}

impl StaticBuilder {
    /// Create a new static builder.
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// Load configuration, translations and the page template.
    ///
    /// Nothing is written; every load failure surfaces here.
    pub fn load(&self) -> Result<Site, BuildError> {
        let config = SiteConfig::load(&self.config.config_path)?;
        tracing::info!(
            "Loaded {} with {} languages and {} sections",
            self.config.config_path.display(),
            config.languages.len(),
            config.sections.len()
        );

        let translations = TranslationStore::load(&self.config.translations_dir, &config)?;

        let template_path = &self.config.template_path;
        let source = fs::read_to_string(template_path).map_err(|e| BuildError::ReadError {
            path: template_path.clone(),
            message: e.to_string(),
        })?;
        let templates = TemplateEngine::new(source).map_err(|error| BuildError::Render {
            path: template_path.clone(),
            error,
        })?;

        Ok(Site::new(config, translations, templates))
    }

    /// Load everything and report missing translation keys without writing output.
    pub fn check(&self) -> Result<Vec<MissingKey>, BuildError> {
        let site = self.load()?;
        Ok(site.translations().missing_keys(site.config()))
    }

    /// Build the static site.
    pub fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        let site = self.load()?;

        let pages = site.render_all().map_err(|error| BuildError::Render {
            path: self.config.template_path.clone(),
            error,
        })?;

        self.prepare_output_dir()?;

        let output_dir = &self.config.output_dir;
        let mut written = 0;
        for page in &pages {
            write_file(&output_dir.join(&page.language).join("index.html"), &page.html)?;
            written += 1;

            if page.language == site.config().default_language {
                write_file(&output_dir.join("index.html"), &page.html)?;
                written += 1;
            }
        }

        let assets = AssetPipeline::copy_dir(&self.config.assets_dir, &output_dir.join("assets"))?;

        if !site.config().base_url.is_empty() {
            write_file(&output_dir.join("sitemap.xml"), &site.sitemap())?;
            let robots = format!(
                "User-agent: *\nAllow: /\nSitemap: {}/sitemap.xml\n",
                site.config().base_url
            );
            write_file(&output_dir.join("robots.txt"), &robots)?;
        }

        let missing: Vec<MissingKey> = pages.into_iter().flat_map(|p| p.missing).collect();

        Ok(BuildResult {
            pages: written,
            assets,
            missing,
            duration_ms: start.elapsed().as_millis() as u64,
            output_dir: output_dir.clone(),
        })
    }

    /// Remove stale output and recreate the output directory.
    fn prepare_output_dir(&self) -> Result<(), BuildError> {
        let output_dir = &self.config.output_dir;

        if output_dir.exists() {
            let output_abs = absolute(output_dir);
            let inputs = [
                &self.config.config_path,
                &self.config.translations_dir,
                &self.config.template_path,
                &self.config.assets_dir,
            ];
            if inputs.iter().any(|input| absolute(input).starts_with(&output_abs)) {
                return Err(BuildError::WriteError {
                    path: output_dir.clone(),
                    message: "output directory contains build inputs; refusing to clear it"
                        .to_string(),
                });
            }

            fs::remove_dir_all(output_dir).map_err(|e| BuildError::WriteError {
                path: output_dir.clone(),
                message: e.to_string(),
            })?;
        }

        fs::create_dir_all(output_dir).map_err(|e| BuildError::WriteError {
            path: output_dir.clone(),
            message: e.to_string(),
        })
    }
}

/// Escape text for XML content and quoted attribute values.
fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Canonical path when it exists, otherwise the path as given.
fn absolute(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn write_file(path: &Path, content: &str) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| BuildError::WriteError {
            path: parent.to_path_buf(),
            message: e.to_string(),
        })?;
    }

    fs::write(path, content).map_err(|e| BuildError::WriteError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    tracing::debug!("Wrote {}", path.display());

    Ok(())
}
