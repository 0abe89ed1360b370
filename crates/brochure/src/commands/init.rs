//! Scaffold a new site in the current directory.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub fn run(config_path: &Path, yes: bool) -> Result<()> {
    scaffold(Path::new("."), config_path, yes)
}

/// Write the starter files under `root`. Existing files are kept unless `overwrite` is set.
pub(super) fn scaffold(root: &Path, config_path: &Path, overwrite: bool) -> Result<()> {
    tracing::info!("Initializing brochure site...");

    let files = [
        (root.join(config_path), DEFAULT_CONFIG),
        (root.join("translations/en.json"), DEFAULT_EN),
        (root.join("translations/de.json"), DEFAULT_DE),
        (root.join("template.html"), DEFAULT_TEMPLATE),
        (root.join("assets/styles.css"), DEFAULT_CSS),
    ];

    for (path, content) in &files {
        if path.exists() && !overwrite {
            tracing::warn!("{} already exists. Use --yes to overwrite.", path.display());
            continue;
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Created {}", path.display());
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'brochure build' to generate the site into dist/.");

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"{
  "default_language": "en",
  "demo_url": "https://demo.example.com",
  "base_url": "",
  "languages": {
    "en": { "name": "English", "phone": "+1 555 0100" },
    "de": { "name": "Deutsch", "phone": "+49 30 123456" }
  },
  "sections": [
    {
      "type": "hero",
      "title": "hero_title",
      "subtitle": "hero_subtitle"
    },
    {
      "type": "features",
      "title": "features_title",
      "items": [
        { "title": "feature_invoicing", "description": "feature_invoicing_desc", "icon": "€" },
        { "title": "feature_inventory", "description": "feature_inventory_desc", "icon": "▦" },
        {
          "title": "feature_reporting",
          "bullets": ["feature_reporting_b1", "feature_reporting_b2"]
        }
      ]
    },
    {
      "type": "testimonial",
      "enabled": false,
      "title": "testimonials_title",
      "items": [
        { "quote": "testimonial_1_quote", "author": "testimonial_1_author", "company": "testimonial_1_company" }
      ]
    },
    {
      "type": "cta",
      "title": "cta_title",
      "description": "cta_description",
      "button": "cta_button"
    }
  ]
}
"#;

const DEFAULT_EN: &str = r#"{
  "site_title": "Acme ERP - Run your whole business in one place",
  "site_brand": "Acme ERP",
  "footer_text": "© Acme Software",
  "hero_title": "Run your whole business in one place",
  "hero_subtitle": "Invoicing, inventory and reporting for growing companies.",
  "view_demo": "View demo",
  "contact_sales": "Call sales",
  "book_demo": "Book a demo",
  "features_title": "Everything you need",
  "feature_invoicing": "Invoicing",
  "feature_invoicing_desc": "Send invoices and track payments.",
  "feature_inventory": "Inventory",
  "feature_inventory_desc": "Know what is in stock, everywhere.",
  "feature_reporting": "Reporting",
  "feature_reporting_b1": "Real-time dashboards",
  "feature_reporting_b2": "Scheduled exports",
  "testimonials_title": "What customers say",
  "testimonial_1_quote": "We closed our books in half the time.",
  "testimonial_1_author": "Jane Doe",
  "testimonial_1_company": "Example GmbH",
  "cta_title": "Ready to see it?",
  "cta_description": "Try the live demo, no sign-up required.",
  "cta_button": "Open the demo"
}
"#;

const DEFAULT_DE: &str = r#"{
  "site_title": "Acme ERP - Ihr ganzes Unternehmen an einem Ort",
  "site_brand": "Acme ERP",
  "footer_text": "© Acme Software",
  "hero_title": "Ihr ganzes Unternehmen an einem Ort",
  "hero_subtitle": "Rechnungen, Lager und Berichte für wachsende Unternehmen.",
  "view_demo": "Demo ansehen",
  "contact_sales": "Vertrieb anrufen",
  "book_demo": "Demo buchen",
  "features_title": "Alles, was Sie brauchen",
  "feature_invoicing": "Rechnungen",
  "feature_invoicing_desc": "Rechnungen senden und Zahlungen verfolgen.",
  "feature_inventory": "Lager",
  "feature_inventory_desc": "Wissen, was überall auf Lager ist.",
  "feature_reporting": "Berichte",
  "feature_reporting_b1": "Echtzeit-Dashboards",
  "feature_reporting_b2": "Geplante Exporte",
  "testimonials_title": "Was Kunden sagen",
  "testimonial_1_quote": "Wir schließen unsere Bücher in der halben Zeit ab.",
  "testimonial_1_author": "Jane Doe",
  "testimonial_1_company": "Example GmbH",
  "cta_title": "Bereit für einen Blick?",
  "cta_description": "Testen Sie die Live-Demo ohne Anmeldung.",
  "cta_button": "Demo öffnen"
}
"#;

const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="{{LANG}}">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{TITLE}}</title>
  <link rel="stylesheet" href="{{BASE_URL}}/assets/styles.css">
</head>
<body>
  <header class="site-header">
    <div class="container">
      <a href="{{BASE_URL}}/{{LANG}}/" class="brand">{{NAV_TITLE}}</a>
      <nav class="lang-switcher">{{LANG_SWITCHER}}</nav>
    </div>
  </header>
  <main>
{{CONTENT}}
  </main>
  <footer class="site-footer">
    <div class="container">
      <p>{{FOOTER_TEXT}}</p>
      <p><a href="tel:{{PHONE}}">{{PHONE}}</a></p>
    </div>
  </footer>
</body>
</html>
"#;

const DEFAULT_CSS: &str = r#"* {
  box-sizing: border-box;
  margin: 0;
  padding: 0;
}

body {
  font-family: system-ui, -apple-system, sans-serif;
  line-height: 1.6;
  color: #1f2937;
}

.container {
  max-width: 1100px;
  margin: 0 auto;
  padding: 0 1.5rem;
}

.site-header,
.site-footer {
  padding: 1rem 0;
  background: #f3f4f6;
}

.site-header .container {
  display: flex;
  justify-content: space-between;
  align-items: center;
}

.brand {
  font-weight: 700;
  text-decoration: none;
  color: inherit;
}

.lang-switcher a.active {
  font-weight: 600;
}

section {
  padding: 4rem 0;
}

.hero h1 {
  font-size: 2.5rem;
  margin-bottom: 1rem;
}

.cta-buttons {
  display: flex;
  gap: 1rem;
  margin-top: 2rem;
}

.btn {
  display: inline-block;
  padding: 0.75rem 1.5rem;
  border-radius: 0.375rem;
  text-decoration: none;
}

.btn-primary {
  background: #2563eb;
  color: #fff;
}

.btn-secondary {
  border: 1px solid #2563eb;
  color: #2563eb;
}

.features-grid,
.testimonials-grid {
  display: grid;
  grid-template-columns: repeat(auto-fit, minmax(250px, 1fr));
  gap: 1.5rem;
  margin-top: 2rem;
}

.feature-icon {
  font-size: 2rem;
}

.section-has-background {
  color: #fff;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use brochure_static::{BuildConfig, StaticBuilder};
    use tempfile::tempdir;

    #[test]
    fn scaffold_builds() {
        let temp = tempdir().unwrap();
        let root = temp.path();

        scaffold(root, Path::new("config.json"), false).unwrap();

        let result = StaticBuilder::new(BuildConfig {
            config_path: root.join("config.json"),
            translations_dir: root.join("translations"),
            template_path: root.join("template.html"),
            assets_dir: root.join("assets"),
            output_dir: root.join("dist"),
        })
        .build()
        .unwrap();

        assert_eq!(result.pages, 3);
        assert!(result.missing.is_empty());
        assert!(root.join("dist/de/index.html").exists());
        assert!(root.join("dist/assets/styles.css").exists());
    }

    #[test]
    fn keeps_existing_files_without_overwrite() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::write(root.join("config.json"), "{}").unwrap();

        scaffold(root, Path::new("config.json"), false).unwrap();
        assert_eq!(fs::read_to_string(root.join("config.json")).unwrap(), "{}");

        scaffold(root, Path::new("config.json"), true).unwrap();
        assert_eq!(
            fs::read_to_string(root.join("config.json")).unwrap(),
            DEFAULT_CONFIG
        );
    }
}
