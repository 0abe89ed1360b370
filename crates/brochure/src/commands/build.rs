//! Static site build command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use brochure_static::{BuildConfig, StaticBuilder};
use clap::Args;

/// Input and output path overrides shared by `build` and `check`.
#[derive(Debug, Default, Args)]
pub struct PathArgs {
    /// Output directory (defaults to "dist")
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Translations directory (defaults to "translations")
    #[arg(long)]
    translations: Option<PathBuf>,

    /// Page template (defaults to "template.html")
    #[arg(long)]
    template: Option<PathBuf>,

    /// Static assets directory (defaults to "assets")
    #[arg(long)]
    assets: Option<PathBuf>,
}

impl PathArgs {
    /// Apply the overrides on top of the conventional paths.
    pub fn into_build_config(self, config_path: &Path) -> BuildConfig {
        let defaults = BuildConfig::default();

        BuildConfig {
            config_path: config_path.to_path_buf(),
            translations_dir: self.translations.unwrap_or(defaults.translations_dir),
            template_path: self.template.unwrap_or(defaults.template_path),
            assets_dir: self.assets.unwrap_or(defaults.assets_dir),
            output_dir: self.output.unwrap_or(defaults.output_dir),
        }
    }
}

/// Run the build command.
pub fn run(config_path: &Path, paths: PathArgs) -> Result<()> {
    tracing::info!("Building static site...");

    let config = paths.into_build_config(config_path);
    let result = StaticBuilder::new(config)
        .build()
        .context("Build failed")?;

    if !result.missing.is_empty() {
        tracing::warn!(
            "{} translation keys were missing; run `brochure check` for details",
            result.missing.len()
        );
    }

    tracing::info!(
        "Built {} pages and copied {} assets in {}ms",
        result.pages,
        result.assets,
        result.duration_ms
    );

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_only_given_paths() {
        let paths = PathArgs {
            output: Some(PathBuf::from("public")),
            ..Default::default()
        };

        let config = paths.into_build_config(Path::new("site.json"));

        assert_eq!(config.config_path, PathBuf::from("site.json"));
        assert_eq!(config.output_dir, PathBuf::from("public"));
        assert_eq!(config.translations_dir, PathBuf::from("translations"));
        assert_eq!(config.template_path, PathBuf::from("template.html"));
        assert_eq!(config.assets_dir, PathBuf::from("assets"));
    }
}
