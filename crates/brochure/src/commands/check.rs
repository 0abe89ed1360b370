//! Translation completeness check.

use std::path::Path;

use anyhow::{Context, Result};
use brochure_static::{BuildConfig, StaticBuilder};

use super::build::PathArgs;

/// Run the check command.
pub fn run(config_path: &Path, paths: PathArgs, strict: bool) -> Result<()> {
    check(paths.into_build_config(config_path), strict)?;
    Ok(())
}

/// Report missing translation keys and return how many there are.
///
/// With `strict`, any missing key is an error.
fn check(config: BuildConfig, strict: bool) -> Result<usize> {
    let missing = StaticBuilder::new(config)
        .check()
        .context("Check failed")?;

    if missing.is_empty() {
        tracing::info!("All referenced translation keys are present");
        return Ok(0);
    }

    for key in &missing {
        tracing::warn!("{}", key);
    }

    if strict {
        anyhow::bail!("{} translation keys are missing", missing.len());
    }

    tracing::info!("{} translation keys are missing", missing.len());
    Ok(missing.len())
}
