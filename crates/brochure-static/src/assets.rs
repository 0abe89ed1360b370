//! Static asset copying.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::builder::BuildError;

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Copy every file under `source` into `dest`, byte for byte, keeping relative paths.
    ///
    /// A missing source directory copies nothing. Returns the number of files copied.
    pub fn copy_dir(source: &Path, dest: &Path) -> Result<usize, BuildError> {
        if !source.is_dir() {
            tracing::warn!("Assets directory not found: {}", source.display());
            return Ok(0);
        }

        let mut files: Vec<PathBuf> = Vec::new();
        for entry in WalkDir::new(source).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(|e| BuildError::ReadError {
                path: source.to_path_buf(),
                message: e.to_string(),
            })?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }

        for file in &files {
            let relative = file.strip_prefix(source).unwrap_or(file);
            let target = dest.join(relative);

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| BuildError::WriteError {
                    path: parent.to_path_buf(),
                    message: e.to_string(),
                })?;
            }

            fs::copy(file, &target).map_err(|e| BuildError::WriteError {
                path: target.clone(),
                message: e.to_string(),
            })?;
            tracing::debug!("Copied {}", relative.display());
        }

        Ok(files.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn copies_nested_assets_unchanged() {
        let temp = tempdir().unwrap();
        let source = temp.path().join("assets");
        let dest = temp.path().join("dist/assets");

        fs::create_dir_all(source.join("img")).unwrap();
        fs::write(source.join("styles.css"), "body { color: red; }\n").unwrap();
        fs::write(source.join("img/logo.bin"), [0u8, 159, 146, 150]).unwrap();

        let copied = AssetPipeline::copy_dir(&source, &dest).unwrap();

        assert_eq!(copied, 2);
        assert_eq!(
            fs::read_to_string(dest.join("styles.css")).unwrap(),
            "body { color: red; }\n"
        );
        assert_eq!(fs::read(dest.join("img/logo.bin")).unwrap(), vec![0u8, 159, 146, 150]);
    }

    #[test]
    fn missing_source_copies_nothing() {
        let temp = tempdir().unwrap();

        let copied =
            AssetPipeline::copy_dir(&temp.path().join("nope"), &temp.path().join("out")).unwrap();

        assert_eq!(copied, 0);
        assert!(!temp.path().join("out").exists());
    }
}
