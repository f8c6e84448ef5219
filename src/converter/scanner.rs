// file: src/converter/scanner.rs
// description: discovery of saved html chapter pages
// reference: https://docs.rs/walkdir

use crate::error::{PipelineError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Name fragments of browser "save page" side artefacts.
const SKIP_FRAGMENTS: &[&str] = &["_files", "saved_resource"];

#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub file_name: String,
    pub size: u64,
}

impl ScannedFile {
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// `*.html` files directly inside `dir`, sorted by file name.
pub fn find_html_files(dir: &Path) -> Result<Vec<ScannedFile>> {
    scan_directory(dir, "html", |name| {
        !SKIP_FRAGMENTS.iter().any(|fragment| name.contains(fragment))
    })
}

/// Non-recursive listing of files with `extension` accepted by `keep`.
pub fn scan_directory<F>(dir: &Path, extension: &str, keep: F) -> Result<Vec<ScannedFile>>
where
    F: Fn(&str) -> bool,
{
    if !dir.is_dir() {
        return Err(PipelineError::Validation(format!(
            "Directory not found: {}",
            dir.display()
        )));
    }

    info!("Scanning directory: {}", dir.display());
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let file_name = entry.file_name().to_string_lossy().to_string();

        let matches_extension = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));

        if !matches_extension {
            continue;
        }

        if !keep(&file_name) {
            debug!("Skipping file: {}", path.display());
            continue;
        }

        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);

        files.push(ScannedFile {
            path: path.to_path_buf(),
            file_name,
            size,
        });
    }

    files.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    info!("Found {} {} files", files.len(), extension);
    Ok(files)
}
