use std::path::{Path, PathBuf};

use glob::Pattern;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Result of scanning files.
pub struct ScanResult {
    /// Matching files, sorted by path.
    pub files: Vec<PathBuf>,
    pub skipped_count: usize,
}

/// Collect every file under `root` whose name ends with `suffix`.
///
/// Paths matching any of `ignore_patterns` (glob syntax) are skipped.
/// Entries that cannot be read are counted in `skipped_count`.
pub fn scan_files(root: &Path, suffix: &str, ignore_patterns: &[String]) -> ScanResult {
    let mut files: Vec<PathBuf> = Vec::new();
    let mut skipped_count = 0;

    let glob_patterns: Vec<Pattern> = ignore_patterns
        .iter()
        .filter_map(|p| match Pattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                warn!(pattern = %p, error = %e, "invalid ignore pattern");
                None
            }
        })
        .collect();

    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                skipped_count += 1;
                debug!(error = %e, "cannot access path");
                continue;
            }
        };
        let path = entry.path();
        let path_str = path.to_string_lossy();

        if glob_patterns.iter().any(|p| p.matches(&path_str)) {
            continue;
        }

        if entry.file_type().is_file() && path_str.ends_with(suffix) {
            files.push(path.to_path_buf());
        }
    }

    files.sort();

    ScanResult {
        files,
        skipped_count,
    }
}
