//! Phase 1: extract one component record per declaration file.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use crate::core::{
    lines::lossy_lines, paths::normalize_template_path, patterns::LineExtractor,
    registry::ComponentRecord,
};

/// Fields captured so far from a declaration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialMetadata {
    pub selector: Option<String>,
    pub name: Option<String>,
    pub template_path: Option<String>,
}

impl std::fmt::Display for PartialMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let field = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
        write!(
            f,
            "name: {}, selector: {}, templatePath: {}",
            field(&self.name),
            field(&self.selector),
            field(&self.template_path)
        )
    }
}

#[derive(Debug)]
pub enum MetadataScanError {
    /// The file ended before both a name and a template path were found.
    Incomplete(PartialMetadata),
    Io(io::Error),
}

/// Settings shared by every declaration file scan of one build.
pub struct MetadataScanner<'a, E: LineExtractor> {
    pub extractor: &'a E,
    /// Anchor for template path normalization (e.g. `src/app`).
    pub anchor: &'a str,
    /// Scan root, used when a path does not contain the anchor.
    pub root: &'a Path,
}

impl<E: LineExtractor> MetadataScanner<'_, E> {
    /// Read a declaration file until its record is complete.
    ///
    /// Lines before the declaration marker are ignored. After it, each field
    /// keeps its first match. Reading stops as soon as both the name and the
    /// template path are known.
    pub fn scan_file(&self, path: &Path) -> Result<ComponentRecord, MetadataScanError> {
        let file = File::open(path).map_err(MetadataScanError::Io)?;
        self.scan_reader(path, BufReader::new(file))
    }

    pub fn scan_reader<R: BufRead>(
        &self,
        path: &Path,
        reader: R,
    ) -> Result<ComponentRecord, MetadataScanError> {
        let mut data = PartialMetadata::default();
        let mut found_marker = false;

        for line in lossy_lines(reader) {
            let line = line.map_err(MetadataScanError::Io)?;

            if !found_marker {
                if !self.extractor.is_declaration_marker(&line) {
                    continue;
                }
                found_marker = true;
            }

            if data.selector.is_none() {
                data.selector = self.extractor.selector(&line).map(String::from);
            }
            if data.template_path.is_none() {
                data.template_path = self.extractor.template_ref(&line).map(|template_ref| {
                    normalize_template_path(path, template_ref, self.anchor, self.root)
                });
            }
            if data.name.is_none() {
                data.name = self.extractor.type_name(&line).map(String::from);
            }

            if let (Some(name), Some(template_path)) = (&data.name, &data.template_path) {
                return Ok(ComponentRecord::new(
                    name.clone(),
                    data.selector.clone(),
                    template_path.clone(),
                    path.to_string_lossy(),
                ));
            }
        }

        Err(MetadataScanError::Incomplete(data))
    }
}
