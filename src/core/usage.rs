//! Phase 2: discover parent/child edges from markup files.
//!
//! Reading and matching happen per file and may run in parallel
//! ([`scan_markup_file`]). Applying the matches to the registry is a separate,
//! sequential step ([`apply_usages`]) because every file writes into the same
//! store.

use std::{
    collections::BTreeSet,
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use regex::Regex;
use tracing::debug;

use crate::core::{lines::lossy_lines, registry::Registry};

/// Selectors referenced by one markup file, in order of appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkupUsages {
    pub selectors: Vec<String>,
}

pub fn scan_markup_file(path: &Path, pattern: &Regex) -> io::Result<MarkupUsages> {
    let file = File::open(path)?;
    scan_markup_reader(BufReader::new(file), pattern)
}

/// Collect every selector match on every line. A single line may hold several.
pub fn scan_markup_reader<R: BufRead>(reader: R, pattern: &Regex) -> io::Result<MarkupUsages> {
    let mut usages = MarkupUsages::default();
    for line in lossy_lines(reader) {
        let line = line?;
        usages.selectors.extend(
            pattern
                .captures_iter(&line)
                .filter_map(|caps| caps.get(1))
                .map(|m| m.as_str().to_string()),
        );
    }
    Ok(usages)
}

/// What happened when a markup file's usages were applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// No component declares this markup file as its template.
    NoOwner,
    /// Children were recorded on the owning component.
    Applied { owner: String, children: usize },
}

/// Record the usages of the markup file at `markup_path` (already normalized)
/// on the component that owns it.
///
/// Selectors that do not belong to a registered component are ignored.
/// A reference to the owner's own selector marks it `recursive` and is also
/// kept as a child.
pub fn apply_usages(registry: &mut Registry, markup_path: &str, usages: &MarkupUsages) -> ApplyOutcome {
    let Some(owner_index) = registry.index_by_template_path(markup_path) else {
        return ApplyOutcome::NoOwner;
    };
    let owner_name = registry.get(owner_index).name.clone();

    let mut recursive = false;
    let mut children: BTreeSet<String> = BTreeSet::new();
    for selector in &usages.selectors {
        let Some(child) = registry.find_by_selector(selector) else {
            debug!(selector = %selector, "ignoring unregistered selector");
            continue;
        };
        if child.name == owner_name {
            recursive = true;
        }
        children.insert(child.name.clone());
    }

    let count = children.len();
    let owner = registry.get_mut(owner_index);
    if recursive {
        owner.recursive = true;
    }
    if !children.is_empty() {
        owner.children = children;
    }

    ApplyOutcome::Applied {
        owner: owner_name,
        children: count,
    }
}
