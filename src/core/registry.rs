//! Component registry - the per-run store shared by the scanners and the assembler.
//!
//! Lifecycle within one build:
//!
//! 1. **Phase 1** (metadata): records are added
//! 2. **Phase 2** (usage): `children` / `recursive` are set on existing records
//! 3. **Phase 3** (assembly): only the memoized `tree` field is written
//!
//! The registry is created per run and passed by reference; nothing is global.

use std::collections::{BTreeSet, HashMap};

use regex::{Regex, RegexBuilder};
use thiserror::Error;

use crate::core::{paths::ends_with_segments, tree::TreeNode};

/// Compiled size limit for the combined selector pattern.
const SELECTOR_PATTERN_SIZE_LIMIT: usize = 64 * (1 << 20);

/// One discovered component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRecord {
    /// Declared type name (e.g. `JobsListComponent`). Unique in the registry.
    pub name: String,
    /// Tag name used to reference this component from markup.
    /// `None` for components that are never referenced by tag (e.g. the app root).
    pub selector: Option<String>,
    /// Normalized, anchor-rooted path to the component's markup file.
    pub template_path: String,
    /// Path to the declaration file the record was extracted from.
    pub controller_path: String,
    /// Names of components referenced in this component's markup.
    pub children: BTreeSet<String>,
    /// True iff the component's own markup references its own selector.
    pub recursive: bool,
    /// Memoized subtree, filled in by the tree assembler.
    pub tree: Vec<TreeNode>,
}

impl ComponentRecord {
    pub fn new(
        name: impl Into<String>,
        selector: Option<String>,
        template_path: impl Into<String>,
        controller_path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            selector,
            template_path: template_path.into(),
            controller_path: controller_path.into(),
            children: BTreeSet::new(),
            recursive: false,
            tree: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Two records' template paths overlap, so substring lookup by markup
    /// path could resolve to either of them.
    #[error("template path '{template_path}' of {name} overlaps '{existing_template_path}' of {existing_name}")]
    AmbiguousTemplate {
        name: String,
        template_path: String,
        existing_name: String,
        existing_template_path: String,
    },
}

/// The combined selector pattern could not be compiled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot build selector pattern for {selectors} selectors: {reason}")]
pub struct SelectorPatternError {
    pub selectors: usize,
    pub reason: String,
}

/// All component records of one build, plus name and selector indexes.
#[derive(Debug, Default)]
pub struct Registry {
    records: Vec<ComponentRecord>,
    by_name: HashMap<String, usize>,
    by_selector: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fully-formed record.
    ///
    /// A record whose name already exists replaces the earlier one in place
    /// (last write wins) and the displaced record is returned. A record whose
    /// template path overlaps another component's template path is rejected.
    /// A selector already claimed by another component keeps resolving to
    /// that component.
    pub fn add(&mut self, record: ComponentRecord) -> Result<Option<ComponentRecord>, RegistryError> {
        let existing = self.by_name.get(&record.name).copied();

        if let Some(other) = self.records.iter().enumerate().find_map(|(i, other)| {
            let overlaps = ends_with_segments(&other.template_path, &record.template_path)
                || ends_with_segments(&record.template_path, &other.template_path);
            (Some(i) != existing && overlaps).then_some(other)
        }) {
            return Err(RegistryError::AmbiguousTemplate {
                name: record.name,
                template_path: record.template_path,
                existing_name: other.name.clone(),
                existing_template_path: other.template_path.clone(),
            });
        }

        match existing {
            Some(index) => {
                let previous = std::mem::replace(&mut self.records[index], record);
                if let Some(selector) = &previous.selector
                    && self.by_selector.get(selector) == Some(&index)
                {
                    self.by_selector.remove(selector);
                    if let Some(other) = self
                        .records
                        .iter()
                        .position(|r| r.selector.as_ref() == Some(selector))
                    {
                        self.by_selector.insert(selector.clone(), other);
                    }
                }
                if let Some(selector) = &self.records[index].selector {
                    self.by_selector.entry(selector.clone()).or_insert(index);
                }
                Ok(Some(previous))
            }
            None => {
                let index = self.records.len();
                self.by_name.insert(record.name.clone(), index);
                if let Some(selector) = &record.selector {
                    self.by_selector.entry(selector.clone()).or_insert(index);
                }
                self.records.push(record);
                Ok(None)
            }
        }
    }

    /// Find the record whose template path is a trailing segment sequence of `path`.
    pub fn find_by_template_path(&self, path: &str) -> Option<&ComponentRecord> {
        self.index_by_template_path(path).map(|i| &self.records[i])
    }

    pub fn index_by_template_path(&self, path: &str) -> Option<usize> {
        self.records
            .iter()
            .position(|r| ends_with_segments(path, &r.template_path))
    }

    pub fn find_by_name(&self, name: &str) -> Option<&ComponentRecord> {
        self.index_of(name).map(|i| &self.records[i])
    }

    pub fn find_by_selector(&self, selector: &str) -> Option<&ComponentRecord> {
        self.by_selector.get(selector).map(|&i| &self.records[i])
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn get(&self, index: usize) -> &ComponentRecord {
        &self.records[index]
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> &mut ComponentRecord {
        &mut self.records[index]
    }

    pub fn records(&self) -> &[ComponentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Build a pattern matching an opening tag for any selector in the registry.
    ///
    /// Looks like `<(app-quick-launch-content|app-quick-launch|app-nav)(?:\s|>|/|$)`.
    /// The trailing group keeps `app-quick-launch` from matching inside
    /// `<app-quick-launch-content>`. Returns `Ok(None)` when no record has a selector.
    pub fn selector_pattern(&self) -> Result<Option<Regex>, SelectorPatternError> {
        self.selector_pattern_with_limit(SELECTOR_PATTERN_SIZE_LIMIT)
    }

    /// [`Registry::selector_pattern`] with an explicit compiled size limit in bytes.
    pub fn selector_pattern_with_limit(
        &self,
        size_limit: usize,
    ) -> Result<Option<Regex>, SelectorPatternError> {
        let mut selectors: Vec<&str> = self
            .records
            .iter()
            .filter_map(|r| r.selector.as_deref())
            .collect();
        if selectors.is_empty() {
            return Ok(None);
        }

        selectors.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        selectors.dedup();

        let alternation = selectors
            .iter()
            .map(|s| regex::escape(s))
            .collect::<Vec<_>>()
            .join("|");

        RegexBuilder::new(&format!(r"<({})(?:\s|>|/|$)", alternation))
            .size_limit(size_limit)
            .build()
            .map(Some)
            .map_err(|e| SelectorPatternError {
                selectors: selectors.len(),
                reason: e.to_string(),
            })
    }
}
