use std::path::{Path, PathBuf};

use rayon::prelude::*;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    core::{
        file_scanner::scan_files,
        metadata::{MetadataScanError, MetadataScanner},
        paths::normalize_markup_path,
        patterns::{DecoratorPatterns, LineExtractor},
        registry::{ComponentRecord, Registry, RegistryError, SelectorPatternError},
        tree::{Forest, TreeAssembler},
        usage::{ApplyOutcome, MarkupUsages, apply_usages, scan_markup_file},
    },
    issues::{
        AmbiguousTemplateIssue, CycleIssue, DuplicateComponentIssue, DuplicateSelectorIssue,
        FileKind, Issue, MetadataExtractionIssue, ReadErrorIssue, SelectorPatternIssue,
    },
};

/// Everything a build produced.
pub struct BuildOutput {
    /// The registry after all three phases, with memoized trees.
    pub registry: Registry,
    pub forest: Forest,
    pub issues: Vec<Issue>,
}

/// Orchestrates one build over a source tree.
///
/// # Phases
///
/// 1. **Metadata**: every declaration file is read in parallel, then the
///    records are added to the registry in path order.
/// 2. **Usage**: the selector pattern is built once from the complete
///    registry, every markup file is read and matched in parallel, then the
///    matches are applied to their owning records.
/// 3. **Assembly**: trees are materialized synchronously.
///
/// Each `collect()` of a parallel phase is the barrier before the next one.
/// Failures are collected as issues; they never stop later phases.
pub struct BuildContext {
    /// Merged configuration (CLI args > config file > defaults).
    pub config: Config,

    /// Directory the component files are discovered under.
    pub root_dir: PathBuf,

    /// Declaration files (e.g. `*.component.ts`), sorted.
    pub declaration_files: Vec<PathBuf>,

    /// Markup files (e.g. `*.component.html`), sorted.
    pub markup_files: Vec<PathBuf>,

    /// Paths skipped during discovery because they could not be read.
    pub skipped_count: usize,
}

impl BuildContext {
    /// Discover declaration and markup files under `root_dir`.
    pub fn new(config: Config, root_dir: PathBuf) -> Self {
        let (declarations, markups) = rayon::join(
            || scan_files(&root_dir, &config.declaration_suffix, &config.ignores),
            || scan_files(&root_dir, &config.markup_suffix, &config.ignores),
        );

        let skipped_count = declarations.skipped_count.max(markups.skipped_count);
        if skipped_count > 0 {
            warn!(
                count = skipped_count,
                root = %root_dir.display(),
                "paths skipped due to access errors"
            );
        }

        Self {
            config,
            root_dir,
            declaration_files: declarations.files,
            markup_files: markups.files,
            skipped_count,
        }
    }

    /// Run all three phases with the default decorator patterns.
    pub fn run(&self) -> BuildOutput {
        self.run_with(&DecoratorPatterns)
    }

    pub fn run_with<E: LineExtractor>(&self, extractor: &E) -> BuildOutput {
        let mut registry = Registry::new();
        let mut issues = Vec::new();

        info!(
            files = self.declaration_files.len(),
            "getting component metadata"
        );
        issues.extend(self.collect_metadata(&mut registry, extractor));

        info!(files = self.markup_files.len(), "finding child components");
        issues.extend(self.collect_usages(&mut registry));

        info!(components = registry.len(), "building trees");
        let forest = TreeAssembler::new(&mut registry).assemble();
        issues.extend(
            forest
                .cycles
                .iter()
                .map(|cycle| Issue::Cycle(CycleIssue { cycle: cycle.clone() })),
        );

        issues.sort();

        BuildOutput {
            registry,
            forest,
            issues,
        }
    }

    /// Phase 1: populate `registry` from the declaration files.
    pub fn collect_metadata<E: LineExtractor>(
        &self,
        registry: &mut Registry,
        extractor: &E,
    ) -> Vec<Issue> {
        let scanner = MetadataScanner {
            extractor,
            anchor: &self.config.anchor,
            root: &self.root_dir,
        };

        let results: Vec<(&PathBuf, Result<ComponentRecord, MetadataScanError>)> = self
            .declaration_files
            .par_iter()
            .map(|path| (path, scanner.scan_file(path)))
            .collect();

        let mut issues = Vec::new();
        for (path, result) in results {
            let file_path = path.to_string_lossy().to_string();
            match result {
                Ok(record) => {
                    debug!(
                        component = %record.name,
                        selector = record.selector.as_deref().unwrap_or("-"),
                        template = %record.template_path,
                        "component found"
                    );
                    let selector_owner = record
                        .selector
                        .as_deref()
                        .and_then(|selector| registry.find_by_selector(selector))
                        .filter(|owner| owner.name != record.name)
                        .map(|owner| owner.name.clone());
                    let name = record.name.clone();
                    let selector = record.selector.clone();

                    match registry.add(record) {
                        Ok(replaced) => {
                            if let (Some(existing_name), Some(selector)) = (selector_owner, selector) {
                                debug!(component = %name, selector = %selector, owner = %existing_name, "selector already taken");
                                issues.push(Issue::DuplicateSelector(DuplicateSelectorIssue {
                                    file_path: file_path.clone(),
                                    selector,
                                    name,
                                    existing_name,
                                }));
                            }
                            if let Some(replaced) = replaced {
                                let name = replaced.name.clone();
                                debug!(component = %name, file = %file_path, "duplicate component");
                                issues.push(Issue::DuplicateComponent(DuplicateComponentIssue {
                                    file_path,
                                    name,
                                    replaced_path: replaced.controller_path,
                                }));
                            }
                        }
                        Err(RegistryError::AmbiguousTemplate {
                            name,
                            template_path,
                            existing_name,
                            existing_template_path,
                        }) => {
                            debug!(component = %name, template = %template_path, "ambiguous template");
                            issues.push(Issue::AmbiguousTemplate(AmbiguousTemplateIssue {
                                file_path,
                                name,
                                template_path,
                                existing_name,
                                existing_template_path,
                            }));
                        }
                    }
                }
                Err(MetadataScanError::Incomplete(partial)) => {
                    debug!(file = %file_path, captured = %partial, "component metadata incomplete");
                    issues.push(Issue::MetadataExtraction(MetadataExtractionIssue {
                        file_path,
                        partial,
                    }));
                }
                Err(MetadataScanError::Io(e)) => {
                    debug!(file = %file_path, error = %e, "cannot read declaration file");
                    issues.push(read_error(file_path, FileKind::Declaration, &e));
                }
            }
        }

        issues
    }

    /// Phase 2: record child components and self-references on `registry`.
    ///
    /// Must run after [`BuildContext::collect_metadata`] has completed, since the
    /// selector pattern only covers components registered by then.
    pub fn collect_usages(&self, registry: &mut Registry) -> Vec<Issue> {
        let pattern = registry.selector_pattern();
        self.collect_usages_with(registry, pattern)
    }

    fn collect_usages_with(
        &self,
        registry: &mut Registry,
        pattern: Result<Option<Regex>, SelectorPatternError>,
    ) -> Vec<Issue> {
        let pattern = match pattern {
            Ok(Some(pattern)) => pattern,
            Ok(None) => {
                info!("no component selectors registered, skipping markup scan");
                return Vec::new();
            }
            Err(SelectorPatternError { selectors, reason }) => {
                debug!(selectors, error = %reason, "cannot build selector pattern, skipping markup scan");
                return vec![Issue::SelectorPattern(SelectorPatternIssue { selectors, reason })];
            }
        };

        let results: Vec<(&PathBuf, std::io::Result<MarkupUsages>)> = self
            .markup_files
            .par_iter()
            .map(|path| (path, scan_markup_file(path, &pattern)))
            .collect();

        let mut issues = Vec::new();
        for (path, result) in results {
            match result {
                Ok(usages) => {
                    let normalized = self.normalize_markup(path);
                    match apply_usages(registry, &normalized, &usages) {
                        ApplyOutcome::NoOwner => {
                            debug!(file = %path.display(), "markup file has no owning component");
                        }
                        ApplyOutcome::Applied { owner, children } => {
                            debug!(component = %owner, children, "children recorded");
                        }
                    }
                }
                Err(e) => {
                    debug!(file = %path.display(), error = %e, "cannot read markup file");
                    issues.push(read_error(
                        path.to_string_lossy().to_string(),
                        FileKind::Markup,
                        &e,
                    ));
                }
            }
        }

        issues
    }

    fn normalize_markup(&self, path: &Path) -> String {
        normalize_markup_path(path, &self.config.anchor, &self.root_dir)
    }
}

fn read_error(file_path: String, kind: FileKind, error: &std::io::Error) -> Issue {
    Issue::ReadError(ReadErrorIssue {
        file_path,
        kind,
        error: error.to_string(),
    })
}
