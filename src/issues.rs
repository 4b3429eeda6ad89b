//! Issue types for component tree extraction.
//!
//! None of these stop a build. Each is self-contained with everything the
//! reporter needs to display it.

use enum_dispatch::enum_dispatch;

use crate::core::PartialMetadata;

// ============================================================
// Severity and Rule
// ============================================================

/// Severity level of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Rule identifier for each issue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    MetadataExtraction,
    ReadError,
    AmbiguousTemplate,
    DuplicateComponent,
    DuplicateSelector,
    SelectorPattern,
    Cycle,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::MetadataExtraction => write!(f, "metadata-extraction"),
            Rule::ReadError => write!(f, "read-error"),
            Rule::AmbiguousTemplate => write!(f, "ambiguous-template"),
            Rule::DuplicateComponent => write!(f, "duplicate-component"),
            Rule::DuplicateSelector => write!(f, "duplicate-selector"),
            Rule::SelectorPattern => write!(f, "selector-pattern"),
            Rule::Cycle => write!(f, "cycle"),
        }
    }
}

// ============================================================
// Issue Types
// ============================================================

/// A declaration file ended without both a component name and a template path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataExtractionIssue {
    pub file_path: String,
    /// Whatever was captured before the file ran out.
    pub partial: PartialMetadata,
}

impl MetadataExtractionIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::MetadataExtraction
    }
}

/// Which phase a file was being read in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Declaration,
    Markup,
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileKind::Declaration => write!(f, "declaration"),
            FileKind::Markup => write!(f, "markup"),
        }
    }
}

/// A file could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadErrorIssue {
    pub file_path: String,
    pub kind: FileKind,
    pub error: String,
}

impl ReadErrorIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::ReadError
    }
}

/// A component was rejected because its template path overlaps another's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbiguousTemplateIssue {
    /// Declaration file of the rejected component.
    pub file_path: String,
    pub name: String,
    pub template_path: String,
    pub existing_name: String,
    pub existing_template_path: String,
}

impl AmbiguousTemplateIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::AmbiguousTemplate
    }
}

/// Two declaration files declare the same component name; the later one wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateComponentIssue {
    /// Declaration file of the record that was kept.
    pub file_path: String,
    pub name: String,
    /// Declaration file of the record that was replaced.
    pub replaced_path: String,
}

impl DuplicateComponentIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::DuplicateComponent
    }
}

/// Two components declare the same selector; markup keeps resolving it to the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateSelectorIssue {
    /// Declaration file of the component that lost the selector.
    pub file_path: String,
    pub selector: String,
    pub name: String,
    /// Component the selector resolves to.
    pub existing_name: String,
}

impl DuplicateSelectorIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::DuplicateSelector
    }
}

/// The combined selector pattern could not be built, so no markup was scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorPatternIssue {
    pub selectors: usize,
    pub reason: String,
}

impl SelectorPatternIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::SelectorPattern
    }
}

/// Components reference each other in a loop that is not a direct self-reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleIssue {
    /// Component names in visiting order, first one repeated at the end.
    pub cycle: Vec<String>,
}

impl CycleIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::Cycle
    }
}

// ============================================================
// Issue Enum
// ============================================================

/// An issue found during a build.
#[enum_dispatch(Report)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    MetadataExtraction(MetadataExtractionIssue),
    ReadError(ReadErrorIssue),
    AmbiguousTemplate(AmbiguousTemplateIssue),
    DuplicateComponent(DuplicateComponentIssue),
    DuplicateSelector(DuplicateSelectorIssue),
    SelectorPattern(SelectorPatternIssue),
    Cycle(CycleIssue),
}

impl Issue {
    pub fn severity(&self) -> Severity {
        match self {
            Issue::MetadataExtraction(_) => MetadataExtractionIssue::severity(),
            Issue::ReadError(_) => ReadErrorIssue::severity(),
            Issue::AmbiguousTemplate(_) => AmbiguousTemplateIssue::severity(),
            Issue::DuplicateComponent(_) => DuplicateComponentIssue::severity(),
            Issue::DuplicateSelector(_) => DuplicateSelectorIssue::severity(),
            Issue::SelectorPattern(_) => SelectorPatternIssue::severity(),
            Issue::Cycle(_) => CycleIssue::severity(),
        }
    }

    pub fn rule(&self) -> Rule {
        match self {
            Issue::MetadataExtraction(_) => MetadataExtractionIssue::rule(),
            Issue::ReadError(_) => ReadErrorIssue::rule(),
            Issue::AmbiguousTemplate(_) => AmbiguousTemplateIssue::rule(),
            Issue::DuplicateComponent(_) => DuplicateComponentIssue::rule(),
            Issue::DuplicateSelector(_) => DuplicateSelectorIssue::rule(),
            Issue::SelectorPattern(_) => SelectorPatternIssue::rule(),
            Issue::Cycle(_) => CycleIssue::rule(),
        }
    }
}

// ============================================================
// Report Trait (for CLI output)
// ============================================================

/// Location information for report output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportLocation<'a> {
    /// A specific file.
    File { path: &'a str },
    /// A component, for issues that span several files.
    Component { name: &'a str },
    /// The build as a whole.
    Build,
}

/// Trait for types that can be reported to CLI.
#[enum_dispatch]
pub trait Report {
    fn location(&self) -> ReportLocation<'_>;

    /// Primary message to display.
    fn message(&self) -> String;

    fn report_severity(&self) -> Severity;

    fn report_rule(&self) -> Rule;

    /// Optional hint for fixing the issue.
    fn hint(&self) -> Option<&str> {
        None
    }

    /// Optional details for the "= note:" line.
    fn details(&self) -> Option<String> {
        None
    }
}

// ============================================================
// Report Implementations
// ============================================================

impl Report for MetadataExtractionIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        "no component name and template path found".to_string()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn hint(&self) -> Option<&str> {
        Some("declare `templateUrl: './...'` inside @Component({...}) and export the class")
    }

    fn details(&self) -> Option<String> {
        Some(format!("captured {}", self.partial))
    }
}

impl Report for ReadErrorIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        self.error.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(format!("while reading {} file", self.kind))
    }
}

impl Report for AmbiguousTemplateIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        format!("{} skipped: template path overlaps {}", self.name, self.existing_name)
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(format!(
            "'{}' overlaps '{}'",
            self.template_path, self.existing_template_path
        ))
    }
}

impl Report for DuplicateComponentIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        format!("{} is declared more than once", self.name)
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(format!("replaces declaration in {}", self.replaced_path))
    }
}

impl Report for DuplicateSelectorIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        format!(
            "selector '{}' of {} is already used by {}",
            self.selector, self.name, self.existing_name
        )
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(format!("<{}> resolves to {}", self.selector, self.existing_name))
    }
}

impl Report for SelectorPatternIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Build
    }

    fn message(&self) -> String {
        format!("cannot match {} selectors in markup", self.selectors)
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn hint(&self) -> Option<&str> {
        Some("no child components were recorded for this build")
    }

    fn details(&self) -> Option<String> {
        Some(self.reason.clone())
    }
}

impl Report for CycleIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Component {
            name: self.cycle.first().map(String::as_str).unwrap_or_default(),
        }
    }

    fn message(&self) -> String {
        self.cycle.join(" -> ")
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn hint(&self) -> Option<&str> {
        Some("components in this cycle are emitted without children")
    }
}

// ============================================================
// Ordering for Issue (for sorting in reports)
// ============================================================

impl Issue {
    /// Get file path for sorting.
    fn sort_file_path(&self) -> Option<&str> {
        match self.location() {
            ReportLocation::File { path } => Some(path),
            ReportLocation::Component { .. } | ReportLocation::Build => None,
        }
    }
}

impl Ord for Issue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering;

        // Sort by: file_path (None last), rule, message
        match (self.sort_file_path(), other.sort_file_path()) {
            (Some(a), Some(b)) => a
                .cmp(b)
                .then_with(|| self.rule().cmp(&other.rule()))
                .then_with(|| self.message().cmp(&other.message())),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self
                .rule()
                .cmp(&other.rule())
                .then_with(|| self.message().cmp(&other.message())),
        }
    }
}

impl PartialOrd for Issue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use crate::issues::*;

    fn partial() -> PartialMetadata {
        PartialMetadata {
            selector: Some("app-inline".to_string()),
            name: Some("InlineComponent".to_string()),
            template_path: None,
        }
    }

    #[test]
    fn test_metadata_extraction_issue() {
        let issue = MetadataExtractionIssue {
            file_path: "./src/app/inline.component.ts".to_string(),
            partial: partial(),
        };

        assert_eq!(MetadataExtractionIssue::severity(), Severity::Error);
        assert_eq!(MetadataExtractionIssue::rule(), Rule::MetadataExtraction);
        assert_eq!(
            issue.details().as_deref(),
            Some("captured name: InlineComponent, selector: app-inline, templatePath: -")
        );
    }

    #[test]
    fn test_duplicate_is_warning() {
        let issue = Issue::DuplicateComponent(DuplicateComponentIssue {
            file_path: "./b.component.ts".to_string(),
            name: "Dup".to_string(),
            replaced_path: "./a.component.ts".to_string(),
        });

        assert_eq!(issue.severity(), Severity::Warning);
        assert_eq!(issue.message(), "Dup is declared more than once");
    }

    #[test]
    fn test_duplicate_selector_is_warning() {
        let issue = Issue::DuplicateSelector(DuplicateSelectorIssue {
            file_path: "./src/app/b/card.component.ts".to_string(),
            selector: "app-card".to_string(),
            name: "BCard".to_string(),
            existing_name: "ACard".to_string(),
        });

        assert_eq!(issue.severity(), Severity::Warning);
        assert_eq!(issue.message(), "selector 'app-card' of BCard is already used by ACard");
    }

    #[test]
    fn test_selector_pattern_issue_has_no_file() {
        let issue = Issue::SelectorPattern(SelectorPatternIssue {
            selectors: 3,
            reason: "Compiled regex exceeds size limit".to_string(),
        });

        assert_eq!(issue.severity(), Severity::Error);
        assert_eq!(issue.location(), ReportLocation::Build);
        assert_eq!(issue.details().as_deref(), Some("Compiled regex exceeds size limit"));
    }

    #[test]
    fn test_cycle_issue_message() {
        let issue = Issue::Cycle(CycleIssue {
            cycle: vec!["A".into(), "B".into(), "A".into()],
        });

        assert_eq!(issue.rule(), Rule::Cycle);
        assert_eq!(issue.message(), "A -> B -> A");
    }

    #[test]
    fn test_issue_sorting_puts_component_issues_last() {
        let mut issues = vec![
            Issue::Cycle(CycleIssue {
                cycle: vec!["A".into(), "B".into(), "A".into()],
            }),
            Issue::ReadError(ReadErrorIssue {
                file_path: "./z.component.html".to_string(),
                kind: FileKind::Markup,
                error: "denied".to_string(),
            }),
            Issue::MetadataExtraction(MetadataExtractionIssue {
                file_path: "./a.component.ts".to_string(),
                partial: partial(),
            }),
        ];
        issues.sort();

        assert_eq!(
            issues.iter().map(|i| i.rule()).collect::<Vec<_>>(),
            vec![Rule::MetadataExtraction, Rule::ReadError, Rule::Cycle]
        );
    }

    #[test]
    fn test_rule_display() {
        assert_eq!(Rule::MetadataExtraction.to_string(), "metadata-extraction");
        assert_eq!(Rule::ReadError.to_string(), "read-error");
        assert_eq!(Rule::AmbiguousTemplate.to_string(), "ambiguous-template");
        assert_eq!(Rule::DuplicateComponent.to_string(), "duplicate-component");
        assert_eq!(Rule::DuplicateSelector.to_string(), "duplicate-selector");
        assert_eq!(Rule::SelectorPattern.to_string(), "selector-pattern");
        assert_eq!(Rule::Cycle.to_string(), "cycle");
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Error.to_string(), "error");
        assert_eq!(Severity::Warning.to_string(), "warning");
    }
}
