//! Line-level extractors for component declaration files.
//!
//! Declaration files are not parsed. Each line is tested against four
//! independent patterns; the scanner decides which ones apply when.

use regex::Regex;
use std::sync::LazyLock;

/// Matches the line that opens component metadata: `@Component({`
static DECLARATION_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@Component\(").unwrap());

/// Matches `selector: 'app-foo'` and captures `app-foo`.
static SELECTOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"selector:\s*['"]([^'"]+)['"]"#).unwrap());

/// Matches `templateUrl: './foo.component.html'` and captures `./foo.component.html`.
static TEMPLATE_REF_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"templateUrl:\s*['"](\.{1,2}/[^'"]+)['"]"#).unwrap());

/// Matches `export class FooComponent implements OnInit {` and captures `FooComponent`.
static TYPE_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"export\s+(?:default\s+)?(?:abstract\s+)?class\s+([A-Za-z_$][\w$]*)(?:\s|\{|<|$)")
        .unwrap()
});

/// Extracts component metadata fields from single lines of a declaration file.
///
/// Implementations are stateless; the metadata scanner owns the
/// "first match wins" bookkeeping.
pub trait LineExtractor: Sync {
    /// True if this line opens the component metadata block.
    fn is_declaration_marker(&self, line: &str) -> bool;

    /// The quoted selector value, if the line declares one.
    fn selector<'a>(&self, line: &'a str) -> Option<&'a str>;

    /// The quoted relative template path, if the line declares one.
    fn template_ref<'a>(&self, line: &'a str) -> Option<&'a str>;

    /// The identifier introduced by an exported class declaration.
    fn type_name<'a>(&self, line: &'a str) -> Option<&'a str>;
}

/// Regex patterns for decorator-style component metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecoratorPatterns;

fn first_capture<'a>(regex: &Regex, line: &'a str) -> Option<&'a str> {
    regex
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

impl LineExtractor for DecoratorPatterns {
    fn is_declaration_marker(&self, line: &str) -> bool {
        DECLARATION_MARKER_REGEX.is_match(line)
    }

    fn selector<'a>(&self, line: &'a str) -> Option<&'a str> {
        first_capture(&SELECTOR_REGEX, line)
    }

    fn template_ref<'a>(&self, line: &'a str) -> Option<&'a str> {
        first_capture(&TEMPLATE_REF_REGEX, line)
    }

    fn type_name<'a>(&self, line: &'a str) -> Option<&'a str> {
        first_capture(&TYPE_NAME_REGEX, line)
    }
}
