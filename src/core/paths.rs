//! Template path normalization.
//!
//! Declaration files reference their markup relative to themselves
//! (`./foo.component.html`). Two components in different directories can
//! share a basename, so every template path is rewritten into a path rooted
//! at a stable ancestor (the anchor, `src/app` by default). Markup files found
//! on disk go through the same rewrite before they are looked up.

use std::path::{Component, Path};

/// Resolve `.` and `..` lexically and render the path with `/` separators.
///
/// Leading `..` segments that cannot be popped are kept.
pub fn lexical_normalize(path: &Path) -> String {
    let mut prefix = String::new();
    let mut segments: Vec<String> = Vec::new();

    for component in path.components() {
        match component {
            Component::Prefix(p) => prefix = p.as_os_str().to_string_lossy().into_owned(),
            Component::RootDir => prefix.push('/'),
            Component::CurDir => {}
            Component::ParentDir => {
                if segments.last().is_some_and(|s| s != "..") {
                    segments.pop();
                } else if prefix.is_empty() {
                    segments.push("..".to_string());
                }
            }
            Component::Normal(s) => segments.push(s.to_string_lossy().into_owned()),
        }
    }

    format!("{}{}", prefix, segments.join("/"))
}

/// Root a normalized path at the last occurrence of `anchor`.
///
/// Falls back to the path relative to `root`, then to the path itself.
pub fn anchor_path(normalized: &str, anchor: &str, root: &Path) -> String {
    let anchor = anchor.trim_matches('/');
    if !anchor.is_empty() {
        let needle = format!("/{}/", anchor);
        let haystack = format!("/{}", normalized);
        if let Some(pos) = haystack.rfind(&needle) {
            return haystack[pos + 1..].to_string();
        }
    }

    let root = lexical_normalize(root);
    let root = root.trim_end_matches('/');
    if !root.is_empty()
        && let Some(rest) = normalized.strip_prefix(root)
        && let Some(rest) = rest.strip_prefix('/')
    {
        return rest.to_string();
    }

    normalized.to_string()
}

/// True if `path` ends with `suffix` on a `/` segment boundary.
///
/// `sidenav/nav.component.html` does not end with `nav/nav.component.html`.
pub fn ends_with_segments(path: &str, suffix: &str) -> bool {
    match path.strip_suffix(suffix) {
        Some(rest) => rest.is_empty() || rest.ends_with('/'),
        None => false,
    }
}

/// Build the normalized template path for a declaration file's template reference.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use comptree::core::normalize_template_path;
///
/// let path = normalize_template_path(
///     Path::new("/work/portal/src/app/jobs-list/jobs-list.component.ts"),
///     "./jobs-list.component.html",
///     "src/app",
///     Path::new("/work/portal/src/app"),
/// );
/// assert_eq!(path, "src/app/jobs-list/jobs-list.component.html");
/// ```
pub fn normalize_template_path(
    declaration_path: &Path,
    template_ref: &str,
    anchor: &str,
    root: &Path,
) -> String {
    let dir = declaration_path.parent().unwrap_or_else(|| Path::new(""));
    let joined = lexical_normalize(&dir.join(template_ref));
    anchor_path(&joined, anchor, root)
}

/// Normalize a markup file path found on disk so it can be compared with
/// template paths produced by [`normalize_template_path`].
pub fn normalize_markup_path(markup_path: &Path, anchor: &str, root: &Path) -> String {
    anchor_path(&lexical_normalize(markup_path), anchor, root)
}
