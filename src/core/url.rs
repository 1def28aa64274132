//! Site URL helpers used as collaborators by the command-line front end.
//!
//! Page identifiers are slash-separated folder paths (`docs/intro`); each
//! page renders to `<id>/index.html`, except the index page which sits at
//! the site root.

use std::path::{Component, Path};

/// Split a URL into path and suffix (`?query` and/or `#fragment`).
///
/// ```ignore
/// assert_eq!(split_path_suffix("/about#team"), ("/about", "#team"));
/// assert_eq!(split_path_suffix("/about"), ("/about", ""));
/// ```
#[inline]
pub fn split_path_suffix(url: &str) -> (&str, &str) {
    match url.find(['?', '#']) {
        Some(pos) => url.split_at(pos),
        None => (url, ""),
    }
}

/// Make a root-relative `url` relative to the page directory of `id`.
///
/// Targets not starting with `/` are already relative (or use a scheme)
/// and are returned unchanged, as are protocol-relative `//host` targets.
/// `index` names the page living at the root.
pub fn relative_url(url: &str, id: &str, index: &str) -> String {
    if !url.starts_with('/') || url.starts_with("//") {
        return url.to_string();
    }

    let (path, suffix) = split_path_suffix(url);
    let from: Vec<&str> = if id == index {
        Vec::new()
    } else {
        segments(id).collect()
    };
    let to: Vec<&str> = segments(path).collect();

    let common = from
        .iter()
        .zip(&to)
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = "../".repeat(from.len() - common);
    relative.push_str(&to[common..].join("/"));

    if path.len() > 1 && path.ends_with('/') && common < to.len() {
        relative.push('/');
    }
    if relative.is_empty() {
        relative.push_str("./");
    }

    relative.push_str(suffix);
    relative
}

/// Derive a page identifier from a source file path.
///
/// The path is taken relative to `content_dir`, the extension is dropped and
/// a trailing `index` segment collapses into its folder. An empty result is
/// the site `index`.
pub fn page_id_for(path: &Path, content_dir: &Path, index: &str) -> String {
    let relative = path.strip_prefix(content_dir).unwrap_or(path);
    let stem = relative.with_extension("");

    let mut parts: Vec<String> = stem
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if parts.last().is_some_and(|last| last == "index") {
        parts.pop();
    }

    if parts.is_empty() {
        index.to_string()
    } else {
        parts.join("/")
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}
