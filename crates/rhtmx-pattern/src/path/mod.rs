//! Path utilities for validation and normalization
//!
//! All functions are **pure**: given same input, always produce same output with no side effects.

use std::borrow::Cow;

/// Validates if a path is in canonical form
///
/// # Rules
///
/// - Must start with `/`
/// - Must not contain `//`
/// - Must not end with `/` (except root `/`)
///
/// # Examples
///
/// ```
/// use rhtmx_pattern::path::is_canonical;
///
/// assert!(is_canonical("/"));
/// assert!(is_canonical("/users/123"));
///
/// assert!(!is_canonical(""));
/// assert!(!is_canonical("about")); // Missing leading /
/// assert!(!is_canonical("/about/")); // Trailing /
/// assert!(!is_canonical("/about//page")); // Double //
/// ```
pub fn is_canonical(path: &str) -> bool {
    if !path.starts_with('/') || path.contains("//") {
        return false;
    }

    path == "/" || !path.ends_with('/')
}

/// Normalizes a path before matching
///
/// Returns `None` for a path without a leading `/`. Otherwise runs of `/`
/// collapse into one and a trailing `/` is dropped (`/` itself stays).
///
/// Returns `Cow::Borrowed` when the input is already canonical.
///
/// # Examples
///
/// ```
/// use rhtmx_pattern::path::normalize_path;
/// use std::borrow::Cow;
///
/// let path = normalize_path("/about").unwrap();
/// assert!(matches!(path, Cow::Borrowed("/about")));
///
/// assert_eq!(normalize_path("/path//to///page/").unwrap(), "/path/to/page");
/// assert_eq!(normalize_path("////").unwrap(), "/");
/// assert_eq!(normalize_path("about"), None);
/// ```
pub fn normalize_path(path: &str) -> Option<Cow<'_, str>> {
    if !path.starts_with('/') {
        return None;
    }

    if is_canonical(path) {
        return Some(Cow::Borrowed(path));
    }

    let normalized = path
        .split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    Some(Cow::Owned(format!("/{}", normalized)))
}
