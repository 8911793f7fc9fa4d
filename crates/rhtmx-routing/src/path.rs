//! Path utilities for route patterns and base paths
//!
//! All functions are pure: given same input, always produce same output.

use std::borrow::Cow;

/// Validates if a path is in canonical form
///
/// # Rules
///
/// - Must start with `/`
/// - Must not contain `//` or `\`
/// - Must not end with `/` (except root `/`)
/// - Must not be empty
///
/// # Examples
///
/// ```
/// use rhtmx_routing::path::is_valid_path;
///
/// assert!(is_valid_path("/"));
/// assert!(is_valid_path("/admin"));
/// assert!(!is_valid_path("admin"));
/// assert!(!is_valid_path("/admin/"));
/// ```
pub fn is_valid_path(path: &str) -> bool {
    if path.is_empty() || !path.starts_with('/') {
        return false;
    }

    if path.contains("//") || path.contains('\\') {
        return false;
    }

    path == "/" || !path.ends_with('/')
}

/// Normalize a path to canonical form
///
/// Returns `Cow::Borrowed` when input is already valid.
///
/// # Examples
///
/// ```
/// use rhtmx_routing::path::normalize_path;
///
/// assert_eq!(normalize_path("/admin/"), "/admin");
/// assert_eq!(normalize_path("\\admin\\users"), "/admin/users");
/// assert_eq!(normalize_path("app//admin"), "/app/admin");
/// assert_eq!(normalize_path(""), "/");
/// ```
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    if is_valid_path(path) {
        return Cow::Borrowed(path);
    }

    let normalized = path
        .replace('\\', "/")
        .split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    if normalized.is_empty() {
        Cow::Borrowed("/")
    } else {
        Cow::Owned(format!("/{}", normalized))
    }
}

/// Join a base path (e.g. `/app`) and a route path (e.g. `/admin`)
///
/// A missing or root base path leaves the route path unchanged.
pub fn join_paths(base: Option<&str>, path: &str) -> String {
    let path = normalize_path(path);
    match base.map(normalize_path) {
        Some(base) if base != "/" => {
            if path == "/" {
                base.into_owned()
            } else {
                format!("{}{}", base, path)
            }
        }
        _ => path.into_owned(),
    }
}
