//! Helpers for turning recovered asset names into path components.
//!
//! Symbol and animation names come out of the containers' hash tables and
//! are used to name exported files, so they are checked before they touch
//! the filesystem.

/// Returns true if a name is safe to use as a single path component on all platforms.
///
/// Rules:
/// - Must be non-empty and not "." or ".."
/// - Must not contain path separators ('/' or '\\')
/// - Must not contain control characters or NUL
/// - Must not contain Windows-reserved filename characters
/// - Must not end with '.' or space (Windows restriction)
pub fn is_safe_path_component(name: &str) -> bool {
    if name.is_empty() || name == "." || name == ".." {
        return false;
    }

    if name.ends_with('.') || name.ends_with(' ') {
        return false;
    }

    name.chars().all(|c| !is_reserved_char(c))
}

fn is_reserved_char(c: char) -> bool {
    c == '/'
        || c == '\\'
        || c.is_control()
        || matches!(c, ':' | '*' | '?' | '"' | '<' | '>' | '|')
}

/// Replace every reserved character with `_`, falling back to `fallback`
/// when nothing usable is left.
pub fn sanitize_path_component(name: &str, fallback: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if is_reserved_char(c) { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim_end_matches(['.', ' ']).to_string();
    if is_safe_path_component(&cleaned) {
        cleaned
    } else {
        fallback.to_string()
    }
}
