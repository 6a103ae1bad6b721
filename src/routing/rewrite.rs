//! Forwarded path computation.

/// Compute the path (and query) sent to the backend.
///
/// Strips `base_path` from `path`; an empty remainder becomes `/`. A path
/// that is not under `base_path` also becomes `/`. A non-empty raw query is
/// appended verbatim.
pub fn rewrite_path(path: &str, base_path: &str, raw_query: Option<&str>) -> String {
    let remainder = match path.strip_prefix(base_path) {
        Some(rest) if !rest.is_empty() => rest,
        _ => "/",
    };

    match raw_query {
        Some(query) if !query.is_empty() => format!("{remainder}?{query}"),
        _ => remainder.to_string(),
    }
}
