//! Route-name extraction.
//!
//! # Responsibilities
//! - Check the request path lives under the proxy prefix
//! - Extract the first segment after the prefix as the route name
//! - Report the route's base path for the rewriter
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - Prefix must end on a segment boundary ("/proxyfoo" is not under "/proxy")
//! - Works on the raw path; percent-encoding is left untouched

use thiserror::Error;

/// A request path split into route name and route base path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    /// The route name segment.
    pub name: &'a str,
    /// `<prefix>/<name>`, the part of the path the rewriter strips.
    pub base_path: &'a str,
}

/// Why a path could not be split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SplitError {
    /// The path is not under the proxy prefix at all.
    #[error("path is not under the proxy prefix")]
    OutsidePrefix,
    /// The path is under the prefix but has no route-name segment.
    #[error("path has no route name segment")]
    MissingRouteName,
}

/// Split `path` into the route name and base path under `prefix`.
pub fn split_route<'a>(path: &'a str, prefix: &str) -> Result<RouteMatch<'a>, SplitError> {
    let rest = path.strip_prefix(prefix).ok_or(SplitError::OutsidePrefix)?;
    if rest.is_empty() {
        return Err(SplitError::MissingRouteName);
    }

    let after_slash = rest.strip_prefix('/').ok_or(SplitError::OutsidePrefix)?;
    let name = after_slash.split('/').next().unwrap_or_default();
    if name.is_empty() {
        return Err(SplitError::MissingRouteName);
    }

    let base_len = prefix.len() + 1 + name.len();
    Ok(RouteMatch {
        name,
        base_path: &path[..base_len],
    })
}
