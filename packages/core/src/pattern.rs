//! Glob filtering for directory listings.

use globset::Glob;

use crate::error::{Error, Result};

/// Filter listing entries against an optional glob pattern.
///
/// `None` keeps every entry. An empty pattern is a caller error. Patterns
/// match against entry names only, not full paths.
pub fn filter_entries(entries: Vec<String>, pattern: Option<&str>) -> Result<Vec<String>> {
    let pattern = match pattern {
        None => return Ok(entries),
        Some("") => {
            return Err(Error::invalid_argument(
                "search pattern must contain a value",
            ))
        }
        Some(p) => p,
    };

    let matcher = Glob::new(pattern)
        .map_err(|e| Error::invalid_argument(format!("bad search pattern '{}': {}", pattern, e)))?
        .compile_matcher();

    Ok(entries
        .into_iter()
        .filter(|name| matcher.is_match(name))
        .collect())
}
