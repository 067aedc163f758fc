//! Storage path type with a canonical separator.

use std::fmt;
use std::path::PathBuf;

/// The canonical path separator used by every OmniFS backend.
pub const SEPARATOR: char = '/';

/// A normalized storage path.
///
/// Asset names arrive from callers with whatever separator their tooling
/// produced; `StoragePath` rewrites foreign (`\`) separators to
/// [`SEPARATOR`], collapses duplicate separators, and strips a trailing
/// separator. A leading separator is preserved so absolute paths stay
/// absolute.
///
/// Normalization happens once, in [`StoragePath::new`], and is idempotent:
/// re-parsing an already-normalized path yields an equal value.
///
/// # Examples
///
/// ```rust
/// use omnifs_core::StoragePath;
///
/// let p = StoragePath::new(r"textures\ui\button.png");
/// assert_eq!(p.as_str(), "textures/ui/button.png");
/// assert_eq!(StoragePath::new(p.as_str()), p);
/// ```
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct StoragePath {
    raw: String,
}

impl StoragePath {
    /// Normalize a path string.
    pub fn new(path: impl AsRef<str>) -> Self {
        let path = path.as_ref();
        let absolute = path.starts_with(['/', '\\']);

        let mut raw = String::with_capacity(path.len() + 1);
        if absolute {
            raw.push(SEPARATOR);
        }
        for component in path.split(['/', '\\']).filter(|c| !c.is_empty()) {
            if raw.len() > usize::from(absolute) {
                raw.push(SEPARATOR);
            }
            raw.push_str(component);
        }

        StoragePath { raw }
    }

    /// The normalized path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether this path has no components.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty() || self.raw == "/"
    }

    /// Append `other` to this path, normalizing the appended part.
    ///
    /// Joining an empty path returns `self` unchanged.
    #[must_use]
    pub fn join(&self, other: &str) -> StoragePath {
        if other.is_empty() {
            return self.clone();
        }
        if self.raw.is_empty() {
            return StoragePath::new(other);
        }
        StoragePath::new(format!("{}{}{}", self.raw, SEPARATOR, other))
    }

    /// The final component, if any.
    pub fn file_name(&self) -> Option<&str> {
        if self.is_empty() {
            return None;
        }
        Some(match self.raw.rfind(SEPARATOR) {
            Some(i) => &self.raw[i + 1..],
            None => &self.raw,
        })
    }

    /// Everything before the final component.
    ///
    /// A single-component path has an empty parent; an empty path has none.
    pub fn parent(&self) -> Option<StoragePath> {
        if self.is_empty() {
            return None;
        }
        Some(match self.raw.rfind(SEPARATOR) {
            Some(0) => StoragePath::new("/"),
            Some(i) => StoragePath {
                raw: self.raw[..i].to_string(),
            },
            None => StoragePath::default(),
        })
    }

    /// The extension of the final component, including the leading dot.
    ///
    /// Returns `None` when the final component has no dot, ends with a dot,
    /// or is a dotfile (`.config` has no extension).
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name()?;
        match name.rfind('.') {
            Some(0) | None => None,
            Some(i) if i + 1 == name.len() => None,
            Some(i) => Some(&name[i..]),
        }
    }

    /// The final component with its extension removed.
    pub fn file_stem(&self) -> Option<&str> {
        let name = self.file_name()?;
        match self.extension() {
            Some(ext) => Some(&name[..name.len() - ext.len()]),
            None => Some(name),
        }
    }

    /// Convert to a host path for handing to OS file APIs.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.raw)
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl From<&str> for StoragePath {
    fn from(s: &str) -> Self {
        StoragePath::new(s)
    }
}

impl AsRef<str> for StoragePath {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_backslashes() {
        let p = StoragePath::new(r"a\b\c");
        assert_eq!(p.as_str(), "a/b/c");
    }

    #[test]
    fn collapses_duplicate_separators() {
        assert_eq!(StoragePath::new("a//b///c").as_str(), "a/b/c");
        assert_eq!(StoragePath::new(r"a\\b").as_str(), "a/b");
    }

    #[test]
    fn strips_trailing_separator() {
        assert_eq!(StoragePath::new("a/b/").as_str(), "a/b");
        assert_eq!(StoragePath::new(r"a\b\").as_str(), "a/b");
    }

    #[test]
    fn preserves_leading_separator() {
        assert_eq!(StoragePath::new("/a/b").as_str(), "/a/b");
        assert_eq!(StoragePath::new(r"\a\b").as_str(), "/a/b");
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in [r"a\b/c", "//x//y//", r"\mixed/seps\here", "", "/", "plain"] {
            let once = StoragePath::new(raw);
            let twice = StoragePath::new(once.as_str());
            assert_eq!(once, twice, "not idempotent for {:?}", raw);
        }
    }

    #[test]
    fn empty_paths() {
        assert!(StoragePath::new("").is_empty());
        assert!(StoragePath::new("/").is_empty());
        assert!(!StoragePath::new("a").is_empty());
    }

    #[test]
    fn join_normalizes_appended_part() {
        let root = StoragePath::new("content");
        assert_eq!(root.join(r"fx\explosion").as_str(), "content/fx/explosion");
    }

    #[test]
    fn join_with_empty_sides() {
        let root = StoragePath::new("content");
        assert_eq!(root.join(""), root);
        assert_eq!(StoragePath::new("").join("a/b").as_str(), "a/b");
    }

    #[test]
    fn file_name_and_parent() {
        let p = StoragePath::new("a/b/c.txt");
        assert_eq!(p.file_name(), Some("c.txt"));
        assert_eq!(p.parent(), Some(StoragePath::new("a/b")));

        let single = StoragePath::new("c.txt");
        assert_eq!(single.file_name(), Some("c.txt"));
        assert_eq!(single.parent(), Some(StoragePath::default()));

        assert_eq!(StoragePath::new("").parent(), None);
    }

    #[test]
    fn parent_of_root_level_entry() {
        let p = StoragePath::new("/top");
        assert_eq!(p.parent(), Some(StoragePath::new("/")));
    }

    #[test]
    fn extension_handling() {
        assert_eq!(StoragePath::new("a/b.png").extension(), Some(".png"));
        assert_eq!(StoragePath::new("a/b").extension(), None);
        assert_eq!(StoragePath::new("a/.hidden").extension(), None);
        assert_eq!(StoragePath::new("a/b.").extension(), None);
        assert_eq!(StoragePath::new("a/b.tar.gz").extension(), Some(".gz"));
    }

    #[test]
    fn file_stem_handling() {
        assert_eq!(StoragePath::new("a/b.png").file_stem(), Some("b"));
        assert_eq!(StoragePath::new("a/b").file_stem(), Some("b"));
        assert_eq!(StoragePath::new("a/b.tar.gz").file_stem(), Some("b.tar"));
    }

    #[test]
    fn display_matches_as_str() {
        let p = StoragePath::new(r"x\y");
        assert_eq!(format!("{}", p), "x/y");
    }
}
