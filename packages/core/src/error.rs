//! Error taxonomy for the backend contract.
//!
//! Backend-native failures (`std::io::Error` and friends) are classified at
//! the backend boundary into this taxonomy; nothing backend-specific crosses
//! it. Existence checks report absence through `Ok(false)`, never through an
//! error.

use std::io;

use crate::path::StoragePath;

/// Errors produced by any storage backend.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The file does not exist.
    #[error("file not found: {path}")]
    NotFound { path: String },

    /// The containing directory does not exist.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: String },

    /// The store refused the operation.
    #[error("access denied: {path}")]
    AccessDenied { path: String },

    /// The mode/access combination is invalid, or the backend cannot
    /// honor it (e.g. write intent on a read-only store).
    #[error("unsupported open mode: {message}")]
    UnsupportedMode { message: String },

    /// A caller error, such as an empty search pattern.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The backend requires a storage handle, but none was supplied and no
    /// process-wide default is registered.
    #[error("no storage handle supplied and no default handle is set")]
    MissingStorageHandle,

    /// Unclassified backend failure, wrapping the native cause.
    #[error("backend operation failed")]
    Backend {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    pub fn not_found(path: &StoragePath) -> Self {
        Error::NotFound {
            path: path.as_str().to_string(),
        }
    }

    pub fn directory_not_found(path: &StoragePath) -> Self {
        Error::DirectoryNotFound {
            path: path.as_str().to_string(),
        }
    }

    pub fn access_denied(path: &StoragePath) -> Self {
        Error::AccessDenied {
            path: path.as_str().to_string(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn backend(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Error::Backend {
            source: Box::new(source),
        }
    }

    /// Classify a native I/O failure against the path that produced it.
    pub fn from_io(err: io::Error, path: &StoragePath) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Error::not_found(path),
            io::ErrorKind::PermissionDenied => Error::access_denied(path),
            _ => Error::backend(err),
        }
    }

    /// Classify a native I/O failure from a directory operation, where a
    /// missing path means the directory itself is absent.
    pub fn from_dir_io(err: io::Error, dir: &StoragePath) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Error::directory_not_found(dir),
            io::ErrorKind::PermissionDenied => Error::access_denied(dir),
            _ => Error::backend(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_not_found_classifies() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let err = Error::from_io(io_err, &StoragePath::new("a/b"));
        assert!(matches!(err, Error::NotFound { ref path } if path == "a/b"));
    }

    #[test]
    fn io_permission_denied_classifies() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "no");
        let err = Error::from_io(io_err, &StoragePath::new("a/b"));
        assert!(matches!(err, Error::AccessDenied { .. }));
    }

    #[test]
    fn other_io_errors_are_wrapped() {
        let io_err = io::Error::new(io::ErrorKind::Interrupted, "eintr");
        let err = Error::from_io(io_err, &StoragePath::new("a"));
        assert!(matches!(err, Error::Backend { .. }));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn dir_classification_maps_not_found_to_directory() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let err = Error::from_dir_io(io_err, &StoragePath::new("missing/dir"));
        assert!(matches!(err, Error::DirectoryNotFound { .. }));
    }

    #[test]
    fn display_includes_path() {
        let err = Error::not_found(&StoragePath::new("content/logo.png"));
        assert!(err.to_string().contains("content/logo.png"));
    }
}
