//! The capability contract every storage backend implements, and the opaque
//! handle type for backends that scope operations to a session.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::mode::OpenOptions;
use crate::path::StoragePath;
use crate::stream::Stream;

/// An opaque reference to a backend storage session.
///
/// Handles are created by the backend that understands them (the container
/// backend wraps its session type in one) and passed by reference into any
/// call that needs backend context. Backends that need no session context
/// ignore the handle. The facade may hold one process-wide default handle;
/// it never inspects the contents.
#[derive(Clone)]
pub struct StorageHandle {
    inner: Arc<dyn Any + Send + Sync>,
}

impl StorageHandle {
    /// Wrap a backend session in an opaque handle.
    pub fn new<T: Any + Send + Sync>(session: T) -> Self {
        StorageHandle {
            inner: Arc::new(session),
        }
    }

    /// Recover the backend session. Returns `None` when the handle was
    /// created by a different backend.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }
}

impl fmt::Debug for StorageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StorageHandle(..)")
    }
}

/// The uniform, synchronous operation set of a storage backend.
///
/// Every method takes an optional [`StorageHandle`]; the facade resolves the
/// effective handle (explicit argument, then its default) before dispatch.
/// Paths arrive already normalized to the canonical separator.
///
/// Contract obligations, uniform across backends:
///
/// - `exists`/`directory_exists` report absence as `Ok(false)`, never as an
///   error.
/// - `create_directory` is idempotent; creating an existing directory
///   succeeds.
/// - `list_files` with `Some("")` fails with `InvalidArgument`; with `None`
///   it returns all entries in the backend's order.
/// - No operation blocks indefinitely. Backends whose native primitives are
///   asynchronous bound each call by that operation's own completion signal,
///   never by polling.
///
/// # Object Safety
///
/// This trait is object-safe: the facade holds a `Box<dyn Backend>`.
pub trait Backend: Send + Sync {
    /// Open a file with the full mode/access/share intent.
    fn open(
        &self,
        handle: Option<&StorageHandle>,
        path: &StoragePath,
        options: &OpenOptions,
    ) -> Result<Box<dyn Stream>>;

    /// Open `name` under `root` for reading.
    fn open_read(
        &self,
        handle: Option<&StorageHandle>,
        root: &StoragePath,
        name: &StoragePath,
    ) -> Result<Box<dyn Stream>>;

    /// Whether a file exists at `path`.
    fn exists(&self, handle: Option<&StorageHandle>, path: &StoragePath) -> Result<bool>;

    /// Create a file with read/write access, replacing existing content.
    fn create(&self, handle: Option<&StorageHandle>, path: &StoragePath)
        -> Result<Box<dyn Stream>>;

    /// Delete a file.
    fn delete(&self, handle: Option<&StorageHandle>, path: &StoragePath) -> Result<()>;

    /// List file names in `dir`, optionally filtered by a glob over names.
    fn list_files(
        &self,
        handle: Option<&StorageHandle>,
        dir: &StoragePath,
        pattern: Option<&str>,
    ) -> Result<Vec<String>>;

    /// List directory names in `dir`.
    fn list_directories(
        &self,
        handle: Option<&StorageHandle>,
        dir: &StoragePath,
    ) -> Result<Vec<String>>;

    /// Whether a directory exists at `path`.
    fn directory_exists(&self, handle: Option<&StorageHandle>, path: &StoragePath) -> Result<bool>;

    /// Create a directory (and missing parents).
    fn create_directory(&self, handle: Option<&StorageHandle>, path: &StoragePath) -> Result<()>;

    /// Delete an empty directory.
    fn delete_directory(&self, handle: Option<&StorageHandle>, path: &StoragePath) -> Result<()>;
}
