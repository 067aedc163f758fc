//! Synchronous bridge over an async backend.

use std::future::Future;

use omnifs_core::{
    Backend, Error, OpenOptions, Result, StorageHandle, StoragePath, Stream,
};

use crate::store::AsyncBackend;

/// Adapts an [`AsyncBackend`] to the synchronous [`Backend`] contract.
///
/// The bridge owns a current-thread runtime and drives each native
/// operation to completion with `block_on`: the calling thread is parked on
/// the operation's own completion signal, never on a polling loop, and the
/// operation runs on a runtime nothing else depends on, so the blocked
/// thread can never be one the operation needs.
///
/// This is the one deliberate blocking point in the system. Calls must not
/// originate from inside an async runtime; that would block a thread the
/// caller's own tasks may need. The constraint is debug-asserted.
pub struct SyncBridge<A> {
    inner: A,
    runtime: tokio::runtime::Runtime,
}

impl<A: AsyncBackend> SyncBridge<A> {
    /// Wrap an async backend, building the dedicated runtime.
    pub fn new(inner: A) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(Error::backend)?;
        Ok(SyncBridge { inner, runtime })
    }

    /// Get a reference to the inner async backend.
    pub fn inner(&self) -> &A {
        &self.inner
    }

    fn wait<F: Future>(&self, operation: F) -> F::Output {
        debug_assert!(
            tokio::runtime::Handle::try_current().is_err(),
            "SyncBridge must not be driven from inside an async runtime"
        );
        self.runtime.block_on(operation)
    }
}

impl<A: AsyncBackend> Backend for SyncBridge<A> {
    fn open(
        &self,
        _handle: Option<&StorageHandle>,
        path: &StoragePath,
        options: &OpenOptions,
    ) -> Result<Box<dyn Stream>> {
        self.wait(self.inner.open(path, options))
    }

    fn open_read(
        &self,
        _handle: Option<&StorageHandle>,
        root: &StoragePath,
        name: &StoragePath,
    ) -> Result<Box<dyn Stream>> {
        self.wait(self.inner.open_read(root, name))
    }

    fn exists(&self, _handle: Option<&StorageHandle>, path: &StoragePath) -> Result<bool> {
        self.wait(self.inner.exists(path))
    }

    fn create(
        &self,
        _handle: Option<&StorageHandle>,
        path: &StoragePath,
    ) -> Result<Box<dyn Stream>> {
        self.wait(self.inner.create(path))
    }

    fn delete(&self, _handle: Option<&StorageHandle>, path: &StoragePath) -> Result<()> {
        self.wait(self.inner.delete(path))
    }

    fn list_files(
        &self,
        _handle: Option<&StorageHandle>,
        dir: &StoragePath,
        pattern: Option<&str>,
    ) -> Result<Vec<String>> {
        self.wait(self.inner.list_files(dir, pattern))
    }

    fn list_directories(
        &self,
        _handle: Option<&StorageHandle>,
        dir: &StoragePath,
    ) -> Result<Vec<String>> {
        self.wait(self.inner.list_directories(dir))
    }

    fn directory_exists(&self, _handle: Option<&StorageHandle>, path: &StoragePath) -> Result<bool> {
        self.wait(self.inner.directory_exists(path))
    }

    fn create_directory(&self, _handle: Option<&StorageHandle>, path: &StoragePath) -> Result<()> {
        self.wait(self.inner.create_directory(path))
    }

    fn delete_directory(&self, _handle: Option<&StorageHandle>, path: &StoragePath) -> Result<()> {
        self.wait(self.inner.delete_directory(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DocLibrary;
    use omnifs_core::{Access, OpenMode};
    use std::io::{Read, Write};

    #[test]
    fn bridge_exposes_synchronous_semantics() {
        let dir = tempfile::tempdir().unwrap();
        let library = DocLibrary::open_library(dir.path()).unwrap();
        let path = StoragePath::new("letter.txt");

        let mut stream = library.create(None, &path).unwrap();
        stream.write_all(b"dear sir").unwrap();
        drop(stream);

        assert!(library.exists(None, &path).unwrap());

        let mut stream = library
            .open_read(None, &StoragePath::new(""), &path)
            .unwrap();
        let mut content = String::new();
        stream.read_to_string(&mut content).unwrap();
        assert_eq!(content, "dear sir");
    }

    #[test]
    fn failures_surface_synchronously() {
        let dir = tempfile::tempdir().unwrap();
        let library = DocLibrary::open_library(dir.path()).unwrap();

        let err = library
            .open(
                None,
                &StoragePath::new("ghost"),
                &OpenOptions::new(OpenMode::Open, Access::Read),
            )
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn open_or_create_reads_existing_content_from_offset_zero() {
        let dir = tempfile::tempdir().unwrap();
        let library = DocLibrary::open_library(dir.path()).unwrap();
        std::fs::write(dir.path().join("journal"), b"first entry").unwrap();

        let mut stream = library
            .open(
                None,
                &StoragePath::new("journal"),
                &OpenOptions::new(OpenMode::OpenOrCreate, Access::ReadWrite),
            )
            .unwrap();

        let mut content = String::new();
        stream.read_to_string(&mut content).unwrap();
        assert_eq!(content, "first entry");
    }

    #[test]
    fn directory_operations_bridge() {
        let dir = tempfile::tempdir().unwrap();
        let library = DocLibrary::open_library(dir.path()).unwrap();
        let docs = StoragePath::new("reports");

        library.create_directory(None, &docs).unwrap();
        library.create_directory(None, &docs).unwrap();
        assert!(library.directory_exists(None, &docs).unwrap());

        library.create(None, &StoragePath::new("reports/q1.txt")).unwrap();
        assert_eq!(
            library.list_files(None, &docs, None).unwrap(),
            vec!["q1.txt"]
        );

        library.delete(None, &StoragePath::new("reports/q1.txt")).unwrap();
        library.delete_directory(None, &docs).unwrap();
        assert!(!library.directory_exists(None, &docs).unwrap());
    }
}
