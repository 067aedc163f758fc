//! The facade value: one backend, one default handle, one entry point.

use std::sync::RwLock;

use log::debug;
use omnifs_core::{Backend, OpenOptions, Result, StorageHandle, StoragePath, Stream};

use crate::config::{BackendConfig, Environment};

/// A virtual file system bound to a single backend.
///
/// The backend is selected at construction and immutable afterwards. Every
/// operation takes a path as a string slice and normalizes the separators
/// exactly once, here, before dispatch; backends only ever see
/// [`StoragePath`] values.
///
/// Operations also take an optional [`StorageHandle`]. The effective handle
/// is the explicit argument when given, otherwise the facade's default
/// (see [`Vfs::set_default_handle`]), otherwise none. Backends that need no
/// session context ignore it.
pub struct Vfs {
    backend: Box<dyn Backend>,
    default_handle: RwLock<Option<StorageHandle>>,
}

impl Vfs {
    /// Wrap an already-constructed backend.
    pub fn new(backend: Box<dyn Backend>) -> Self {
        Vfs {
            backend,
            default_handle: RwLock::new(None),
        }
    }

    /// Build the backend described by `config` and wrap it.
    pub fn from_config(config: BackendConfig, env: &Environment) -> Result<Self> {
        Ok(Vfs::new(config.build(env)?))
    }

    /// Install the process-default storage handle, used whenever a call
    /// passes no explicit handle.
    pub fn set_default_handle(&self, handle: StorageHandle) {
        *self.lock_default() = Some(handle);
    }

    /// Remove the process-default storage handle.
    pub fn clear_default_handle(&self) {
        *self.lock_default() = None;
    }

    fn lock_default(&self) -> std::sync::RwLockWriteGuard<'_, Option<StorageHandle>> {
        self.default_handle
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run `op` with the effective handle: the explicit one when given,
    /// otherwise the default.
    fn with_handle<T>(
        &self,
        explicit: Option<&StorageHandle>,
        op: impl FnOnce(Option<&StorageHandle>) -> Result<T>,
    ) -> Result<T> {
        if explicit.is_some() {
            return op(explicit);
        }
        let default = self
            .default_handle
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        op(default.as_ref())
    }

    /// Open a file with the full mode/access/share intent.
    pub fn open(
        &self,
        handle: Option<&StorageHandle>,
        path: &str,
        options: &OpenOptions,
    ) -> Result<Box<dyn Stream>> {
        let path = StoragePath::new(path);
        self.with_handle(handle, |h| self.backend.open(h, &path, options))
    }

    /// Open `name` under `root` for reading.
    pub fn open_read(
        &self,
        handle: Option<&StorageHandle>,
        root: &str,
        name: &str,
    ) -> Result<Box<dyn Stream>> {
        let root = StoragePath::new(root);
        let name = StoragePath::new(name);
        self.with_handle(handle, |h| self.backend.open_read(h, &root, &name))
    }

    /// Whether a file exists at `path`. Absence is `Ok(false)`, not an error.
    pub fn exists(&self, handle: Option<&StorageHandle>, path: &str) -> Result<bool> {
        let path = StoragePath::new(path);
        self.with_handle(handle, |h| self.backend.exists(h, &path))
    }

    /// Create a file with read/write access, replacing existing content.
    pub fn create(&self, handle: Option<&StorageHandle>, path: &str) -> Result<Box<dyn Stream>> {
        let path = StoragePath::new(path);
        self.with_handle(handle, |h| self.backend.create(h, &path))
    }

    /// Delete a file.
    pub fn delete(&self, handle: Option<&StorageHandle>, path: &str) -> Result<()> {
        let path = StoragePath::new(path);
        self.with_handle(handle, |h| self.backend.delete(h, &path))
    }

    /// List file names in `dir`, optionally filtered by a glob over names.
    pub fn list_files(
        &self,
        handle: Option<&StorageHandle>,
        dir: &str,
        pattern: Option<&str>,
    ) -> Result<Vec<String>> {
        let dir = StoragePath::new(dir);
        self.with_handle(handle, |h| self.backend.list_files(h, &dir, pattern))
    }

    /// List directory names in `dir`.
    pub fn list_directories(
        &self,
        handle: Option<&StorageHandle>,
        dir: &str,
    ) -> Result<Vec<String>> {
        let dir = StoragePath::new(dir);
        self.with_handle(handle, |h| self.backend.list_directories(h, &dir))
    }

    /// Whether a directory exists at `path`.
    pub fn directory_exists(&self, handle: Option<&StorageHandle>, path: &str) -> Result<bool> {
        let path = StoragePath::new(path);
        self.with_handle(handle, |h| self.backend.directory_exists(h, &path))
    }

    /// Create a directory and any missing parents. Idempotent.
    pub fn create_directory(&self, handle: Option<&StorageHandle>, path: &str) -> Result<()> {
        let path = StoragePath::new(path);
        self.with_handle(handle, |h| self.backend.create_directory(h, &path))
    }

    /// Delete an empty directory.
    pub fn delete_directory(&self, handle: Option<&StorageHandle>, path: &str) -> Result<()> {
        let path = StoragePath::new(path);
        self.with_handle(handle, |h| self.backend.delete_directory(h, &path))
    }

    /// Resolve `name` to a filename that exists on the backend.
    ///
    /// Resolution order:
    ///
    /// 1. `name` exists verbatim — return it unchanged.
    /// 2. `name` already carries a non-empty extension — it named a specific
    ///    file that is not there; return `None` without guessing.
    /// 3. Otherwise, the first `name + ext` over `extensions`, in the given
    ///    order, that exists.
    /// 4. `None`.
    ///
    /// Each candidate costs exactly one existence check. No case folding is
    /// attempted here; backends that match names case-insensitively do so in
    /// their own `exists`.
    pub fn normalize_filename(
        &self,
        handle: Option<&StorageHandle>,
        name: &str,
        extensions: &[&str],
    ) -> Result<Option<String>> {
        let path = StoragePath::new(name);
        if self.with_handle(handle, |h| self.backend.exists(h, &path))? {
            return Ok(Some(name.to_string()));
        }
        if path.extension().is_some() {
            debug!("filename {name} has an extension but does not exist");
            return Ok(None);
        }
        for ext in extensions {
            let candidate = format!("{name}{ext}");
            let candidate_path = StoragePath::new(&candidate);
            if self.with_handle(handle, |h| self.backend.exists(h, &candidate_path))? {
                debug!("resolved filename {name} to {candidate}");
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use omnifs_local::LocalFileSystem;

    // The local backend resolves relative paths against the working
    // directory, so these tests use absolute paths under a tempdir.
    fn abs(dir: &tempfile::TempDir, name: &str) -> String {
        dir.path().join(name).to_string_lossy().into_owned()
    }

    #[test]
    fn paths_are_normalized_before_dispatch() {
        let dir = tempfile::tempdir().unwrap();
        let vfs = Vfs::new(Box::new(LocalFileSystem::new()));
        let path = abs(&dir, "nested");

        vfs.create_directory(None, &path.replace('/', "\\"))
            .unwrap();
        assert!(vfs.directory_exists(None, &path).unwrap());
    }

    #[test]
    fn normalize_filename_returns_verbatim_match() {
        let dir = tempfile::tempdir().unwrap();
        let vfs = Vfs::new(Box::new(LocalFileSystem::new()));
        std::fs::write(dir.path().join("settings.json"), b"{}").unwrap();

        let name = abs(&dir, "settings.json");
        assert_eq!(
            vfs.normalize_filename(None, &name, &[".xml"]).unwrap(),
            Some(name)
        );
    }

    #[test]
    fn normalize_filename_refuses_to_guess_past_an_extension() {
        let dir = tempfile::tempdir().unwrap();
        let vfs = Vfs::new(Box::new(LocalFileSystem::new()));
        std::fs::write(dir.path().join("settings.json"), b"{}").unwrap();

        let name = abs(&dir, "settings.xml");
        assert_eq!(
            vfs.normalize_filename(None, &name, &[".json"]).unwrap(),
            None
        );
    }

    #[test]
    fn normalize_filename_probes_extensions_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let vfs = Vfs::new(Box::new(LocalFileSystem::new()));
        std::fs::write(dir.path().join("logo.png"), b"png").unwrap();
        std::fs::write(dir.path().join("logo.bmp"), b"bmp").unwrap();

        let name = abs(&dir, "logo");
        assert_eq!(
            vfs.normalize_filename(None, &name, &[".bmp", ".png"])
                .unwrap(),
            Some(format!("{name}.bmp"))
        );
    }

    #[test]
    fn normalize_filename_none_when_nothing_matches() {
        let dir = tempfile::tempdir().unwrap();
        let vfs = Vfs::new(Box::new(LocalFileSystem::new()));

        let name = abs(&dir, "missing");
        assert_eq!(
            vfs.normalize_filename(None, &name, &[".png", ".jpg"])
                .unwrap(),
            None
        );
    }

    #[test]
    fn dotfile_names_count_as_extensionless() {
        let dir = tempfile::tempdir().unwrap();
        let vfs = Vfs::new(Box::new(LocalFileSystem::new()));
        std::fs::write(dir.path().join(".profile.bak"), b"x").unwrap();

        let name = abs(&dir, ".profile");
        assert_eq!(
            vfs.normalize_filename(None, &name, &[".bak"]).unwrap(),
            Some(format!("{name}.bak"))
        );
    }
}
