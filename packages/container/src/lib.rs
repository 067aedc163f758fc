//! Sandboxed storage container backend.
//!
//! Every operation is scoped to a container session: an opaque
//! [`StorageHandle`] wrapping the container's root directory. Callers open a
//! session with [`ContainerSession::open`] and pass the handle into each
//! call (or register it as the facade's default). With no handle available,
//! every operation fails with [`Error::MissingStorageHandle`].
//!
//! All access is confined to the container namespace: paths are resolved
//! relative to the session root, and parent-escaping components are refused.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use omnifs_core::{
    filter_entries, Backend, Error, FileStream, OpenMode, OpenOptions, Result, StorageHandle,
    StoragePath, Stream, SEPARATOR,
};

/// An open session on a storage container.
///
/// The session owns nothing but the container root; it is shared through the
/// opaque handle and cloned freely.
#[derive(Debug, Clone)]
pub struct ContainerSession {
    root: PathBuf,
}

impl ContainerSession {
    /// Open (creating if needed) the container rooted at `root` and wrap
    /// the session in a storage handle.
    pub fn open(root: impl Into<PathBuf>) -> Result<StorageHandle> {
        let root = root.into();
        fs::create_dir_all(&root)
            .map_err(|e| Error::from_io(e, &StoragePath::new(root.to_string_lossy())))?;
        Ok(StorageHandle::new(ContainerSession { root }))
    }

    /// The container's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a storage path inside the container namespace.
    ///
    /// Parent-escaping components are refused: the container grants access
    /// only within its own namespace.
    fn resolve(&self, path: &StoragePath) -> Result<PathBuf> {
        let relative = path.as_str().trim_start_matches(SEPARATOR);
        if relative.split(SEPARATOR).any(|c| c == "..") {
            return Err(Error::access_denied(path));
        }
        Ok(self.root.join(relative))
    }
}

/// The storage container backend.
///
/// Stateless: all context lives in the session handle supplied per call.
#[derive(Debug, Default, Clone, Copy)]
pub struct StorageContainer;

impl StorageContainer {
    pub fn new() -> Self {
        StorageContainer
    }

    fn session<'a>(&self, handle: Option<&'a StorageHandle>) -> Result<&'a ContainerSession> {
        let handle = handle.ok_or(Error::MissingStorageHandle)?;
        handle.downcast_ref::<ContainerSession>().ok_or_else(|| {
            Error::invalid_argument("storage handle does not belong to the container backend")
        })
    }
}

impl Backend for StorageContainer {
    fn open(
        &self,
        handle: Option<&StorageHandle>,
        path: &StoragePath,
        options: &OpenOptions,
    ) -> Result<Box<dyn Stream>> {
        options.validate()?;
        let native = self.session(handle)?.resolve(path)?;
        log::debug!("container open {} ({:?})", path, options.mode);

        let mut fs_options = fs::OpenOptions::new();
        fs_options
            .read(options.access.reads())
            .write(options.access.writes());
        match options.mode {
            OpenMode::Open => {}
            OpenMode::OpenOrCreate => {
                // Creating requires write intent at the OS level; read-only
                // callers get the file created for them first.
                if options.access.writes() {
                    fs_options.create(true);
                } else if !native.exists() {
                    fs::OpenOptions::new()
                        .write(true)
                        .create(true)
                        .open(&native)
                        .map_err(|e| Error::from_io(e, path))?;
                }
            }
            OpenMode::Create => {
                fs_options.create(true).truncate(true);
            }
            OpenMode::CreateNew => {
                fs_options.create_new(true);
            }
            OpenMode::Truncate => {
                fs_options.truncate(true);
            }
            OpenMode::Append => {
                fs_options.append(true).create(true);
            }
        }

        let file = fs_options.open(&native).map_err(|e| Error::from_io(e, path))?;
        Ok(Box::new(FileStream::new(file)))
    }

    fn open_read(
        &self,
        handle: Option<&StorageHandle>,
        root: &StoragePath,
        name: &StoragePath,
    ) -> Result<Box<dyn Stream>> {
        let session = self.session(handle)?;
        let path = root.join(name.as_str());
        let native = session.resolve(&path)?;
        let file = fs::File::open(&native).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                if let Some(parent) = path.parent() {
                    if let Ok(native_parent) = session.resolve(&parent) {
                        if !parent.is_empty() && !native_parent.is_dir() {
                            return Error::directory_not_found(&parent);
                        }
                    }
                }
            }
            Error::from_io(e, &path)
        })?;
        Ok(Box::new(FileStream::new(file)))
    }

    fn exists(&self, handle: Option<&StorageHandle>, path: &StoragePath) -> Result<bool> {
        let native = self.session(handle)?.resolve(path)?;
        match fs::metadata(native) {
            Ok(meta) => Ok(meta.is_file()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(Error::from_io(err, path)),
        }
    }

    fn create(
        &self,
        handle: Option<&StorageHandle>,
        path: &StoragePath,
    ) -> Result<Box<dyn Stream>> {
        let native = self.session(handle)?.resolve(path)?;
        log::debug!("container create {}", path);
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(native)
            .map_err(|e| Error::from_io(e, path))?;
        Ok(Box::new(FileStream::new(file)))
    }

    fn delete(&self, handle: Option<&StorageHandle>, path: &StoragePath) -> Result<()> {
        let native = self.session(handle)?.resolve(path)?;
        log::debug!("container delete {}", path);
        fs::remove_file(native).map_err(|e| Error::from_io(e, path))
    }

    fn list_files(
        &self,
        handle: Option<&StorageHandle>,
        dir: &StoragePath,
        pattern: Option<&str>,
    ) -> Result<Vec<String>> {
        let native = self.session(handle)?.resolve(dir)?;
        let mut names = Vec::new();
        let entries = fs::read_dir(native).map_err(|e| Error::from_dir_io(e, dir))?;
        for entry in entries {
            let entry = entry.map_err(|e| Error::from_dir_io(e, dir))?;
            let file_type = entry.file_type().map_err(|e| Error::from_dir_io(e, dir))?;
            if file_type.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        filter_entries(names, pattern)
    }

    fn list_directories(
        &self,
        handle: Option<&StorageHandle>,
        dir: &StoragePath,
    ) -> Result<Vec<String>> {
        let native = self.session(handle)?.resolve(dir)?;
        let mut names = Vec::new();
        let entries = fs::read_dir(native).map_err(|e| Error::from_dir_io(e, dir))?;
        for entry in entries {
            let entry = entry.map_err(|e| Error::from_dir_io(e, dir))?;
            let file_type = entry.file_type().map_err(|e| Error::from_dir_io(e, dir))?;
            if file_type.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    fn directory_exists(&self, handle: Option<&StorageHandle>, path: &StoragePath) -> Result<bool> {
        let native = self.session(handle)?.resolve(path)?;
        Ok(native.is_dir())
    }

    fn create_directory(&self, handle: Option<&StorageHandle>, path: &StoragePath) -> Result<()> {
        if path.is_empty() {
            return Err(Error::invalid_argument("directory path must contain a value"));
        }
        let native = self.session(handle)?.resolve(path)?;
        log::debug!("container create_directory {}", path);
        fs::create_dir_all(native).map_err(|e| Error::from_io(e, path))
    }

    fn delete_directory(&self, handle: Option<&StorageHandle>, path: &StoragePath) -> Result<()> {
        let native = self.session(handle)?.resolve(path)?;
        log::debug!("container delete_directory {}", path);
        fs::remove_dir(native).map_err(|e| Error::from_dir_io(e, path))
    }
}
