//! Local filesystem backend: a direct pass-through to the host OS file APIs.
//!
//! This backend is fully read/write, natively synchronous, and returns
//! seekable streams. The sharing policy in [`OpenOptions`] is advisory here;
//! Unix hosts have no mandatory share enforcement, so the requested policy is
//! recorded in the open intent but not enforced.

use std::fs;
use std::io;

use omnifs_core::{
    filter_entries, Access, Backend, Error, FileStream, OpenMode, OpenOptions, Result,
    StorageHandle, StoragePath, Stream,
};

/// The local-filesystem backend.
///
/// Stateless: paths are handed to the OS as-is (absolute, or relative to the
/// process working directory), and no storage handle is required.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        LocalFileSystem
    }

    fn open_existing_or_create_readable(path: &StoragePath) -> Result<fs::File> {
        // OpenOrCreate with read-only access: the host API cannot create
        // without write intent, so create the file first if it is missing,
        // then reopen read-only.
        match fs::File::open(path.to_native()) {
            Ok(file) => Ok(file),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                fs::OpenOptions::new()
                    .write(true)
                    .create(true)
                    .open(path.to_native())
                    .map_err(|e| Error::from_io(e, path))?;
                fs::File::open(path.to_native()).map_err(|e| Error::from_io(e, path))
            }
            Err(err) => Err(Error::from_io(err, path)),
        }
    }
}

impl Backend for LocalFileSystem {
    fn open(
        &self,
        _handle: Option<&StorageHandle>,
        path: &StoragePath,
        options: &OpenOptions,
    ) -> Result<Box<dyn Stream>> {
        options.validate()?;
        log::debug!("open {} ({:?})", path, options.mode);

        if options.mode == OpenMode::OpenOrCreate && options.access == Access::Read {
            let file = Self::open_existing_or_create_readable(path)?;
            return Ok(Box::new(FileStream::new(file)));
        }

        let mut fs_options = fs::OpenOptions::new();
        fs_options
            .read(options.access.reads())
            .write(options.access.writes());
        match options.mode {
            OpenMode::Open => {}
            OpenMode::OpenOrCreate => {
                fs_options.create(true);
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

        let file = fs_options
            .open(path.to_native())
            .map_err(|e| Error::from_io(e, path))?;
        Ok(Box::new(FileStream::new(file)))
    }

    fn open_read(
        &self,
        _handle: Option<&StorageHandle>,
        root: &StoragePath,
        name: &StoragePath,
    ) -> Result<Box<dyn Stream>> {
        let path = root.join(name.as_str());
        let file = fs::File::open(path.to_native()).map_err(|e| {
            // Distinguish a missing parent directory from a missing file so
            // the facade can translate the two cases separately.
            if e.kind() == io::ErrorKind::NotFound {
                if let Some(parent) = path.parent() {
                    if !parent.is_empty() && !parent.to_native().is_dir() {
                        return Error::directory_not_found(&parent);
                    }
                }
            }
            Error::from_io(e, &path)
        })?;
        Ok(Box::new(FileStream::new(file)))
    }

    fn exists(&self, _handle: Option<&StorageHandle>, path: &StoragePath) -> Result<bool> {
        match fs::metadata(path.to_native()) {
            Ok(meta) => Ok(meta.is_file()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(Error::from_io(err, path)),
        }
    }

    fn create(
        &self,
        _handle: Option<&StorageHandle>,
        path: &StoragePath,
    ) -> Result<Box<dyn Stream>> {
        log::debug!("create {}", path);
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path.to_native())
            .map_err(|e| Error::from_io(e, path))?;
        Ok(Box::new(FileStream::new(file)))
    }

    fn delete(&self, _handle: Option<&StorageHandle>, path: &StoragePath) -> Result<()> {
        log::debug!("delete {}", path);
        fs::remove_file(path.to_native()).map_err(|e| Error::from_io(e, path))
    }

    fn list_files(
        &self,
        _handle: Option<&StorageHandle>,
        dir: &StoragePath,
        pattern: Option<&str>,
    ) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let entries = fs::read_dir(dir.to_native()).map_err(|e| Error::from_dir_io(e, dir))?;
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
        _handle: Option<&StorageHandle>,
        dir: &StoragePath,
    ) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let entries = fs::read_dir(dir.to_native()).map_err(|e| Error::from_dir_io(e, dir))?;
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

    fn directory_exists(&self, _handle: Option<&StorageHandle>, path: &StoragePath) -> Result<bool> {
        match fs::metadata(path.to_native()) {
            Ok(meta) => Ok(meta.is_dir()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(Error::from_io(err, path)),
        }
    }

    fn create_directory(&self, _handle: Option<&StorageHandle>, path: &StoragePath) -> Result<()> {
        if path.is_empty() {
            return Err(Error::invalid_argument("directory path must contain a value"));
        }
        log::debug!("create_directory {}", path);
        // create_dir_all succeeds when the directory already exists.
        fs::create_dir_all(path.to_native()).map_err(|e| Error::from_io(e, path))
    }

    fn delete_directory(&self, _handle: Option<&StorageHandle>, path: &StoragePath) -> Result<()> {
        log::debug!("delete_directory {}", path);
        fs::remove_dir(path.to_native()).map_err(|e| Error::from_dir_io(e, path))
    }
}
