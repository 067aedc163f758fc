//! Read-only asset bundle backend.
//!
//! Models an installed, immutable asset store (the files shipped with an
//! application). Three things distinguish it from a plain filesystem:
//!
//! - Enumeration results are cached for the process lifetime. The backing
//!   store never changes after install, so a directory is listed at most
//!   once and every caller sees the same sorted sequence.
//! - File existence is decided by enumerating the containing directory and
//!   matching names case-insensitively; bundle lookups are not guaranteed
//!   case-sensitive. On a case-only collision the first match in enumeration
//!   order wins.
//! - `open_read` can prefer a high-density variant (`name@2x.ext`) when the
//!   environment declares a high-density display and variant fallback is
//!   enabled on the bundle. Both flags are required.
//!
//! Streams handed out by this backend are sequential-only; callers that need
//! random access materialize them through the facade's seek normalization.

use std::collections::HashMap;
use std::fs;
use std::io::{self, BufReader, Read, SeekFrom, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use omnifs_core::{
    filter_entries, Access, Backend, Error, OpenMode, OpenOptions, Result, StorageHandle,
    StoragePath, Stream, SEPARATOR,
};

/// Suffix inserted before the extension when probing for a high-density
/// asset variant.
pub const HIGH_DENSITY_SUFFIX: &str = "@2x";

/// The read-only asset bundle backend, rooted at the install directory.
pub struct AssetBundle {
    root: PathBuf,
    variant_fallback: bool,
    high_density_display: bool,
    listings: Mutex<HashMap<String, Arc<Vec<String>>>>,
}

impl AssetBundle {
    /// Open the bundle rooted at `root`. Variant fallback is disabled until
    /// enabled explicitly.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        AssetBundle {
            root: root.into(),
            variant_fallback: false,
            high_density_display: false,
            listings: Mutex::new(HashMap::new()),
        }
    }

    /// Enable probing for `@2x` variants on `open_read`.
    #[must_use]
    pub fn with_variant_fallback(mut self, enabled: bool) -> Self {
        self.variant_fallback = enabled;
        self
    }

    /// Declare whether the display environment is high-density. Consumed
    /// only by variant fallback.
    #[must_use]
    pub fn with_high_density_display(mut self, enabled: bool) -> Self {
        self.high_density_display = enabled;
        self
    }

    fn native(&self, path: &StoragePath) -> PathBuf {
        // Bundle paths are always relative to the install root.
        self.root.join(path.as_str().trim_start_matches(SEPARATOR))
    }

    /// Entries of `dir`, from the cache or a single enumeration.
    ///
    /// The lock is held across population so racing first callers cannot
    /// observe a partially built listing; every caller gets the same shared,
    /// sorted sequence.
    fn folder_entries(&self, dir: &StoragePath) -> Result<Arc<Vec<String>>> {
        let mut listings = self
            .listings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(entries) = listings.get(dir.as_str()) {
            return Ok(Arc::clone(entries));
        }

        log::debug!("enumerating bundle directory {:?}", dir.as_str());
        let mut names = Vec::new();
        let read = fs::read_dir(self.native(dir)).map_err(|e| Error::from_dir_io(e, dir))?;
        for entry in read {
            let entry = entry.map_err(|e| Error::from_dir_io(e, dir))?;
            let file_type = entry.file_type().map_err(|e| Error::from_dir_io(e, dir))?;
            if file_type.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();

        let entries = Arc::new(names);
        listings.insert(dir.as_str().to_string(), Arc::clone(&entries));
        Ok(entries)
    }

    /// The `@2x` sibling of `path`: suffix inserted immediately before the
    /// extension.
    fn variant_path(path: &StoragePath) -> StoragePath {
        let stem = path.file_stem().unwrap_or_default();
        let ext = path.extension().unwrap_or_default();
        let variant = format!("{}{}{}", stem, HIGH_DENSITY_SUFFIX, ext);
        match path.parent() {
            Some(parent) if !parent.is_empty() => parent.join(&variant),
            _ => StoragePath::new(variant),
        }
    }

    fn open_sequential(&self, path: &StoragePath) -> Result<Box<dyn Stream>> {
        let file = fs::File::open(self.native(path)).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                if let Some(parent) = path.parent() {
                    if !parent.is_empty() && !self.native(&parent).is_dir() {
                        return Error::directory_not_found(&parent);
                    }
                }
            }
            Error::from_io(e, path)
        })?;
        Ok(Box::new(BundleStream {
            reader: BufReader::new(file),
        }))
    }

    fn read_only(path: &StoragePath) -> Error {
        Error::access_denied(path)
    }
}

impl Backend for AssetBundle {
    fn open(
        &self,
        _handle: Option<&StorageHandle>,
        path: &StoragePath,
        options: &OpenOptions,
    ) -> Result<Box<dyn Stream>> {
        options.validate()?;
        let readable_mode = matches!(options.mode, OpenMode::Open | OpenMode::OpenOrCreate);
        if !readable_mode || options.access != Access::Read {
            return Err(Error::UnsupportedMode {
                message: format!(
                    "asset bundle is read-only: {:?} access with {:?} mode",
                    options.access, options.mode
                ),
            });
        }
        self.open_sequential(path)
    }

    fn open_read(
        &self,
        _handle: Option<&StorageHandle>,
        root: &StoragePath,
        name: &StoragePath,
    ) -> Result<Box<dyn Stream>> {
        let path = root.join(name.as_str());

        if self.variant_fallback && self.high_density_display {
            let variant = Self::variant_path(&path);
            if self.native(&variant).is_file() {
                log::debug!("using high-density variant {:?}", variant.as_str());
                return self.open_sequential(&variant);
            }
        }

        self.open_sequential(&path)
    }

    fn exists(&self, _handle: Option<&StorageHandle>, path: &StoragePath) -> Result<bool> {
        let Some(name) = path.file_name() else {
            return Ok(false);
        };
        let parent = path.parent().unwrap_or_default();

        let entries = match self.folder_entries(&parent) {
            Ok(entries) => entries,
            Err(Error::DirectoryNotFound { .. }) => return Ok(false),
            Err(e) => return Err(e),
        };

        let wanted = name.to_lowercase();
        // First match in enumeration order wins on case-only collisions.
        Ok(entries.iter().any(|entry| entry.to_lowercase() == wanted))
    }

    fn create(
        &self,
        _handle: Option<&StorageHandle>,
        path: &StoragePath,
    ) -> Result<Box<dyn Stream>> {
        Err(Self::read_only(path))
    }

    fn delete(&self, _handle: Option<&StorageHandle>, path: &StoragePath) -> Result<()> {
        Err(Self::read_only(path))
    }

    fn list_files(
        &self,
        _handle: Option<&StorageHandle>,
        dir: &StoragePath,
        pattern: Option<&str>,
    ) -> Result<Vec<String>> {
        let entries = self.folder_entries(dir)?;
        filter_entries(entries.as_ref().clone(), pattern)
    }

    fn list_directories(
        &self,
        _handle: Option<&StorageHandle>,
        dir: &StoragePath,
    ) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let read = fs::read_dir(self.native(dir)).map_err(|e| Error::from_dir_io(e, dir))?;
        for entry in read {
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
        Ok(self.native(path).is_dir())
    }

    fn create_directory(&self, _handle: Option<&StorageHandle>, path: &StoragePath) -> Result<()> {
        Err(Self::read_only(path))
    }

    fn delete_directory(&self, _handle: Option<&StorageHandle>, path: &StoragePath) -> Result<()> {
        Err(Self::read_only(path))
    }
}

/// A sequential, read-only stream over a bundle asset.
struct BundleStream {
    reader: BufReader<fs::File>,
}

impl Read for BundleStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl Write for BundleStream {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "bundle streams are read-only",
        ))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Stream for BundleStream {
    fn supports_seek(&self) -> bool {
        false
    }

    fn seek(&mut self, _pos: SeekFrom) -> io::Result<u64> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "bundle streams do not support seeking",
        ))
    }
}
