//! The async document store and its capability trait.

use std::io::{self, SeekFrom};
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncSeekExt;

use omnifs_core::{
    filter_entries, Error, FileStream, OpenMode, OpenOptions, Result, StoragePath, Stream,
    SEPARATOR,
};

/// The asynchronous operation set of the document store.
///
/// This mirrors the synchronous [`Backend`](omnifs_core::Backend) contract
/// operation-for-operation; [`SyncBridge`](crate::SyncBridge) reduces it to
/// the synchronous contract without the rest of the system learning the
/// store is async underneath.
#[async_trait]
pub trait AsyncBackend: Send + Sync {
    async fn open(&self, path: &StoragePath, options: &OpenOptions) -> Result<Box<dyn Stream>>;
    async fn open_read(&self, root: &StoragePath, name: &StoragePath) -> Result<Box<dyn Stream>>;
    async fn exists(&self, path: &StoragePath) -> Result<bool>;
    async fn create(&self, path: &StoragePath) -> Result<Box<dyn Stream>>;
    async fn delete(&self, path: &StoragePath) -> Result<()>;
    async fn list_files(&self, dir: &StoragePath, pattern: Option<&str>) -> Result<Vec<String>>;
    async fn list_directories(&self, dir: &StoragePath) -> Result<Vec<String>>;
    async fn directory_exists(&self, path: &StoragePath) -> Result<bool>;
    async fn create_directory(&self, path: &StoragePath) -> Result<()>;
    async fn delete_directory(&self, path: &StoragePath) -> Result<()>;
}

/// Async store over the document-library root.
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DocumentStore { root: root.into() }
    }

    fn native(&self, path: &StoragePath) -> PathBuf {
        self.root.join(path.as_str().trim_start_matches(SEPARATOR))
    }

    async fn into_stream(file: tokio::fs::File) -> Box<dyn Stream> {
        Box::new(FileStream::new(file.into_std().await))
    }
}

#[async_trait]
impl AsyncBackend for DocumentStore {
    async fn open(&self, path: &StoragePath, options: &OpenOptions) -> Result<Box<dyn Stream>> {
        options.validate()?;
        log::debug!("doclib open {} ({:?})", path, options.mode);
        let native = self.native(path);

        let mut fs_options = tokio::fs::OpenOptions::new();
        fs_options
            .read(options.access.reads())
            .write(options.access.writes());
        match options.mode {
            OpenMode::Open => {}
            OpenMode::OpenOrCreate => {
                if options.access.writes() {
                    fs_options.create(true);
                } else if tokio::fs::metadata(&native).await.is_err() {
                    tokio::fs::OpenOptions::new()
                        .write(true)
                        .create(true)
                        .open(&native)
                        .await
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

        let mut file = fs_options
            .open(&native)
            .await
            .map_err(|e| Error::from_io(e, path))?;

        // The native open-or-create primitive positions at end-of-file;
        // callers expect a stream positioned at the start of existing
        // content, so reset explicitly.
        if options.mode == OpenMode::OpenOrCreate && options.access.writes() {
            file.seek(SeekFrom::Start(0))
                .await
                .map_err(|e| Error::from_io(e, path))?;
        }

        Ok(Self::into_stream(file).await)
    }

    async fn open_read(&self, root: &StoragePath, name: &StoragePath) -> Result<Box<dyn Stream>> {
        let path = root.join(name.as_str());
        let native = self.native(&path);
        let file = tokio::fs::File::open(&native).await.map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                if let Some(parent) = path.parent() {
                    if !parent.is_empty() && !self.native(&parent).is_dir() {
                        return Error::directory_not_found(&parent);
                    }
                }
            }
            Error::from_io(e, &path)
        })?;
        Ok(Self::into_stream(file).await)
    }

    async fn exists(&self, path: &StoragePath) -> Result<bool> {
        match tokio::fs::metadata(self.native(path)).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(Error::from_io(err, path)),
        }
    }

    async fn create(&self, path: &StoragePath) -> Result<Box<dyn Stream>> {
        log::debug!("doclib create {}", path);
        let file = tokio::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.native(path))
            .await
            .map_err(|e| Error::from_io(e, path))?;
        Ok(Self::into_stream(file).await)
    }

    async fn delete(&self, path: &StoragePath) -> Result<()> {
        log::debug!("doclib delete {}", path);
        tokio::fs::remove_file(self.native(path))
            .await
            .map_err(|e| Error::from_io(e, path))
    }

    async fn list_files(&self, dir: &StoragePath, pattern: Option<&str>) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut entries = tokio::fs::read_dir(self.native(dir))
            .await
            .map_err(|e| Error::from_dir_io(e, dir))?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| Error::from_dir_io(e, dir))?
        {
            let file_type = entry.file_type().await.map_err(|e| Error::from_dir_io(e, dir))?;
            if file_type.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        filter_entries(names, pattern)
    }

    async fn list_directories(&self, dir: &StoragePath) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut entries = tokio::fs::read_dir(self.native(dir))
            .await
            .map_err(|e| Error::from_dir_io(e, dir))?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| Error::from_dir_io(e, dir))?
        {
            let file_type = entry.file_type().await.map_err(|e| Error::from_dir_io(e, dir))?;
            if file_type.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    async fn directory_exists(&self, path: &StoragePath) -> Result<bool> {
        match tokio::fs::metadata(self.native(path)).await {
            Ok(meta) => Ok(meta.is_dir()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(Error::from_io(err, path)),
        }
    }

    async fn create_directory(&self, path: &StoragePath) -> Result<()> {
        if path.is_empty() {
            return Err(Error::invalid_argument("directory path must contain a value"));
        }
        log::debug!("doclib create_directory {}", path);
        tokio::fs::create_dir_all(self.native(path))
            .await
            .map_err(|e| Error::from_io(e, path))
    }

    async fn delete_directory(&self, path: &StoragePath) -> Result<()> {
        log::debug!("doclib delete_directory {}", path);
        tokio::fs::remove_dir(self.native(path))
            .await
            .map_err(|e| Error::from_dir_io(e, path))
    }
}
