//! Opening content streams: read-only access with a guaranteed start
//! position, and the narrowed error surface content loaders consume.

use std::io::{self, SeekFrom};

use log::debug;
use omnifs_core::{Error, MemoryStream, StorageHandle, StoragePath, Stream};

use crate::vfs::Vfs;

/// What went wrong opening a content stream.
///
/// Content loaders distinguish exactly three outcomes: the file is missing,
/// its directory is missing, or the open failed for some other reason. The
/// full backend error rides along as the source of the last variant.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("content file not found: {path}")]
    NotFound { path: String },

    #[error("content directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("opening content stream failed: {path}")]
    OpenFailed {
        path: String,
        #[source]
        source: Error,
    },
}

impl Vfs {
    /// Open the file named `name` + `extension` under `root` for reading,
    /// positioned at offset zero.
    ///
    /// Streams from backends without random access are materialized into
    /// memory so the caller always receives a seekable stream at the start.
    pub fn open_stream(
        &self,
        handle: Option<&StorageHandle>,
        root: &str,
        name: &str,
        extension: &str,
    ) -> Result<Box<dyn Stream>, ContentError> {
        let file = format!("{name}{extension}");
        let display_path = StoragePath::new(root).join(&file).to_string();
        debug!("opening content stream {display_path}");

        let stream = self
            .open_read(handle, root, &file)
            .map_err(|source| match source {
                Error::NotFound { .. } => ContentError::NotFound {
                    path: display_path.clone(),
                },
                Error::DirectoryNotFound { .. } => ContentError::DirectoryNotFound {
                    path: display_path.clone(),
                },
                source => ContentError::OpenFailed {
                    path: display_path.clone(),
                    source,
                },
            })?;

        seek_to_start(stream).map_err(|err| ContentError::OpenFailed {
            path: display_path,
            source: Error::backend(err),
        })
    }
}

/// Return `stream` positioned at offset zero.
///
/// Seekable streams are rewound in place. Sequential-only streams are read
/// to the end and replaced by an in-memory copy at offset zero; the original
/// is dropped once drained.
pub fn seek_to_start(mut stream: Box<dyn Stream>) -> io::Result<Box<dyn Stream>> {
    if stream.supports_seek() {
        stream.seek(SeekFrom::Start(0))?;
        return Ok(stream);
    }
    debug!("stream does not support seeking, materializing into memory");
    Ok(Box::new(MemoryStream::materialize(stream)?))
}

/// Release a content stream.
///
/// Dropping is sufficient on every backend; the explicit call exists so
/// loaders release streams at the same point on all of them.
pub fn close_stream(stream: Box<dyn Stream>) {
    drop(stream);
}
