//! OmniFS: a uniform synchronous file API over interchangeable storage backends.
//!
//! OmniFS puts one synchronous surface — open, create, delete, list, and
//! directory management on forward-slash paths — in front of storage systems
//! with very different natures: the local filesystem, a read-only asset
//! bundle, a sandboxed storage container, and an asynchronous document
//! library. Callers pick a backend once, at construction, and never branch on
//! it again.

mod config;
mod content;
mod vfs;

pub use config::{BackendConfig, Environment};
pub use content::{close_stream, seek_to_start, ContentError};
pub use vfs::Vfs;

// Core contract types, re-exported so most callers depend on this crate alone.
pub use omnifs_core::{
    Access, Backend, Error, FileStream, MemoryStream, OpenMode, OpenOptions, Result, Share,
    StorageHandle, StoragePath, Stream, SEPARATOR,
};

// Backend implementations.
pub use omnifs_bundle::{AssetBundle, HIGH_DENSITY_SUFFIX};
pub use omnifs_container::{ContainerSession, StorageContainer};
pub use omnifs_doclib::{DocLibrary, DocumentStore, SyncBridge};
pub use omnifs_local::LocalFileSystem;
