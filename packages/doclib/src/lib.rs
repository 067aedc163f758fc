//! Document-library backend.
//!
//! Models an OS document store whose native operations are all
//! asynchronous. The async surface lives in [`DocumentStore`] (an
//! [`AsyncBackend`]); the rest of the system only ever sees [`DocLibrary`],
//! a synchronous [`Backend`](omnifs_core::Backend) adapter that bridges each
//! call onto a runtime it owns. See [`SyncBridge`] for the blocking
//! contract.

mod bridge;
mod store;

pub use bridge::SyncBridge;
pub use store::{AsyncBackend, DocumentStore};

/// The document-library backend as the facade consumes it: the async store
/// behind the synchronous bridge.
pub type DocLibrary = SyncBridge<DocumentStore>;

impl DocLibrary {
    /// Open the document library rooted at `root`.
    pub fn open_library(root: impl Into<std::path::PathBuf>) -> omnifs_core::Result<Self> {
        SyncBridge::new(DocumentStore::new(root))
    }
}
