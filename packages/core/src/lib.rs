//! Core OmniFS traits: the storage path model, open-mode model, error
//! taxonomy, stream abstraction, and the capability contract every storage
//! backend implements.
//!
//! This crate carries no backend logic of its own. Backends (local
//! filesystem, asset bundle, storage container, document library) live in
//! sibling crates and implement [`Backend`]; the `omnifs` facade crate
//! dispatches to whichever backend was selected at configuration time.

mod backend;
mod error;
mod mode;
mod path;
mod pattern;
mod stream;

pub use backend::{Backend, StorageHandle};
pub use error::{Error, Result};
pub use mode::{Access, OpenMode, OpenOptions, Share};
pub use path::{StoragePath, SEPARATOR};
pub use pattern::filter_entries;
pub use stream::{FileStream, MemoryStream, Stream};
