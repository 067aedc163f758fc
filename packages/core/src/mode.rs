//! Open intent: mode, access, and sharing policy.

use crate::error::{Error, Result};

/// How an open call treats an existing (or missing) file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenMode {
    /// Open an existing file; fail if it is missing.
    #[default]
    Open,
    /// Open an existing file or create it.
    OpenOrCreate,
    /// Create the file, replacing any existing content.
    Create,
    /// Create the file; fail if it already exists.
    CreateNew,
    /// Open an existing file and discard its content; fail if it is missing.
    Truncate,
    /// Open or create the file positioned at its end.
    Append,
}

/// Requested access to the opened stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Access {
    #[default]
    Read,
    Write,
    ReadWrite,
}

impl Access {
    pub fn reads(self) -> bool {
        matches!(self, Access::Read | Access::ReadWrite)
    }

    pub fn writes(self) -> bool {
        matches!(self, Access::Write | Access::ReadWrite)
    }
}

/// Sharing policy for concurrent opens of the same file.
///
/// Advisory on hosts without mandatory share enforcement; backends record
/// the requested policy and enforce it where the platform can.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Share {
    /// No concurrent access.
    None,
    /// Concurrent readers allowed.
    #[default]
    Read,
    /// Concurrent writers allowed.
    Write,
    /// Concurrent readers and writers allowed.
    ReadWrite,
}

/// The full open intent handed to a backend.
///
/// Not every combination is valid: modes that destroy or create content
/// require write access. Backends call [`OpenOptions::validate`] before
/// touching the store so invalid combinations fail uniformly with
/// [`Error::UnsupportedMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpenOptions {
    pub mode: OpenMode,
    pub access: Access,
    pub share: Share,
}

impl OpenOptions {
    pub fn new(mode: OpenMode, access: Access) -> Self {
        OpenOptions {
            mode,
            access,
            share: Share::default(),
        }
    }

    #[must_use]
    pub fn with_share(mut self, share: Share) -> Self {
        self.share = share;
        self
    }

    /// Reject mode/access combinations no backend can honor.
    pub fn validate(&self) -> Result<()> {
        let valid = match self.mode {
            OpenMode::Open | OpenMode::OpenOrCreate => true,
            OpenMode::Create | OpenMode::CreateNew | OpenMode::Truncate => self.access.writes(),
            // Appending cannot honor a read position at the same time.
            OpenMode::Append => self.access == Access::Write,
        };

        if valid {
            Ok(())
        } else {
            Err(Error::UnsupportedMode {
                message: format!("{:?} access with {:?} mode", self.access, self.mode),
            })
        }
    }
}
