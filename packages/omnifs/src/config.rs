//! Backend selection, and the display environment that shapes it.

use std::path::PathBuf;

use omnifs_core::{Backend, Result};

use omnifs_bundle::AssetBundle;
use omnifs_container::StorageContainer;
use omnifs_doclib::DocLibrary;
use omnifs_local::LocalFileSystem;

/// Which storage backend a [`crate::Vfs`] should sit in front of.
#[derive(Debug, Clone)]
pub enum BackendConfig {
    /// The plain local filesystem.
    Local,
    /// A read-only asset bundle rooted at `root`.
    Bundle {
        root: PathBuf,
        /// Probe for high-density asset variants before the plain name.
        variant_fallback: bool,
    },
    /// A sandboxed storage container. Callers obtain a session handle from
    /// [`omnifs_container::ContainerSession::open`] and pass it per call or
    /// install it as the facade default.
    Container,
    /// The OS document library rooted at `root`, driven through the
    /// synchronous bridge.
    DocumentLibrary { root: PathBuf },
}

/// Host display properties that influence backend behavior.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    /// Whether the display is high-density; the bundle backend only probes
    /// density variants when this is set.
    pub high_density_display: bool,
}

impl BackendConfig {
    pub(crate) fn build(self, env: &Environment) -> Result<Box<dyn Backend>> {
        Ok(match self {
            BackendConfig::Local => Box::new(LocalFileSystem::new()),
            BackendConfig::Bundle {
                root,
                variant_fallback,
            } => Box::new(
                AssetBundle::new(root)
                    .with_variant_fallback(variant_fallback)
                    .with_high_density_display(env.high_density_display),
            ),
            BackendConfig::Container => Box::new(StorageContainer::new()),
            BackendConfig::DocumentLibrary { root } => Box::new(DocLibrary::open_library(root)?),
        })
    }
}
