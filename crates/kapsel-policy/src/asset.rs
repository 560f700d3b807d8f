//! Bundled-asset access.

use std::fs::File;
use std::io::Read;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

/// Read access to the application's bundled assets.
///
/// Lookups are local reads, never network; the resource chain calls this
/// on the surface's event thread.
pub trait AssetStore {
    /// Open an asset by its path relative to the bundle root.
    fn open(&self, path: &str) -> Result<Box<dyn Read + Send>, AssetError>;
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(String),

    #[error("asset read failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Assets laid out under a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct DirAssetStore {
    root: PathBuf,
}

impl DirAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetStore for DirAssetStore {
    fn open(&self, path: &str) -> Result<Box<dyn Read + Send>, AssetError> {
        let relative = path.trim_start_matches('/');
        // asset paths come straight from page content; keep them inside the root
        if Path::new(relative)
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(AssetError::NotFound(path.to_string()));
        }
        match File::open(self.root.join(relative)) {
            Ok(file) => Ok(Box::new(file)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(AssetError::NotFound(path.to_string()))
            }
            Err(err) => Err(AssetError::Io(err)),
        }
    }
}
