//! Staging directory for uploaded images.

use std::path::{Path, PathBuf};

use crate::error::Result;

/// A directory that holds uploaded files until [`TempStore::cleanup`].
#[derive(Debug, Clone)]
pub struct TempStore {
    dir: PathBuf,
}

impl TempStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<system temp>/watermarked`.
    pub fn default_dir() -> PathBuf {
        std::env::temp_dir().join("watermarked")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `data` under `filename`, creating the directory if needed.
    ///
    /// Only the final component of `filename` is used, so uploads cannot
    /// escape the staging directory.
    pub fn save(&self, data: &[u8], filename: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let name = Path::new(filename)
            .file_name()
            .ok_or_else(|| std::io::Error::other(format!("invalid upload name: {filename:?}")))?;
        let path = self.dir.join(name);
        std::fs::write(&path, data)?;
        tracing::debug!(path = %path.display(), len = data.len(), "Upload staged");
        Ok(path)
    }

    /// Remove the staging directory and everything in it.
    pub fn cleanup(&self) -> Result<()> {
        match std::fs::remove_dir_all(&self.dir) {
            Ok(()) => {
                tracing::info!(dir = %self.dir.display(), "Temp files removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
