// src/pipeline/writer.rs

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::fs::FileSystem;
use crate::pipeline::Artifact;

/// Persists renamed artifacts into the destination directory.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    dest: PathBuf,
    fs: Arc<dyn FileSystem>,
}

impl OutputWriter {
    pub fn new(dest: impl Into<PathBuf>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            dest: dest.into(),
            fs,
        }
    }

    /// Write `artifact` to `<dest>/<name>`, replacing any previous file.
    ///
    /// The destination directory is created when missing. The write is not
    /// atomic.
    pub fn write(&self, artifact: &Artifact) -> Result<PathBuf> {
        let path = self.dest.join(artifact.name());
        self.fs
            .write(&path, artifact.contents())
            .with_context(|| format!("writing artifact to {:?}", path))?;
        info!(?path, bytes = artifact.contents().len(), "artifact written");
        Ok(path)
    }
}
