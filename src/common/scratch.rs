// src/common/scratch.rs
//! Per-request scratch files with guaranteed cleanup
//!
//! Each request gets uniquely named input/output PDFs under the scratch
//! directory. The file is removed when the guard drops, so failures partway
//! through the pipeline never leave stale files behind.

use std::path::{Path, PathBuf};

use crate::common::generate_raw_id;

/// A scratch file that deletes itself on drop
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    /// Allocate a unique path `<dir>/<prefix>_<id>.pdf` without creating the file
    pub fn allocate(dir: &Path, prefix: &str) -> Self {
        let filename = format!("{}_{}.pdf", prefix, generate_raw_id(8));
        Self {
            path: dir.join(filename),
        }
    }

    /// Allocate and write contents in one step
    pub async fn create(dir: &Path, prefix: &str, contents: &[u8]) -> std::io::Result<Self> {
        let file = Self::allocate(dir, prefix);
        tokio::fs::write(&file.path, contents).await?;
        Ok(file)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn read(&self) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        // Best effort; the file may not exist if the pipeline failed early
        let _ = std::fs::remove_file(&self.path);
    }
}
