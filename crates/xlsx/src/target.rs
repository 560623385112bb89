//! Destinations for exported files.
//!
//! The host decides where an export ends up (a download, a file dialog, a
//! directory). The exporter only needs something that accepts bytes.

use std::fs;
use std::io;
use std::path::PathBuf;

/// A host capability that stores an exported file.
pub trait SaveTarget {
    /// Store `bytes` under `filename`.
    fn save(&mut self, filename: &str, mime_type: &str, bytes: &[u8]) -> io::Result<()>;
}

/// Writes exports into a directory, creating it if needed.
#[derive(Debug, Clone)]
pub struct DirectoryTarget {
    dir: PathBuf,
}

impl DirectoryTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Where a file with this name would be written.
    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }
}

impl SaveTarget for DirectoryTarget {
    fn save(&mut self, filename: &str, _mime_type: &str, bytes: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(filename);
        fs::write(&path, bytes)?;
        log::debug!("Saved {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}

/// A saved file held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Keeps exports in memory, for hosts that stream the bytes elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemoryTarget {
    files: Vec<SavedFile>,
}

impl MemoryTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &[SavedFile] {
        &self.files
    }
}

impl SaveTarget for MemoryTarget {
    fn save(&mut self, filename: &str, mime_type: &str, bytes: &[u8]) -> io::Result<()> {
        self.files.push(SavedFile {
            filename: filename.to_string(),
            mime_type: mime_type.to_string(),
            bytes: bytes.to_vec(),
        });
        Ok(())
    }
}
