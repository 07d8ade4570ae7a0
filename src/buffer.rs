//! Byte storage behind the editor.
//!
//! The core never touches a filesystem: it reads and replaces the content of
//! a [`FileBuffer`]. `StandardFileBuffer` is the path-backed implementation
//! with explicit load/save; a plain `Vec<u8>` works for in-memory use.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BufferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("path has no parent directory: {0}")]
    NoParent(PathBuf),
}

pub trait FileBuffer {
    /// Backing file path, if any; used only for diagnostics.
    fn file_name(&self) -> Option<&Path> {
        None
    }

    fn content(&self) -> &[u8];

    fn set_content(&mut self, content: Vec<u8>);
}

impl FileBuffer for Vec<u8> {
    fn content(&self) -> &[u8] {
        self
    }

    fn set_content(&mut self, content: Vec<u8>) {
        *self = content;
    }
}

/// A file buffer bound to a path on disk.
pub struct StandardFileBuffer {
    path: PathBuf,
    content: Vec<u8>,
}

impl StandardFileBuffer {
    /// Read the file at `path` into a new buffer.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, BufferError> {
        let path = path.into();
        let content = fs::read(&path)?;
        Ok(Self { path, content })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist the buffer to its path atomically: tempfile in the same
    /// directory, fsync, rename. Either the full write lands or the old
    /// file stays intact.
    pub fn save(&self) -> Result<(), BufferError> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            // A bare relative file name lives in the current directory.
            Some(_) => Path::new("."),
            None => return Err(BufferError::NoParent(self.path.clone())),
        };

        let mut temp = tempfile::NamedTempFile::new_in(parent)?;
        temp.write_all(&self.content)?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| e.error)?;

        Ok(())
    }
}

impl FileBuffer for StandardFileBuffer {
    fn file_name(&self) -> Option<&Path> {
        Some(&self.path)
    }

    fn content(&self) -> &[u8] {
        &self.content
    }

    fn set_content(&mut self, content: Vec<u8>) {
        self.content = content;
    }
}
