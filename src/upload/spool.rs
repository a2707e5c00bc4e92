//! Temp-file spooling for incoming uploads.
//!
//! Each request gets its own uniquely named temp file. The spool owns the
//! file and removes it when dropped, so every exit path through the
//! pipeline (success, store failure, timeout, panic unwind) reaps it.

use std::io::Write;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tempfile::NamedTempFile;
use tracing::debug;

/// A local temp file holding the bytes of one in-flight upload.
pub struct TempSpool {
    file: NamedTempFile,
    size: u64,
}

impl TempSpool {
    /// Create an empty spool backed by a fresh temp file.
    pub fn new() -> std::io::Result<Self> {
        let file = NamedTempFile::new()?;
        debug!(path = %file.path().display(), "Spooling upload to temp file");
        Ok(Self { file, size: 0 })
    }

    /// Append a chunk of the incoming field body.
    pub fn write_chunk(&mut self, chunk: &[u8]) -> std::io::Result<()> {
        self.file.write_all(chunk)?;
        self.size += chunk.len() as u64;
        Ok(())
    }

    /// Total bytes written so far.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Path of the backing temp file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Read the full spooled contents back into memory.
    pub fn read(&mut self) -> std::io::Result<Bytes> {
        self.file.flush()?;
        let data = std::fs::read(self.file.path())?;
        Ok(Bytes::from(data))
    }

    /// Explicitly remove the temp file, reporting any deletion error.
    ///
    /// Dropping the spool also removes the file, but silently; the
    /// pipeline calls this so deletion failures can be logged.
    pub fn remove(self) -> std::io::Result<PathBuf> {
        let path = self.file.path().to_path_buf();
        self.file.close()?;
        Ok(path)
    }
}
