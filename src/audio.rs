//! Audio persistence.
//!
//! Uploaded voice messages land in a single fixed file, overwritten on
//! every upload. The payload is raw 16-bit PCM with no header; the server
//! does not validate sample rate or channel count — the recording
//! configuration is agreed with the client out of band.

use std::io;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::info;

/// Writes uploaded audio payloads to a fixed destination file.
///
/// Writes are serialized through an internal lock so two concurrent
/// uploads cannot interleave partial content; the last complete write
/// wins.
pub struct AudioSink {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl AudioSink {
    /// Create a sink writing to the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Destination path for uploaded audio
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the payload to the destination file, truncating any prior
    /// content.
    pub async fn save(&self, data: &[u8]) -> io::Result<()> {
        let _guard = self.write_lock.lock().await;
        tokio::fs::write(&self.path, data).await?;
        info!(path = %self.path.display(), bytes = data.len(), "Audio saved");
        Ok(())
    }
}
