use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use dashboard_logging::dashboard_info;
use tempfile::NamedTempFile;

use crate::SaveError;

/// The host's "save as" capability.
pub trait FileSaver: Send + Sync {
    fn save_as(&self, payload: &[u8], filename: &str) -> Result<PathBuf, SaveError>;
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), SaveError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| SaveError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(SaveError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| SaveError::OutputDir(e.to_string()))?;
    }
    Ok(())
}

/// Writes `{dir}/{filename}` through a temp file and a rename, so a failed
/// download never leaves a truncated file behind.
#[derive(Debug, Clone)]
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn write(&self, filename: &str, content: &[u8]) -> Result<PathBuf, SaveError> {
        if !is_plain_filename(filename) {
            return Err(SaveError::InvalidName(filename.to_string()));
        }
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content)?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        // A second download of the same artifact replaces the first copy.
        if target.exists() {
            fs::remove_file(&target)?;
        }
        tmp.persist(&target).map_err(|e| SaveError::Io(e.error))?;
        Ok(target)
    }
}

fn is_plain_filename(filename: &str) -> bool {
    !filename.trim().is_empty()
        && filename != "."
        && filename != ".."
        && !filename.contains(['/', '\\'])
}

/// Saves downloads into one local directory.
#[derive(Debug, Clone)]
pub struct DirectorySaver {
    writer: AtomicFileWriter,
}

impl DirectorySaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            writer: AtomicFileWriter::new(dir.into()),
        }
    }

    pub fn dir(&self) -> &Path {
        self.writer.dir()
    }
}

impl FileSaver for DirectorySaver {
    fn save_as(&self, payload: &[u8], filename: &str) -> Result<PathBuf, SaveError> {
        let path = self.writer.write(filename, payload)?;
        dashboard_info!("Saved {} bytes to {:?}", payload.len(), path);
        Ok(path)
    }
}
