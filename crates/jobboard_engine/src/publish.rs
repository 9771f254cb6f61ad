use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use board_logging::board_info;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("invalid file name: {0}")]
    FileName(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PublishError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PublishError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PublishError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PublishError::OutputDir(e.to_string()))?;
    }
    NamedTempFile::new_in(dir).map_err(|e| PublishError::OutputDir(e.to_string()))?;
    Ok(())
}

/// Writes rendered board pages into one directory, replacing files atomically.
pub struct SitePublisher {
    dir: PathBuf,
}

impl SitePublisher {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn publish(&self, filename: &str, content: &str) -> Result<PathBuf, PublishError> {
        validate_file_name(filename)?;
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        if target.exists() {
            fs::remove_file(&target)?;
        }
        tmp.persist(&target).map_err(|e| PublishError::Io(e.error))?;
        board_info!("Published {} ({} bytes)", target.display(), content.len());
        Ok(target)
    }
}

fn validate_file_name(filename: &str) -> Result<(), PublishError> {
    let trimmed = filename.trim();
    if trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || trimmed.contains(['/', '\\'])
    {
        return Err(PublishError::FileName(filename.to_string()));
    }
    Ok(())
}
