use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use opener_logging::opener_info;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("export file name must be a plain file name: {0:?}")]
    InvalidFilename(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Create `dir` if needed and check that it is a directory.
pub fn ensure_output_dir(dir: &Path) -> Result<(), ExportError> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| ExportError::OutputDir(e.to_string()))?;
    }
    let meta = fs::metadata(dir).map_err(|e| ExportError::OutputDir(e.to_string()))?;
    if !meta.is_dir() {
        return Err(ExportError::OutputDir(format!(
            "{} is not a directory",
            dir.display()
        )));
    }
    Ok(())
}

/// Writes exported URL lists into one directory. Each file is written to a
/// temp file first and renamed into place, so readers never see a partial
/// export.
#[derive(Debug, Clone)]
pub struct ExportWriter {
    dir: PathBuf,
}

impl ExportWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn write(&self, filename: &str, contents: &str) -> Result<PathBuf, ExportError> {
        if !is_plain_file_name(filename) {
            return Err(ExportError::InvalidFilename(filename.to_string()));
        }
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(contents.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&target).map_err(|e| ExportError::Io(e.error))?;

        opener_info!("Exported {} bytes to {:?}", contents.len(), target);
        Ok(target)
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && Path::new(name).file_name().and_then(|n| n.to_str()) == Some(name)
        && name != "."
        && name != ".."
}
