//! On-disk layer under [`FileStore`](crate::FileStore): every storage value is
//! one file inside a single record directory.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("record directory missing or not writable: {0}")]
    StorageDir(String),
    #[error("storage io error: {0}")]
    Io(#[from] io::Error),
}

/// Create the record directory on first save. A plain file in its place is an error.
pub fn ensure_storage_dir(dir: &Path) -> Result<(), PersistError> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(PersistError::StorageDir(format!(
            "{} is not a directory",
            dir.display()
        ))),
        Err(err) if err.kind() == io::ErrorKind::NotFound => fs::create_dir_all(dir)
            .map_err(|e| PersistError::StorageDir(format!("{}: {e}", dir.display()))),
        Err(err) => Err(PersistError::StorageDir(format!("{}: {err}", dir.display()))),
    }
}

/// Directory holding stored values, one file each.
///
/// A save replaces the whole value: the new text goes to a temp file in the
/// same directory and is renamed over the old one, so a reader sees the
/// previous record or the new one and never a half-written mix.
#[derive(Debug, Clone)]
pub struct RecordDir {
    dir: PathBuf,
}

impl RecordDir {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Stored text of `file_name`; `None` before the first save.
    pub fn read(&self, file_name: &str) -> Result<Option<String>, PersistError> {
        match fs::read_to_string(self.dir.join(file_name)) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Replace the stored text of `file_name`, returning the file's path.
    pub fn replace(&self, file_name: &str, value: &str) -> Result<PathBuf, PersistError> {
        ensure_storage_dir(&self.dir)?;

        let target = self.dir.join(file_name);
        let mut staged = NamedTempFile::new_in(&self.dir)?;
        staged.write_all(value.as_bytes())?;
        staged.as_file_mut().sync_all()?;

        staged.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}
