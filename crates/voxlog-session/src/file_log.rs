use crate::log_sink::LogSink;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use voxlog_core::LogError;

/// Appends each line to a file, creating it if needed.
pub struct FileLog {
    path: PathBuf,
    file: File,
}

impl FileLog {
    pub fn open(path: &Path) -> Result<Self, LogError> {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| LogError::Open(format!("{}: {e}", path.display())))?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for FileLog {
    fn name(&self) -> &str {
        "file"
    }

    fn append(&mut self, entry: &str) -> Result<(), LogError> {
        writeln!(self.file, "{entry}").map_err(|e| LogError::Write(e.to_string()))?;
        self.file
            .flush()
            .map_err(|e| LogError::Write(e.to_string()))?;
        Ok(())
    }
}
