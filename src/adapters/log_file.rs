//! File-backed transcript log.
//!
//! The file is created (or truncated) when the session starts.  Each record
//! is written as one `\n`-terminated line and flushed before `append`
//! returns.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::info;

use crate::app::ports::TranscriptLog;

pub struct FileLog {
    file: File,
    path: PathBuf,
}

impl FileLog {
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        info!("transcript: {}", path.display());
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TranscriptLog for FileLog {
    fn append(&mut self, line: &str) -> io::Result<()> {
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        self.file.flush()
    }
}
