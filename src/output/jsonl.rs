//! Newline-delimited JSON file writer

use crate::output::traits::{DocumentSink, OutputResult};
use crate::transform::DestinationDocument;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes one JSON object per line to a file
///
/// The file is created (or truncated) on construction and closed when the
/// writer is dropped. Call [`DocumentSink::flush`] before dropping to surface
/// write errors; drop only flushes on a best-effort basis.
#[derive(Debug)]
pub struct JsonLinesWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    written: u64,
}

impl JsonLinesWriter {
    /// Creates or truncates the file at `path`
    pub fn create(path: &Path) -> OutputResult<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            path: path.to_path_buf(),
            written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentSink for JsonLinesWriter {
    fn write_document(&mut self, document: &DestinationDocument) -> OutputResult<()> {
        serde_json::to_writer(&mut self.writer, document)?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    fn flush(&mut self) -> OutputResult<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn documents_written(&self) -> u64 {
        self.written
    }
}
