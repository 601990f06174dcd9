use crate::util::{create_with_backoff, open_with_backoff, replace_file_atomic_backoff};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Buffered NDJSON reader yielding non-blank lines with their 1-based line number.
pub struct NdjsonReader {
    rdr: BufReader<File>,
    line_no: usize,
}

impl NdjsonReader {
    pub fn open(path: &Path, buf_bytes: usize) -> io::Result<Self> {
        let f = open_with_backoff(path, 16, 50)?;
        Ok(Self { rdr: BufReader::with_capacity(buf_bytes.max(8 * 1024), f), line_no: 0 })
    }

    /// Line number of the record last returned by [`next_record`](Self::next_record).
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    /// Fill `buf` with the next non-blank line, terminator stripped.
    /// Returns `false` at end of file.
    pub fn next_record(&mut self, buf: &mut String) -> io::Result<bool> {
        loop {
            buf.clear();
            if self.rdr.read_line(buf)? == 0 {
                return Ok(false);
            }
            self.line_no += 1;
            let content_len = buf.trim_end_matches(['\n', '\r']).len();
            buf.truncate(content_len);
            if !buf.trim().is_empty() {
                return Ok(true);
            }
        }
    }
}

/// Buffered NDJSON writer over a temp path, promoted on `finish_atomic`.
pub struct NdjsonWriter {
    path: PathBuf,
    w: BufWriter<File>,
}

impl NdjsonWriter {
    pub fn create(path: &Path, buf_bytes: usize) -> io::Result<Self> {
        let f = create_with_backoff(path, 16, 50)?;
        Ok(Self { path: path.to_path_buf(), w: BufWriter::with_capacity(buf_bytes.max(8 * 1024), f) })
    }

    /// Write one serialized value followed by `\n`.
    pub fn write_value<T: serde::Serialize>(&mut self, value: &T) -> Result<()> {
        serde_json::to_writer(&mut self.w, value)?;
        self.w.write_all(b"\n")?;
        Ok(())
    }

    /// Flush and move the temp file to `final_path`.
    pub fn finish_atomic(mut self, final_path: &Path) -> Result<()> {
        self.w.flush().with_context(|| format!("flush {}", self.path.display()))?;
        drop(self.w);
        replace_file_atomic_backoff(&self.path, final_path)
    }
}
