//! On-disk snapshots: raw harvests (so preprocessing can be rerun offline) and
//! the clean corpus, as NDJSON or zstd-compressed NDJSON.

use crate::corpus::Corpus;
use crate::ndjson::{NdjsonReader, NdjsonWriter};
use crate::record::CommentRecord;
use crate::util::{create_with_backoff, replace_file_atomic_backoff};
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use zstd::stream::write::Encoder as ZstdEncoder;

/// Export format for corpus outputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Jsonl,
    Zst,
}

fn inprogress_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|s| s.to_os_string()).unwrap_or_default();
    name.push(".inprogress");
    path.with_file_name(name)
}

fn write_rows<'a, T: Serialize + 'a>(
    rows: impl IntoIterator<Item = &'a T>,
    path: &Path,
    format: ExportFormat,
    write_buf: usize,
) -> Result<usize> {
    let tmp = inprogress_path(path);
    let mut n = 0usize;
    match format {
        ExportFormat::Jsonl => {
            let mut w = NdjsonWriter::create(&tmp, write_buf)
                .with_context(|| format!("create {}", tmp.display()))?;
            for row in rows {
                w.write_value(row)?;
                n += 1;
            }
            w.finish_atomic(path)?;
        }
        ExportFormat::Zst => {
            let f = create_with_backoff(&tmp, 16, 50).with_context(|| format!("create {}", tmp.display()))?;
            let mut enc = ZstdEncoder::new(BufWriter::with_capacity(write_buf.max(8 * 1024), f), 3)?;
            for row in rows {
                serde_json::to_writer(&mut enc, row)?;
                enc.write_all(b"\n")?;
                n += 1;
            }
            let mut inner = enc.finish()?;
            inner.flush()?;
            drop(inner);
            replace_file_atomic_backoff(&tmp, path)?;
        }
    }
    Ok(n)
}

impl Corpus {
    /// Write every corpus record (raw fields, date parts, derived text, labels).
    /// Returns the number of lines written.
    pub fn export(&self, path: &Path, format: ExportFormat, write_buf: usize) -> Result<usize> {
        let n = write_rows(self.records(), path, format, write_buf)?;
        tracing::info!("exported {} corpus records to {}", n, path.display());
        Ok(n)
    }
}

/// Persist a raw harvest as NDJSON.
pub fn save_raw(records: &[CommentRecord], path: &Path, write_buf: usize) -> Result<usize> {
    write_rows(records, path, ExportFormat::Jsonl, write_buf)
}

/// Load a raw harvest written by [`save_raw`]. Blank lines are skipped; any
/// malformed line (including an `is_reply` that disagrees with `parent_id`)
/// is an error naming the line.
pub fn load_raw(path: &Path, read_buf: usize) -> Result<Vec<CommentRecord>> {
    let mut rdr = NdjsonReader::open(path, read_buf).with_context(|| format!("open {}", path.display()))?;
    let mut out = Vec::new();
    let mut buf = String::new();
    while rdr.next_record(&mut buf)? {
        let rec: CommentRecord = serde_json::from_str(&buf)
            .with_context(|| format!("{}:{}: invalid record", path.display(), rdr.line_no()))?;
        out.push(rec);
    }
    Ok(out)
}
