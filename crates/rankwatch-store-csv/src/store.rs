//! [`CsvHistoryStore`]: the CSV implementation of [`HistoryStore`].

use std::{
  fs::{self, File, OpenOptions},
  io::{self, Read as _, Seek as _, SeekFrom, Write as _},
  path::{Path, PathBuf},
  sync::Arc,
};

use rankwatch_core::{
  history::HistoryStore,
  observation::{HistoryEntry, RankObservation},
};
use tracing::{debug, info};

use crate::{
  Error, Result,
  encode::{decode_record, encode_observation},
  schema::{CURRENT, Layout},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A rank history log backed by a single comma-separated file.
///
/// Cloning is cheap because the path is reference-counted. No file lock is taken;
/// the store assumes a single writer process.
#[derive(Debug, Clone)]
pub struct CsvHistoryStore {
  path: Arc<PathBuf>,
}

impl CsvHistoryStore {
  /// Point a store at `path`. The file is created on the first append.
  pub fn open(path: impl AsRef<Path>) -> Self {
    Self { path: Arc::new(path.as_ref().to_path_buf()) }
  }

  pub fn path(&self) -> &Path { &self.path }

  fn io_error(&self, source: io::Error) -> Error {
    Error::Io { path: self.path.to_path_buf(), source }
  }

  /// Size of the file, or 0 when it does not exist yet.
  fn existing_len(&self) -> Result<u64> {
    match fs::metadata(self.path.as_path()) {
      Ok(meta) => Ok(meta.len()),
      Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(0),
      Err(e) => Err(self.io_error(e)),
    }
  }

  /// Whether the last byte of a non-empty file is `\n`.
  fn ends_with_newline(&self) -> Result<bool> {
    let mut file = File::open(self.path.as_path()).map_err(|e| self.io_error(e))?;
    file.seek(SeekFrom::End(-1)).map_err(|e| self.io_error(e))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last).map_err(|e| self.io_error(e))?;
    Ok(last[0] == b'\n')
  }

  fn append_blocking(&self, observations: &[RankObservation]) -> Result<usize> {
    let len = self.existing_len()?;

    let mut buf = Vec::new();
    // Terminate a hand-edited last row so the batch starts on its own line.
    if len > 0 && !self.ends_with_newline()? {
      buf.push(b'\n');
    }

    let mut writer = csv::Writer::from_writer(buf);
    if len == 0 {
      writer.write_record(CURRENT)?;
    }
    for obs in observations {
      writer.write_record(encode_observation(obs))?;
    }
    let buf = writer
      .into_inner()
      .map_err(|e| self.io_error(io::Error::new(e.error().kind(), e.to_string())))?;

    // One write on an append-mode handle: earlier rows are never touched.
    let mut file = OpenOptions::new()
      .create(true)
      .append(true)
      .open(self.path.as_path())
      .map_err(|e| self.io_error(e))?;
    file.write_all(&buf).map_err(|e| self.io_error(e))?;
    file.flush().map_err(|e| self.io_error(e))?;

    Ok(observations.len())
  }

  fn load_blocking(&self) -> Result<Vec<HistoryEntry>> {
    if !self.path.exists() {
      return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
      .has_headers(false)
      .flexible(true)
      .from_path(self.path.as_path())?;

    let mut entries = Vec::new();
    let mut dropped = 0usize;
    for record in reader.records() {
      let record = record?;
      if record.iter().all(|f| f.trim().is_empty()) {
        continue;
      }

      let line = record.position().map(|p| p.line()).unwrap_or_default();
      let layout = Layout::detect(record.len())
        .ok_or(Error::Schema { line, columns: record.len() })?;
      if layout.is_header(&record) {
        continue;
      }

      match decode_record(layout, &record) {
        Some(entry) => entries.push(entry),
        None => dropped += 1,
      }
    }

    debug!(
      path = %self.path.display(),
      loaded = entries.len(),
      dropped,
      "loaded rank history"
    );
    Ok(entries)
  }
}

// ─── HistoryStore impl ───────────────────────────────────────────────────────

impl HistoryStore for CsvHistoryStore {
  type Error = Error;

  async fn append(&self, observations: Vec<RankObservation>) -> Result<usize> {
    if observations.is_empty() {
      return Ok(0);
    }
    let store = self.clone();
    let written =
      tokio::task::spawn_blocking(move || store.append_blocking(&observations)).await??;
    info!(path = %self.path.display(), rows = written, "appended rank history");
    Ok(written)
  }

  async fn load_all(&self) -> Result<Vec<HistoryEntry>> {
    let store = self.clone();
    tokio::task::spawn_blocking(move || store.load_blocking()).await?
  }
}
