//! Incremental reader for append-only hand-history files.
//!
//! Each watched path has a byte offset. A poll reads `[offset, len)` and only
//! then advances the offset, so a failed read is retried in full next time.

use crate::split::{HandBlock, HandSplitter};
use log::{debug, warn};
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum TailError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl TailError {
    fn io(path: &Path, source: io::Error) -> Self {
        TailError::Io { path: path.to_path_buf(), source }
    }

    pub fn path(&self) -> &Path {
        match self {
            TailError::Io { path, .. } => path,
        }
    }
}

/// Per-file progress.
#[derive(Debug, Default, Clone)]
pub struct TailState {
    offset: u64,
    /// Trailing bytes of an incomplete UTF-8 sequence.
    partial: Vec<u8>,
    splitter: HandSplitter,
}

impl TailState {
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn pending(&self) -> &str {
        self.splitter.pending()
    }

    fn reset(&mut self) {
        self.offset = 0;
        self.partial.clear();
        self.splitter.clear();
    }
}

/// Owns the offset table for every watched file.
#[derive(Debug, Default)]
pub struct Tailer {
    files: HashMap<PathBuf, TailState>,
}

impl Tailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start watching `path` from its first byte.
    pub fn track(&mut self, path: impl Into<PathBuf>) {
        self.files.entry(path.into()).or_default();
    }

    pub fn forget(&mut self, path: &Path) -> Option<TailState> {
        self.files.remove(path)
    }

    pub fn offset(&self, path: &Path) -> Option<u64> {
        self.files.get(path).map(TailState::offset)
    }

    pub fn state(&self, path: &Path) -> Option<&TailState> {
        self.files.get(path)
    }

    pub fn watched(&self) -> impl Iterator<Item = &Path> {
        self.files.keys().map(PathBuf::as_path)
    }

    /// Read newly appended bytes and return the hands they complete.
    ///
    /// The last hand is held back until a blank line follows it.
    pub fn poll(&mut self, path: &Path) -> Result<Vec<HandBlock>, TailError> {
        let Some(delta) = self.read_delta(path)? else {
            return Ok(Vec::new());
        };
        let state = self.files.entry(path.to_path_buf()).or_default();
        let blocks = state.splitter.push(&delta);
        debug!("{}: {} new bytes, {} complete hands", path.display(), delta.len(), blocks.len());
        Ok(blocks)
    }

    /// Read `[offset, len)` as text and advance the offset.
    ///
    /// `None` when nothing was appended. A file that shrank is read again from
    /// the start.
    pub fn read_delta(&mut self, path: &Path) -> Result<Option<String>, TailError> {
        let len = std::fs::metadata(path).map_err(|e| TailError::io(path, e))?.len();
        let state = self.files.entry(path.to_path_buf()).or_default();

        if len < state.offset {
            warn!(
                "{} shrank from {} to {} bytes, reading from the start",
                path.display(),
                state.offset,
                len
            );
            state.reset();
        }
        if len <= state.offset {
            return Ok(None);
        }

        let bytes = read_range(path, state.offset, len).map_err(|e| TailError::io(path, e))?;
        state.offset = len;

        let mut buf = std::mem::take(&mut state.partial);
        buf.extend_from_slice(&bytes);
        let (text, rest) = decode_utf8(buf);
        state.partial = rest;
        Ok(Some(text))
    }

    /// Release the held-back last hand of `path`.
    pub fn flush(&mut self, path: &Path) -> Option<HandBlock> {
        let state = self.files.get_mut(path)?;
        if !state.partial.is_empty() {
            let rest = String::from_utf8_lossy(&std::mem::take(&mut state.partial)).into_owned();
            state.splitter.push(&rest);
        }
        state.splitter.finish()
    }
}

fn read_range(path: &Path, start: u64, end: u64) -> io::Result<Vec<u8>> {
    let mut file = File::open(path)?;
    file.seek(SeekFrom::Start(start))?;
    let mut bytes = Vec::with_capacity((end - start) as usize);
    file.take(end - start).read_to_end(&mut bytes)?;
    if (bytes.len() as u64) < end - start {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "file shrank during read"));
    }
    Ok(bytes)
}

/// Decode as much as possible, keeping an incomplete trailing sequence.
/// Invalid sequences anywhere before it are replaced.
fn decode_utf8(mut buf: Vec<u8>) -> (String, Vec<u8>) {
    let mut start = 0;
    let incomplete_at = loop {
        match std::str::from_utf8(&buf[start..]) {
            Ok(_) => break None,
            Err(e) => match e.error_len() {
                Some(len) => start += e.valid_up_to() + len,
                None => break Some(start + e.valid_up_to()),
            },
        }
    };
    let rest = incomplete_at.map(|at| buf.split_off(at)).unwrap_or_default();
    (String::from_utf8_lossy(&buf).into_owned(), rest)
}
