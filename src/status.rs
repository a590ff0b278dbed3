//! Read-only inspection of a vocabulary file.
//!
//! The reader takes no locks and may run while a trainer is still appending.
//! `header.len` is the sole authority on how many records are valid; any
//! trailing bytes beyond the declared length are ignored.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use serde::Serialize;

use crate::error::{IbpeError, Result};
use crate::vocab::{MergeRule, VocabHeader, HEADER_LEN, RULE_LEN};

/// Point-in-time view of a vocabulary file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VocabSnapshot {
    /// Whether the producing run has finished.
    pub complete: bool,
    /// Vocabulary size the producing run was configured with.
    pub desired_size: u16,
    /// Committed merge rules, in commit order.
    pub vocab: Vec<MergeRule>,
}

impl VocabSnapshot {
    /// Renders the snapshot as a single-line JSON document.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

enum ReadFailure {
    /// The file ended before the full header could be read.
    TruncatedHeader,
    /// The file ended before `header.len` records could be read.
    TruncatedBody { expected: u16, read: u16 },
    Fatal(IbpeError),
}

impl ReadFailure {
    fn into_error(self) -> IbpeError {
        match self {
            Self::TruncatedHeader => IbpeError::Format(format!(
                "truncated vocabulary file: shorter than the {HEADER_LEN}-byte header"
            )),
            Self::TruncatedBody { expected, read } => IbpeError::Format(format!(
                "truncated vocabulary file: header declares {expected} rules, read {read}"
            )),
            Self::Fatal(err) => err,
        }
    }
}

/// Reads a snapshot of the vocabulary file at `path`.
///
/// A short read is retried once from the start of the file: the writer may be
/// mid-commit, and the second attempt observes either the old or the new
/// consistent state.  A second short read is a fatal format error.
pub fn read_snapshot(path: &Path) -> Result<VocabSnapshot> {
    match try_read(path) {
        Ok(snapshot) => Ok(snapshot),
        Err(failure @ ReadFailure::Fatal(_)) => Err(failure.into_error()),
        Err(_truncated) => try_read(path).map_err(ReadFailure::into_error),
    }
}

fn try_read(path: &Path) -> std::result::Result<VocabSnapshot, ReadFailure> {
    let mut file = File::open(path)
        .map_err(|err| ReadFailure::Fatal(IbpeError::io(err, Some(path.to_path_buf()))))?;

    let mut header_buf = [0u8; HEADER_LEN];
    if !read_chunk(&mut file, &mut header_buf, path).map_err(ReadFailure::Fatal)? {
        return Err(ReadFailure::TruncatedHeader);
    }
    let header = VocabHeader::from_bytes(header_buf).map_err(ReadFailure::Fatal)?;

    let mut vocab = Vec::with_capacity(usize::from(header.len));
    let mut rule_buf = [0u8; RULE_LEN];
    for read in 0..header.len {
        if !read_chunk(&mut file, &mut rule_buf, path).map_err(ReadFailure::Fatal)? {
            return Err(ReadFailure::TruncatedBody {
                expected: header.len,
                read,
            });
        }
        vocab.push(MergeRule::from_bytes(rule_buf));
    }

    Ok(VocabSnapshot {
        complete: header.complete,
        desired_size: header.desired_len,
        vocab,
    })
}

/// Fills `buf` from the file; `Ok(false)` means the file ended first.
fn read_chunk(file: &mut File, buf: &mut [u8], path: &Path) -> Result<bool> {
    match file.read_exact(buf) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == ErrorKind::UnexpectedEof => Ok(false),
        Err(err) => Err(IbpeError::io(err, Some(path.to_path_buf()))),
    }
}
