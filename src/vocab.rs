//! Merge rules and the incrementally-committed vocabulary file.
//!
//! On disk a vocabulary is a fixed 10-byte header followed by `len` 6-byte
//! rule records in commit order.  The body is append-only; only the header is
//! ever rewritten in place.  All multi-byte fields are little-endian.

use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{IbpeError, Result};

/// Token identifier used throughout the crate.
///
/// `[0, 255]` are the raw byte values; replacement ids are assigned from 256
/// upward at commit time.
pub type TokenId = u16;

/// Ordered pair of adjacent token ids.
pub type Pair = (TokenId, TokenId);

/// Number of token ids reserved for the raw byte alphabet.
pub const BASE_VOCAB: TokenId = 256;

/// Magic preamble opening every vocabulary file.
pub const MAGIC: &[u8; 5] = b"VOCAB";

/// Size in bytes of the fixed header.
pub const HEADER_LEN: usize = 10;

/// Size in bytes of one serialized merge rule.
pub const RULE_LEN: usize = 6;

/// One committed BPE replacement step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRule {
    /// First token id of the merged pair.
    pub b1: TokenId,
    /// Second token id of the merged pair.
    pub b2: TokenId,
    /// Replacement id assigned at commit time (`256 + commit index`).
    pub rep: TokenId,
}

impl MergeRule {
    pub(crate) fn to_bytes(self) -> [u8; RULE_LEN] {
        let mut buf = [0u8; RULE_LEN];
        buf[0..2].copy_from_slice(&self.b1.to_le_bytes());
        buf[2..4].copy_from_slice(&self.b2.to_le_bytes());
        buf[4..6].copy_from_slice(&self.rep.to_le_bytes());
        buf
    }

    pub(crate) fn from_bytes(buf: [u8; RULE_LEN]) -> Self {
        Self {
            b1: TokenId::from_le_bytes([buf[0], buf[1]]),
            b2: TokenId::from_le_bytes([buf[2], buf[3]]),
            rep: TokenId::from_le_bytes([buf[4], buf[5]]),
        }
    }
}

/// Fixed-size metadata block preceding the rule records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VocabHeader {
    /// Whether training finished; transitions false -> true exactly once.
    pub complete: bool,
    /// Number of rule records valid in the file body.
    pub len: u16,
    /// Target vocabulary size the producing run was configured with.
    pub desired_len: u16,
}

impl VocabHeader {
    pub(crate) fn to_bytes(self) -> [u8; HEADER_LEN] {
        let mut buf = [0u8; HEADER_LEN];
        buf[0..5].copy_from_slice(MAGIC);
        buf[5] = u8::from(self.complete);
        buf[6..8].copy_from_slice(&self.len.to_le_bytes());
        buf[8..10].copy_from_slice(&self.desired_len.to_le_bytes());
        buf
    }

    pub(crate) fn from_bytes(buf: [u8; HEADER_LEN]) -> Result<Self> {
        if &buf[0..5] != MAGIC {
            return Err(IbpeError::Format("bad magic preamble".into()));
        }
        Ok(Self {
            complete: buf[5] != 0,
            len: u16::from_le_bytes([buf[6], buf[7]]),
            desired_len: u16::from_le_bytes([buf[8], buf[9]]),
        })
    }
}

/// Sole writer of a vocabulary file.
///
/// Commit ordering is the contract that makes lock-free concurrent readers
/// safe: the record is appended and synced *before* the header is rewritten
/// with the incremented length, so an observed `len` never exceeds the
/// records actually present in the body.  A crash between the two writes
/// leaves the file stale but parseable.
#[derive(Debug)]
pub struct VocabWriter {
    file: File,
    path: PathBuf,
    header: VocabHeader,
    rules: Vec<MergeRule>,
}

impl VocabWriter {
    /// Creates the vocabulary file, truncating any previous contents, and
    /// writes a header with `len = 0`.
    ///
    /// Truncation is deliberate: resuming a run from an existing file is
    /// unsupported.  The incremental format exists so concurrent `status`
    /// readers can inspect a live run, not so a crashed run can continue.
    pub fn create(path: &Path, desired_len: u16) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|err| IbpeError::io(err, Some(path.to_path_buf())))?;
        let header = VocabHeader {
            complete: false,
            len: 0,
            desired_len,
        };
        let mut writer = Self {
            file,
            path: path.to_path_buf(),
            header,
            rules: Vec::new(),
        };
        writer.rewrite_header()?;
        Ok(writer)
    }

    /// Committed rules in commit order.
    #[must_use]
    pub fn rules(&self) -> &[MergeRule] {
        &self.rules
    }

    /// Number of committed rules.
    #[must_use]
    pub fn len(&self) -> u16 {
        self.header.len
    }

    /// Returns `true` before the first commit.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.header.len == 0
    }

    /// Assigns the next replacement id to `pair` and commits the resulting
    /// rule: append the record at end of file, sync, rewrite the header with
    /// the incremented length, sync.
    pub fn commit(&mut self, pair: Pair) -> Result<MergeRule> {
        let rep = BASE_VOCAB
            .checked_add(self.header.len)
            .ok_or_else(|| IbpeError::Internal("replacement id overflowed u16".into()))?;
        let rule = MergeRule {
            b1: pair.0,
            b2: pair.1,
            rep,
        };

        self.file
            .seek(SeekFrom::End(0))
            .map_err(|err| self.io_err(err))?;
        self.file
            .write_all(&rule.to_bytes())
            .map_err(|err| self.io_err(err))?;
        self.file.sync_data().map_err(|err| self.io_err(err))?;

        self.header.len += 1;
        self.rewrite_header()?;
        self.rules.push(rule);
        Ok(rule)
    }

    /// Marks the file complete and rewrites the header one final time -- the
    /// single terminal state transition.
    pub fn finalize(mut self) -> Result<()> {
        self.header.complete = true;
        self.rewrite_header()
    }

    fn rewrite_header(&mut self) -> Result<()> {
        self.file
            .seek(SeekFrom::Start(0))
            .map_err(|err| self.io_err(err))?;
        self.file
            .write_all(&self.header.to_bytes())
            .map_err(|err| self.io_err(err))?;
        self.file.sync_data().map_err(|err| self.io_err(err))?;
        Ok(())
    }

    fn io_err(&self, err: std::io::Error) -> IbpeError {
        IbpeError::io(err, Some(self.path.clone()))
    }
}
