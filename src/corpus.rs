//! Loading raw input files with missing-file tolerance.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::warn;

use crate::error::{IbpeError, Result};

/// Reads one input file fully into memory.
///
/// Returns `Ok(None)` when the file does not exist: a partially-available
/// corpus is tolerated, so the caller logs on and proceeds with the remaining
/// files.  Any other IO failure is fatal.
pub fn read_input(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            warn!("input file {} does not exist, continuing", path.display());
            Ok(None)
        }
        Err(err) => Err(IbpeError::io(err, Some(path.to_path_buf()))),
    }
}
