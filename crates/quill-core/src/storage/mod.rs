//! Filesystem persistence
//!
//! Node files and edge logs under the configured data directory. Node writes
//! are atomic; edge logs are append-only.

mod edges;
mod nodes;

pub use edges::EdgeLog;
pub use nodes::{NodeKind, NodeStore};

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::error::{StoreError, StoreResult};

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
///
/// This ensures the target file is never left in a partially-written state.
pub(crate) fn atomic_write(path: &Path, data: &[u8]) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StoreError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    // Temp file in the same directory so the rename stays on one filesystem
    let temp_path = path.with_extension("tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| StoreError::from_io(e, temp_path.clone()))?;

    file.write_all(data)
        .map_err(|e| StoreError::from_io(e, temp_path.clone()))?;

    file.sync_all()
        .map_err(|e| StoreError::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|source| StoreError::AtomicWriteFailed {
        from: temp_path,
        to: path.to_path_buf(),
        source,
    })?;

    Ok(())
}
