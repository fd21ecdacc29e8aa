//! Staged, all-or-nothing file replacement

use crate::{Result, StoreError};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Replace every target file with its paired contents
///
/// All contents are first written and fsynced to temporary files next to
/// their destinations. Only when every staging write succeeded are the
/// temporaries renamed into place, so an I/O failure while staging leaves
/// all prior files untouched. Old contents are always fully replaced, never
/// partially overwritten.
///
/// Each rename is atomic but the set of renames is not. If a rename fails
/// after earlier ones succeeded, [`StoreError::Commit`] lists the targets
/// that already hold the new contents; rerunning the write restores
/// agreement.
pub fn write_atomic(entries: &[(&Path, &[u8])]) -> Result<()> {
    let mut staged = Vec::with_capacity(entries.len());

    for &(target, bytes) in entries {
        let dir = target.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
        fs::create_dir_all(dir).map_err(|source| StoreError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut file = NamedTempFile::new_in(dir).map_err(|source| StoreError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        file.write_all(bytes)
            .and_then(|_| file.as_file().sync_all())
            .map_err(|source| StoreError::Io {
                path: file.path().to_path_buf(),
                source,
            })?;

        staged.push((file, target));
    }

    let mut committed = Vec::with_capacity(staged.len());
    for (file, target) in staged {
        if let Err(e) = file.persist(target) {
            if !committed.is_empty() {
                tracing::error!(
                    failed = %target.display(),
                    replaced = committed.len(),
                    "Partial commit: copies now differ"
                );
            }
            return Err(StoreError::Commit {
                path: target.to_path_buf(),
                committed,
                source: e.error,
            });
        }
        tracing::debug!("Committed {}", target.display());
        committed.push(target.to_path_buf());
    }

    Ok(())
}
