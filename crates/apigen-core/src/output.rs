//! Change-detecting, atomic file writes
//!
//! Nothing is written unless its rendered content differs byte-for-byte from
//! what is on disk, so unchanged outputs keep their timestamps and do not
//! trigger rebuilds. Writes go to a temporary file in the destination
//! directory which is then renamed over the target.

use crate::error::{GenError, GenResult};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// What a pending write produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    /// A new handler stub
    Stub,
    /// An existing handler with a refreshed doc block
    HandlerDocs,
    /// A rendered template output
    Output,
}

/// A file write computed during planning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingWrite {
    pub path: PathBuf,
    pub contents: String,
    pub kind: WriteKind,
}

/// True when `path` already holds exactly `contents`
pub fn is_current(path: &Path, contents: &str) -> GenResult<bool> {
    match fs::read(path) {
        Ok(existing) => Ok(existing == contents.as_bytes()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(GenError::io(path, e)),
    }
}

/// Replace `path` with `contents` via a temporary file and rename
///
/// Parent directories are created as needed. An existing file keeps its
/// permissions. A symlink is written through: its target is replaced and the
/// link stays in place.
pub fn write_atomic(path: &Path, contents: &str) -> GenResult<()> {
    let resolved = link_target(path)?;
    let path = resolved.as_path();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| GenError::io(dir, e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| GenError::io(dir, e))?;
    tmp.write_all(contents.as_bytes())
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| GenError::io(tmp.path(), e))?;

    if let Some(permissions) = target_permissions(path)? {
        fs::set_permissions(tmp.path(), permissions).map_err(|e| GenError::io(tmp.path(), e))?;
    }

    tmp.persist(path)
        .map_err(|e| GenError::io(path, e.error))?;
    Ok(())
}

/// The file a write to `path` lands in
fn link_target(path: &Path) -> GenResult<PathBuf> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => {
            fs::canonicalize(path).map_err(|e| GenError::io(path, e))
        }
        Ok(_) => Ok(path.to_path_buf()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(path.to_path_buf()),
        Err(e) => Err(GenError::io(path, e)),
    }
}

/// Create `path` with `contents`, failing if anything already exists there
///
/// Used for new handler stubs so a file or link that appeared after planning
/// is never replaced.
pub fn write_new(path: &Path, contents: &str) -> GenResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| GenError::io(dir, e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| GenError::io(dir, e))?;
    tmp.write_all(contents.as_bytes())
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| GenError::io(tmp.path(), e))?;

    if let Some(permissions) = new_file_permissions() {
        fs::set_permissions(tmp.path(), permissions).map_err(|e| GenError::io(tmp.path(), e))?;
    }

    tmp.persist_noclobber(path)
        .map_err(|e| GenError::io(path, e.error))?;
    Ok(())
}

/// Permissions the written file should end up with
fn target_permissions(path: &Path) -> GenResult<Option<fs::Permissions>> {
    match fs::metadata(path) {
        Ok(meta) => Ok(Some(meta.permissions())),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(new_file_permissions()),
        Err(e) => Err(GenError::io(path, e)),
    }
}

// Temporary files are created 0600; new sources should be world-readable
#[cfg(unix)]
fn new_file_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<fs::Permissions> {
    None
}
