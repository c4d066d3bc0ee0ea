//! Directory staging primitives.
//!
//! [`reset_staging`] empties (or creates) a directory without removing the
//! directory node. [`copy_tree`] copies a tree file by file; it is not
//! transactional, so a failure can leave `dest` partially written.

use crate::error::StagingError;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Options for [`copy_tree`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyOptions {
    /// Copy the targets of symbolic links as real files and directories.
    ///
    /// When false, links are recreated as links (unix only).
    pub dereference_symlinks: bool,
}

impl CopyOptions {
    pub fn dereferenced() -> Self {
        Self {
            dereference_symlinks: true,
        }
    }
}

/// What a [`copy_tree`] call wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub files: usize,
    pub dirs: usize,
    pub bytes: u64,
}

/// Remove everything inside `dir`, creating it if absent.
///
/// Safe to call repeatedly. The directory itself is never removed, so the same
/// path stays usable afterwards. Symlinks inside `dir` are removed, not
/// followed.
pub fn reset_staging(dir: &Path) -> Result<(), StagingError> {
    match fs::symlink_metadata(dir) {
        Ok(meta) if !meta.is_dir() => return Err(StagingError::NotADirectory(dir.to_path_buf())),
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(StagingError::io(dir))?;
            tracing::debug!(dir = %dir.display(), "Created staging directory");
            return Ok(());
        }
        Err(e) => return Err(StagingError::io(dir)(e)),
    }

    for entry in fs::read_dir(dir).map_err(StagingError::io(dir))? {
        let entry = entry.map_err(StagingError::io(dir))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(StagingError::io(&path))?;

        if file_type.is_dir() {
            fs::remove_dir_all(&path).map_err(StagingError::io(&path))?;
        } else {
            fs::remove_file(&path).map_err(StagingError::io(&path))?;
        }
    }

    tracing::debug!(dir = %dir.display(), "Reset staging directory");
    Ok(())
}

/// Copy the contents of `src` into `dest`, creating `dest` as needed.
///
/// Existing files in `dest` are overwritten; files not present in `src` are
/// left alone.
pub fn copy_tree(src: &Path, dest: &Path, options: CopyOptions) -> Result<CopyStats, StagingError> {
    if !src.exists() {
        return Err(StagingError::SourceNotFound(src.to_path_buf()));
    }
    if !src.is_dir() {
        return Err(StagingError::NotADirectory(src.to_path_buf()));
    }

    fs::create_dir_all(dest).map_err(StagingError::io(dest))?;

    let mut stats = CopyStats::default();

    for entry in WalkDir::new(src).follow_links(options.dereference_symlinks) {
        let entry = entry?;
        let Ok(rel) = entry.path().strip_prefix(src) else {
            continue;
        };
        if rel.as_os_str().is_empty() {
            continue;
        }
        let out = dest.join(rel);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&out).map_err(StagingError::io(&out))?;
            stats.dirs += 1;
        } else if file_type.is_symlink() {
            copy_link(entry.path(), &out)?;
            stats.files += 1;
        } else if file_type.is_file() {
            if let Some(parent) = out.parent() {
                fs::create_dir_all(parent).map_err(StagingError::io(parent))?;
            }
            stats.bytes += fs::copy(entry.path(), &out).map_err(StagingError::io(&out))?;
            stats.files += 1;
        }
    }

    tracing::debug!(
        src = %src.display(),
        dest = %dest.display(),
        files = stats.files,
        bytes = stats.bytes,
        "Copied tree"
    );
    Ok(stats)
}

#[cfg(unix)]
fn copy_link(link: &Path, out: &Path) -> Result<(), StagingError> {
    let target = fs::read_link(link).map_err(StagingError::io(link))?;
    if fs::symlink_metadata(out).is_ok() {
        fs::remove_file(out).map_err(StagingError::io(out))?;
    }
    std::os::unix::fs::symlink(target, out).map_err(StagingError::io(out))
}

#[cfg(not(unix))]
fn copy_link(link: &Path, out: &Path) -> Result<(), StagingError> {
    fs::copy(link, out).map_err(StagingError::io(out))?;
    Ok(())
}
