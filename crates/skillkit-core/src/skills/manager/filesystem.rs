use std::fs;
use std::path::Path;

use crate::error::{Result, SkillError};

const VCS_DIR_NAME: &str = ".git";

pub(crate) fn remove_path(path: &Path) -> Result<bool> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(error) => return Err(SkillError::Io(error)),
    };

    if metadata.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }
    Ok(true)
}

/// Fail when `source` lies inside an existing `destination` other than itself,
/// since clearing the destination would delete the source with it.
pub(crate) fn ensure_replaceable(source: &Path, destination: &Path) -> Result<()> {
    let source = fs::canonicalize(source)?;
    let Ok(existing) = fs::canonicalize(destination) else {
        return Ok(());
    };
    if existing != source && source.starts_with(&existing) {
        return Err(SkillError::invalid_skill(
            &source,
            format!(
                "cannot install from inside the existing installation at '{}'",
                existing.display()
            ),
        ));
    }
    Ok(())
}

/// Replace `destination` with a fresh copy of `source`.
///
/// Any existing destination is deleted first, so files dropped from a newer
/// version do not linger. Copying a directory onto itself is a no-op.
pub(crate) fn replace_directory(source: &Path, destination: &Path) -> Result<()> {
    ensure_replaceable(source, destination)?;
    let source = fs::canonicalize(source)?;
    if let Ok(existing) = fs::canonicalize(destination) {
        if existing == source {
            return Ok(());
        }
    }

    remove_path(destination)?;
    fs::create_dir_all(destination)?;
    let destination = fs::canonicalize(destination)?;
    copy_directory_recursive(&source, &destination, &destination)
}

fn copy_directory_recursive(source: &Path, destination: &Path, skip: &Path) -> Result<()> {
    let metadata = fs::metadata(source)?;
    if !metadata.is_dir() {
        return Err(SkillError::invalid_skill(source, "skill source is not a directory"));
    }

    fs::create_dir_all(destination)?;
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let source_path = entry.path();
        // Installing from a parent of the destination must not copy the copy.
        if source_path == skip || entry.file_name() == VCS_DIR_NAME {
            continue;
        }
        let target_path = destination.join(entry.file_name());
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            copy_directory_recursive(&source_path, &target_path, skip)?;
            continue;
        }

        if file_type.is_symlink() {
            match fs::metadata(&source_path) {
                Ok(linked) if linked.is_file() => {
                    fs::copy(&source_path, &target_path)?;
                }
                Ok(_) => {
                    tracing::debug!(path = %source_path.display(), "not following symlinked directory");
                }
                Err(error) => {
                    tracing::debug!(path = %source_path.display(), %error, "skipping dangling symlink");
                }
            }
            continue;
        }

        fs::copy(&source_path, &target_path)?;
    }

    Ok(())
}
