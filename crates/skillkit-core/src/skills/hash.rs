use std::fs;
use std::path::Path;

use ignore::WalkBuilder;
use sha2::{Digest, Sha256};

use crate::error::Result;

/// Hex characters kept from the digest.
pub const CONTENT_HASH_LEN: usize = 12;

/// Fingerprint of a directory tree.
///
/// Files are sorted by `/`-separated relative path and each path and its bytes
/// are fed to SHA-256 in that order, each preceded by its length as a
/// little-endian `u64`. An empty directory hashes like the empty string.
pub fn hash_directory(dir: &Path) -> Result<String> {
    let mut walker = WalkBuilder::new(dir);
    walker.standard_filters(false).follow_links(false);

    let mut files = Vec::new();
    for entry in walker.build() {
        let entry = entry.map_err(|error| std::io::Error::other(error.to_string()))?;
        let is_file = entry
            .file_type()
            .map(|file_type| file_type.is_file())
            .unwrap_or(false);
        if !is_file {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(dir)
            .unwrap_or(entry.path())
            .components()
            .map(|component| component.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        files.push((relative, entry.into_path()));
    }

    files.sort_by(|left, right| left.0.cmp(&right.0));

    let mut hasher = Sha256::new();
    for (relative, path) in files {
        let contents = fs::read(&path)?;
        hasher.update((relative.len() as u64).to_le_bytes());
        hasher.update(relative.as_bytes());
        hasher.update((contents.len() as u64).to_le_bytes());
        hasher.update(&contents);
    }

    let digest = format!("{:x}", hasher.finalize());
    Ok(digest[..CONTENT_HASH_LEN].to_string())
}
