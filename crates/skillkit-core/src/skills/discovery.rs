use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use ignore::{DirEntry, WalkBuilder};

use crate::skills::frontmatter::parse_skill_file;

/// Manifest file name marking a skill directory.
pub const SKILL_FILE_NAME: &str = "SKILL.md";

const VCS_DIR_PREFIX: &str = ".git";
const SKIPPED_DIR_NAMES: &[&str] = &["node_modules"];

/// Recursively locate directories under `root` holding a valid `SKILL.md`.
///
/// Directories whose name starts with `.git` are skipped, symlinked
/// directories are not followed, and the result is sorted by path.
pub fn find_skill_directories(root: &Path) -> Vec<PathBuf> {
    if !root.is_dir() {
        return Vec::new();
    }

    let mut walker = WalkBuilder::new(root);
    walker
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|left, right| left.cmp(right))
        .filter_entry(|entry| !is_skipped_directory(entry));

    let mut visited = HashSet::<PathBuf>::new();
    let mut found = Vec::new();

    for entry in walker.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                tracing::debug!(root = %root.display(), %error, "skipping unreadable entry");
                continue;
            }
        };

        let is_file = entry
            .file_type()
            .map(|file_type| file_type.is_file())
            .unwrap_or(false);
        if !is_file || entry.file_name() != OsStr::new(SKILL_FILE_NAME) {
            continue;
        }

        let Some(skill_dir) = entry.path().parent() else {
            continue;
        };
        let real_dir = fs::canonicalize(skill_dir).unwrap_or_else(|_| skill_dir.to_path_buf());
        if !visited.insert(real_dir) {
            continue;
        }

        if parse_skill_file(entry.path()).is_some() {
            found.push(skill_dir.to_path_buf());
        } else {
            tracing::debug!(path = %entry.path().display(), "skipping non-conforming SKILL.md");
        }
    }

    found.sort();
    found
}

fn is_skipped_directory(entry: &DirEntry) -> bool {
    // The walk root itself is never filtered, even when it is a `.git*` dir.
    if entry.depth() == 0 {
        return false;
    }
    let is_dir = entry
        .file_type()
        .map(|file_type| file_type.is_dir())
        .unwrap_or(false);
    if !is_dir {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with(VCS_DIR_PREFIX) || SKIPPED_DIR_NAMES.contains(&name.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn write_manifest(dir: &Path, content: &str) {
        fs::create_dir_all(dir).expect("skill directory should be created");
        fs::write(dir.join(SKILL_FILE_NAME), content).expect("SKILL.md should be written");
    }

    #[test]
    fn finds_root_level_skill() {
        let temp = tempdir().expect("temp dir should be created");
        write_manifest(temp.path(), "---\nname: root\ndescription: at root\n---\n");

        assert_eq!(
            find_skill_directories(temp.path()),
            vec![temp.path().to_path_buf()]
        );
    }

    #[test]
    fn finds_sibling_skills_and_excludes_invalid_manifests() {
        let temp = tempdir().expect("temp dir should be created");
        let skills = temp.path().join("skills");
        write_manifest(&skills.join("alpha"), "---\nname: alpha\ndescription: A\n---\n");
        write_manifest(&skills.join("beta"), "---\nname: beta\ndescription: B\n---\n");
        write_manifest(&skills.join("broken"), "---\nname: broken\n---\n");
        write_manifest(&skills.join("plain"), "# no frontmatter\n");

        assert_eq!(
            find_skill_directories(temp.path()),
            vec![skills.join("alpha"), skills.join("beta")]
        );
    }

    #[test]
    fn skips_version_control_and_node_modules_directories() {
        let temp = tempdir().expect("temp dir should be created");
        let manifest = "---\nname: hidden\ndescription: should not be found\n---\n";
        write_manifest(&temp.path().join(".git/hooks"), manifest);
        write_manifest(&temp.path().join(".github/skill"), manifest);
        write_manifest(&temp.path().join("node_modules/pkg"), manifest);
        write_manifest(
            &temp.path().join(".hidden-but-allowed"),
            "---\nname: dotted\ndescription: dot dirs other than vcs are walked\n---\n",
        );

        assert_eq!(
            find_skill_directories(temp.path()),
            vec![temp.path().join(".hidden-but-allowed")]
        );
    }

    #[test]
    fn nested_skill_inside_skill_is_also_reported() {
        let temp = tempdir().expect("temp dir should be created");
        write_manifest(temp.path(), "---\nname: outer\ndescription: outer\n---\n");
        write_manifest(
            &temp.path().join("examples/inner"),
            "---\nname: inner\ndescription: inner\n---\n",
        );

        let found = find_skill_directories(temp.path());
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn missing_root_yields_empty_result() {
        let temp = tempdir().expect("temp dir should be created");
        assert!(find_skill_directories(&temp.path().join("absent")).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn does_not_follow_symlinked_directory_cycles() {
        let temp = tempdir().expect("temp dir should be created");
        let skill = temp.path().join("skill");
        write_manifest(&skill, "---\nname: looped\ndescription: loop guard\n---\n");
        std::os::unix::fs::symlink(temp.path(), skill.join("loop"))
            .expect("symlink should be created");

        assert_eq!(find_skill_directories(temp.path()), vec![skill]);
    }
}
