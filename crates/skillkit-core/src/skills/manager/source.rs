use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::resolve_path;
use crate::error::{Result, SkillError};
use crate::registry::SkillRegistry;

/// Git hosting domain recognised in repository references.
pub(crate) const GIT_HOST_DOMAIN: &str = "github.com";

const REF_SEGMENTS: &[&str] = &["tree", "blob", "raw"];
const LOCAL_PREFIXES: &[&str] = &["./", "../", "~/", "/", ".\\", "..\\"];

/// How a skill reference was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Registry shortcut name.
    Shortcut,
    /// Repository on the git host.
    Remote,
    /// Directory on the local filesystem.
    Local,
}

/// Resolved origin of a skill reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillSource {
    pub kind: SourceKind,
    /// `owner/repo[/subpath][#branch]`, an archive URL, or an absolute path.
    pub location: String,
    /// Raw user input, kept for error messages and download tracking.
    pub original_input: String,
}

pub(crate) async fn resolve_source(
    input: &str,
    registry: &dyn SkillRegistry,
    cwd: &Path,
    home: Option<&Path>,
) -> Result<SkillSource> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(SkillError::UnresolvableSource {
            input: input.to_string(),
        });
    }

    match registry.get_by_name(trimmed).await {
        Ok(Some(entry)) => {
            let location = entry.zip_path.unwrap_or(entry.degit_path);
            tracing::debug!(%trimmed, %location, "resolved registry shortcut");
            return Ok(SkillSource {
                kind: SourceKind::Shortcut,
                location,
                original_input: input.to_string(),
            });
        }
        Ok(None) => {}
        Err(error) => {
            tracing::warn!(%error, "skill registry unavailable; skipping shortcut lookup");
        }
    }

    if trimmed.contains(GIT_HOST_DOMAIN) {
        let location = normalize_repository_url(trimmed).ok_or_else(|| {
            SkillError::UnresolvableSource {
                input: input.to_string(),
            }
        })?;
        return Ok(SkillSource {
            kind: SourceKind::Remote,
            location,
            original_input: input.to_string(),
        });
    }

    let candidate = resolve_path(trimmed, cwd, home)?;
    if has_local_prefix(trimmed) || candidate.exists() {
        let canonical = fs::canonicalize(&candidate).unwrap_or(candidate);
        return Ok(SkillSource {
            kind: SourceKind::Local,
            location: canonical.to_string_lossy().into_owned(),
            original_input: input.to_string(),
        });
    }

    Err(SkillError::UnresolvableSource {
        input: input.to_string(),
    })
}

fn has_local_prefix(input: &str) -> bool {
    input == "."
        || input == ".."
        || input == "~"
        || LOCAL_PREFIXES.iter().any(|prefix| input.starts_with(prefix))
        || PathBuf::from(input).is_absolute()
}

/// Normalize a repository URL to `owner/repo[/subpath][#branch]`.
///
/// The scheme and host are dropped. After a `tree`, `blob` or `raw` segment
/// the next segment is the branch and the rest the subpath; `blob` and `raw`
/// point at a file, so its name is dropped to fetch the parent directory.
pub fn normalize_repository_url(input: &str) -> Option<String> {
    let mut rest = input.trim();
    if let Some((_, after_scheme)) = rest.split_once("://") {
        rest = after_scheme;
    }
    rest = rest.split(['?', '#']).next().unwrap_or(rest);

    let owned;
    if let Some(ssh) = rest.strip_prefix("git@") {
        owned = ssh.replacen(':', "/", 1);
        rest = &owned;
    }

    let (_host, path) = rest.split_once('/')?;
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() < 2 {
        return None;
    }

    let owner = segments[0];
    let repo = segments[1].trim_end_matches(".git");
    if repo.is_empty() {
        return None;
    }

    let mut branch = None;
    let mut subpath: Vec<&str> = segments[2..].to_vec();
    if let Some(kind) = segments.get(2).filter(|s| REF_SEGMENTS.contains(*s)) {
        branch = segments.get(3).copied();
        subpath = segments.get(4..).map(<[&str]>::to_vec).unwrap_or_default();
        if *kind != "tree" {
            subpath.pop();
        }
    }

    let mut location = format!("{owner}/{repo}");
    if !subpath.is_empty() {
        location.push('/');
        location.push_str(&subpath.join("/"));
    }
    if let Some(branch) = branch {
        location.push('#');
        location.push_str(branch);
    }
    Some(location)
}
