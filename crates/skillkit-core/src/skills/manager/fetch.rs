use std::ffi::OsString;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use tokio::process::Command;
use uuid::Uuid;

use crate::error::{Result, SkillError};
use crate::skills::manager::{SkillSource, SourceKind};

/// Repository pointer parsed from `owner/repo[/subpath][#branch]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RepositoryLocation {
    pub(crate) owner: String,
    pub(crate) repo: String,
    pub(crate) subpath: Option<String>,
    pub(crate) branch: Option<String>,
}

impl RepositoryLocation {
    pub(crate) fn parse(location: &str) -> Option<Self> {
        let (path, branch) = match location.split_once('#') {
            Some((path, branch)) if !branch.is_empty() => (path, Some(branch.to_string())),
            Some((path, _)) => (path, None),
            None => (location, None),
        };
        let mut segments = path.split('/').filter(|segment| !segment.is_empty());
        let owner = segments.next()?.to_string();
        let repo = segments.next()?.trim_end_matches(".git").to_string();
        if repo.is_empty() {
            return None;
        }
        let subpath = segments.collect::<Vec<_>>().join("/");
        Some(Self {
            owner,
            repo,
            subpath: (!subpath.is_empty()).then_some(subpath),
            branch,
        })
    }

    fn clone_url(&self, git_host: &str) -> String {
        format!(
            "{}/{}/{}",
            git_host.trim_end_matches('/'),
            self.owner,
            self.repo
        )
    }
}

enum FetchStrategy {
    Local(PathBuf),
    Repository(RepositoryLocation),
    Archive(String),
}

impl FetchStrategy {
    fn for_source(source: &SkillSource) -> Result<Self> {
        match source.kind {
            SourceKind::Local => Ok(Self::Local(PathBuf::from(&source.location))),
            SourceKind::Shortcut if is_http_url(&source.location) => {
                Ok(Self::Archive(source.location.clone()))
            }
            SourceKind::Shortcut | SourceKind::Remote => RepositoryLocation::parse(&source.location)
                .map(Self::Repository)
                .ok_or_else(|| {
                    SkillError::fetch(
                        &source.original_input,
                        format!("'{}' is not an owner/repo location", source.location),
                    )
                }),
        }
    }
}

fn is_http_url(location: &str) -> bool {
    location.starts_with("https://") || location.starts_with("http://")
}

/// Fetched content root. Staged content is deleted when this is dropped.
#[derive(Debug)]
pub(crate) struct MaterializedSource {
    root: PathBuf,
    _staging: Option<EphemeralDirectory>,
}

impl MaterializedSource {
    pub(crate) fn root(&self) -> &Path {
        &self.root
    }
}

pub(crate) async fn materialize_source(
    source: &SkillSource,
    http: &reqwest::Client,
    git_host: &str,
    staging_dir: &Path,
) -> Result<MaterializedSource> {
    match FetchStrategy::for_source(source)? {
        FetchStrategy::Local(path) => {
            if !path.is_dir() {
                return Err(SkillError::fetch(
                    &source.original_input,
                    format!("local path '{}' is not a directory", path.display()),
                ));
            }
            Ok(MaterializedSource {
                root: path,
                _staging: None,
            })
        }
        FetchStrategy::Repository(location) => {
            let staging = EphemeralDirectory::new(staging_dir, "skillkit-repo")?;
            let root = fetch_repository(&location, git_host, staging.path(), &source.original_input)
                .await?;
            Ok(MaterializedSource {
                root,
                _staging: Some(staging),
            })
        }
        FetchStrategy::Archive(url) => {
            let staging = EphemeralDirectory::new(staging_dir, "skillkit-archive")?;
            let root = fetch_archive(&url, http, staging.path(), &source.original_input).await?;
            Ok(MaterializedSource {
                root,
                _staging: Some(staging),
            })
        }
    }
}

async fn fetch_repository(
    location: &RepositoryLocation,
    git_host: &str,
    staging: &Path,
    input: &str,
) -> Result<PathBuf> {
    let checkout = staging.join("repo");
    let url = location.clone_url(git_host);

    let mut clone: Vec<OsString> = vec![
        "clone".into(),
        "--depth".into(),
        "1".into(),
        "--filter=blob:none".into(),
    ];
    if location.subpath.is_some() {
        clone.push("--no-checkout".into());
    }
    if let Some(branch) = &location.branch {
        clone.push("--branch".into());
        clone.push(branch.into());
    }
    clone.push(url.clone().into());
    clone.push(checkout.clone().into());

    tracing::debug!(%url, subpath = ?location.subpath, branch = ?location.branch, "cloning repository");
    run_git(&clone, None, input).await?;

    let Some(subpath) = &location.subpath else {
        return Ok(checkout);
    };

    run_git(&["sparse-checkout", "init", "--cone"], Some(&checkout), input).await?;
    run_git(&["sparse-checkout", "set", subpath.as_str()], Some(&checkout), input).await?;
    match &location.branch {
        Some(branch) => run_git(&["checkout", branch.as_str()], Some(&checkout), input).await?,
        None => run_git(&["checkout"], Some(&checkout), input).await?,
    }

    Ok(checkout.join(subpath))
}

async fn run_git<S: AsRef<std::ffi::OsStr>>(
    args: &[S],
    cwd: Option<&Path>,
    input: &str,
) -> Result<()> {
    let mut command = Command::new("git");
    command.args(args).env("GIT_TERMINAL_PROMPT", "0");
    if let Some(cwd) = cwd {
        command.current_dir(cwd);
    }

    let output = command
        .output()
        .await
        .map_err(|error| SkillError::fetch(input, format!("unable to run git: {error}")))?;
    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let message = stderr.trim();
    Err(SkillError::fetch(
        input,
        if message.is_empty() {
            format!("git exited with status {}", output.status)
        } else {
            message.to_string()
        },
    ))
}

async fn fetch_archive(
    url: &str,
    http: &reqwest::Client,
    staging: &Path,
    input: &str,
) -> Result<PathBuf> {
    tracing::debug!(%url, "downloading skill archive");
    let response = http
        .get(url)
        .send()
        .await
        .map_err(|error| SkillError::fetch(input, error.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(SkillError::fetch(
            input,
            status
                .canonical_reason()
                .map(ToString::to_string)
                .unwrap_or_else(|| status.to_string()),
        ));
    }
    let bytes = response
        .bytes()
        .await
        .map_err(|error| SkillError::fetch(input, error.to_string()))?;

    let extract_dir = staging.join("archive");
    let target = extract_dir.clone();
    tokio::task::spawn_blocking(move || -> Result<()> {
        fs::create_dir_all(&target)?;
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
        archive.extract(&target)?;
        Ok(())
    })
    .await
    .map_err(|error| std::io::Error::other(error.to_string()))??;

    unwrap_single_directory(&extract_dir)
}

/// Use the sole top-level directory of an extracted archive as its root.
fn unwrap_single_directory(dir: &Path) -> Result<PathBuf> {
    let entries = fs::read_dir(dir)?.collect::<std::io::Result<Vec<_>>>()?;
    if let [only] = entries.as_slice() {
        if only.file_type()?.is_dir() {
            return Ok(only.path());
        }
    }
    Ok(dir.to_path_buf())
}

/// Process-unique directory under `base`, removed on drop.
#[derive(Debug)]
pub(crate) struct EphemeralDirectory {
    path: PathBuf,
}

impl EphemeralDirectory {
    pub(crate) fn new(base: &Path, prefix: &str) -> Result<Self> {
        fs::create_dir_all(base)?;
        for _ in 0..8 {
            let candidate = base.join(format!("{prefix}-{}-{}", std::process::id(), Uuid::new_v4()));
            match fs::create_dir(&candidate) {
                Ok(_) => return Ok(Self { path: candidate }),
                Err(error) if error.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(error) => return Err(SkillError::Io(error)),
            }
        }

        Err(SkillError::Io(std::io::Error::other(
            "failed to create a staging directory for skill content",
        )))
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for EphemeralDirectory {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}
