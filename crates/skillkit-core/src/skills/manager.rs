use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::agents::{locally_present_agents, Agent};
use crate::config::SkillkitSettings;
use crate::error::{Result, SkillError};
use crate::registry::{RegistryClient, SkillRegistry};
use crate::skills::discovery::{find_skill_directories, SKILL_FILE_NAME};
use crate::skills::frontmatter::parse_skill_file;
use crate::skills::hash::hash_directory;
use crate::skills::model::{Installation, SkillMetadata};

mod fetch;
mod filesystem;
mod scope;
mod source;

use fetch::materialize_source;
use filesystem::{ensure_replaceable, remove_path, replace_directory};

pub use scope::{resolve_targets, InstallRoots, ScopeDecision};
pub use source::{normalize_repository_url, SkillSource, SourceKind};

const MAX_NAME_LEN: usize = 64;
const MAX_DESCRIPTION_LEN: usize = 1024;

static SKILL_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9](?:[a-z0-9-]*[a-z0-9])?$").expect("skill name regex must compile")
});

/// Result for a skill install operation.
#[derive(Debug, Clone)]
pub struct InstallSkillsResult {
    /// Canonical names of the installed skills, in discovery order.
    pub skill_names: Vec<String>,
    /// Every destination written, one per skill and target agent.
    pub installed_paths: Vec<PathBuf>,
    pub source: SkillSource,
}

/// Installs, removes and inspects skills in agent folders.
pub struct SkillManager {
    registry: Arc<dyn SkillRegistry>,
    roots: InstallRoots,
    git_host: String,
    http: reqwest::Client,
    staging_dir: PathBuf,
}

impl fmt::Debug for SkillManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkillManager")
            .field("roots", &self.roots)
            .field("git_host", &self.git_host)
            .field("staging_dir", &self.staging_dir)
            .finish_non_exhaustive()
    }
}

impl SkillManager {
    pub fn new(registry: Arc<dyn SkillRegistry>, roots: InstallRoots) -> Self {
        Self {
            registry,
            roots,
            git_host: SkillkitSettings::default().git_host,
            http: reqwest::Client::new(),
            staging_dir: std::env::temp_dir(),
        }
    }

    /// Registry client, git host and roots for the current user and directory.
    pub fn from_settings(settings: &SkillkitSettings) -> Result<Self> {
        let registry = Arc::new(RegistryClient::new(settings.registry_url.clone()));
        Ok(Self::new(registry, InstallRoots::detect()?).with_git_host(settings.git_host.clone()))
    }

    pub fn with_git_host(mut self, git_host: impl Into<String>) -> Self {
        self.git_host = git_host.into();
        self
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Parent directory for fetched repositories and archives.
    pub fn with_staging_dir(mut self, staging_dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = staging_dir.into();
        self
    }

    pub fn roots(&self) -> &InstallRoots {
        &self.roots
    }

    pub fn registry(&self) -> &dyn SkillRegistry {
        self.registry.as_ref()
    }

    /// Classify a raw reference as a registry shortcut, repository or local path.
    pub async fn resolve_source(&self, input: &str) -> Result<SkillSource> {
        source::resolve_source(
            input,
            self.registry.as_ref(),
            &self.roots.project_dir,
            Some(&self.roots.home_dir),
        )
        .await
    }

    /// Agents and scope for an install, detecting local agent folders in the
    /// project directory.
    pub fn resolve_scope(
        &self,
        explicit_agent_flags: &[String],
        explicit_global: bool,
        saved_default_agents: &[String],
    ) -> Result<ScopeDecision> {
        resolve_targets(
            explicit_agent_flags,
            explicit_global,
            saved_default_agents,
            &locally_present_agents(&self.roots.project_dir),
        )
    }

    pub fn skill_path(&self, skill_name: &str, agent: Agent, is_global: bool) -> PathBuf {
        self.roots.skill_dir(agent, is_global, skill_name)
    }

    pub async fn install(
        &self,
        input: &str,
        agent: Agent,
        is_global: bool,
    ) -> Result<InstallSkillsResult> {
        self.install_targets(input, &ScopeDecision::new(vec![agent], is_global))
            .await
    }

    /// Fetch `input` once and copy every skill it contains into each target.
    pub async fn install_targets(
        &self,
        input: &str,
        targets: &ScopeDecision,
    ) -> Result<InstallSkillsResult> {
        if targets.agents.is_empty() {
            return Err(SkillError::NoTargetAgents);
        }

        let source = self.resolve_source(input).await?;
        let materialized =
            materialize_source(&source, &self.http, &self.git_host, &self.staging_dir).await?;

        let directories = find_skill_directories(materialized.root());
        if directories.is_empty() {
            return Err(SkillError::NoSkillsFound {
                input: source.original_input.clone(),
            });
        }

        let mut skills = Vec::with_capacity(directories.len());
        let mut seen_names = HashSet::new();
        for directory in directories {
            let metadata = parse_skill_file(&directory.join(SKILL_FILE_NAME)).ok_or_else(|| {
                SkillError::invalid_skill(
                    &directory,
                    "SKILL.md is missing or lacks a name and description",
                )
            })?;
            validate_metadata(&directory, &metadata)?;
            if !seen_names.insert(metadata.name.clone()) {
                return Err(SkillError::invalid_skill(
                    &directory,
                    format!("duplicate skill name '{}' in this source", metadata.name),
                ));
            }
            for agent in &targets.agents {
                ensure_replaceable(
                    &directory,
                    &self.skill_path(&metadata.name, *agent, targets.is_global),
                )?;
            }
            skills.push((directory, metadata));
        }

        let mut skill_names = Vec::with_capacity(skills.len());
        let mut installed_paths = Vec::with_capacity(skills.len() * targets.agents.len());
        for (directory, metadata) in &skills {
            for agent in &targets.agents {
                let destination = self.skill_path(&metadata.name, *agent, targets.is_global);
                replace_directory(directory, &destination)?;
                tracing::info!(
                    skill = %metadata.name,
                    agent = %agent,
                    path = %destination.display(),
                    "installed skill"
                );
                installed_paths.push(destination);
            }
            skill_names.push(metadata.name.clone());
        }

        if source.kind == SourceKind::Shortcut {
            let name = source.original_input.trim();
            if let Err(error) = self.registry.track_download(name).await {
                tracing::warn!(%name, %error, "failed to record skill download");
            }
        }

        Ok(InstallSkillsResult {
            skill_names,
            installed_paths,
            source,
        })
    }

    /// Delete an installed skill. Returns whether anything was removed.
    pub fn remove(&self, skill_name: &str, agent: Agent, is_global: bool) -> Result<bool> {
        if !is_plain_name(skill_name) {
            return Err(SkillError::invalid_skill(
                skill_name,
                "skill names cannot be empty or contain path separators",
            ));
        }

        let path = self.skill_path(skill_name, agent, is_global);
        let removed = remove_path(&path)?;
        if removed {
            tracing::info!(skill = %skill_name, agent = %agent, path = %path.display(), "removed skill");
        }
        Ok(removed)
    }

    /// Local then global copies of `skill_name` for every agent.
    pub fn find_installations(&self, skill_name: &str) -> Vec<Installation> {
        if !is_plain_name(skill_name) {
            return Vec::new();
        }

        let mut seen = HashSet::new();
        let mut installations = Vec::new();
        for is_global in [false, true] {
            for agent in Agent::all() {
                let path = self.skill_path(skill_name, agent, is_global);
                if let Some(installation) = inspect_installation(agent, is_global, &path) {
                    if seen.insert(canonical_key(&path)) {
                        installations.push(installation);
                    }
                }
            }
        }
        installations
    }

    /// Every installed skill across both scopes and all agents, sorted by
    /// name, then scope, then agent.
    pub fn list_installations(&self) -> Vec<Installation> {
        let mut seen = HashSet::new();
        let mut installations = Vec::new();
        for is_global in [false, true] {
            for agent in Agent::all() {
                let root = agent.skills_root(self.roots.base(is_global));
                let Ok(entries) = fs::read_dir(&root) else {
                    continue;
                };
                for entry in entries.flatten() {
                    let path = entry.path();
                    if !path.is_dir() || !seen.insert(canonical_key(&path)) {
                        continue;
                    }
                    if let Some(installation) = inspect_installation(agent, is_global, &path) {
                        installations.push(installation);
                    }
                }
            }
        }

        installations.sort_by(|left, right| {
            left.metadata
                .name
                .cmp(&right.metadata.name)
                .then_with(|| left.is_global.cmp(&right.is_global))
                .then_with(|| left.agent.cmp(&right.agent))
        });
        installations
    }
}

fn inspect_installation(agent: Agent, is_global: bool, path: &Path) -> Option<Installation> {
    if !path.is_dir() {
        return None;
    }
    let Some(metadata) = parse_skill_file(&path.join(SKILL_FILE_NAME)) else {
        tracing::debug!(path = %path.display(), "ignoring directory without a valid SKILL.md");
        return None;
    };
    let content_hash = match hash_directory(path) {
        Ok(hash) => hash,
        Err(error) => {
            tracing::debug!(path = %path.display(), %error, "unable to hash installed skill");
            return None;
        }
    };
    Some(Installation {
        agent,
        path: path.to_path_buf(),
        is_global,
        metadata,
        content_hash,
    })
}

fn canonical_key(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

fn validate_metadata(directory: &Path, metadata: &SkillMetadata) -> Result<()> {
    let name = metadata.name.as_str();
    if name.chars().count() > MAX_NAME_LEN {
        return Err(SkillError::invalid_skill(
            directory,
            format!("skill name '{name}' is longer than {MAX_NAME_LEN} characters"),
        ));
    }
    if !SKILL_NAME_PATTERN.is_match(name) {
        return Err(SkillError::invalid_skill(
            directory,
            format!(
                "skill name '{name}' must use lowercase letters, digits and hyphens, \
                 and cannot start or end with a hyphen"
            ),
        ));
    }
    if metadata.description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(SkillError::invalid_skill(
            directory,
            format!("description is longer than {MAX_DESCRIPTION_LEN} characters"),
        ));
    }
    Ok(())
}
