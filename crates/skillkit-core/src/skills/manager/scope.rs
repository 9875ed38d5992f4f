use std::path::{Path, PathBuf};

use crate::agents::Agent;
use crate::config::{agents_from_flags, home_dir};
use crate::error::{Result, SkillError};

/// Where and for which agents an invocation installs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeDecision {
    /// Ordered, de-duplicated target agents.
    pub agents: Vec<Agent>,
    pub is_global: bool,
}

impl ScopeDecision {
    pub fn new(agents: Vec<Agent>, is_global: bool) -> Self {
        let mut unique = Vec::with_capacity(agents.len());
        for agent in agents {
            if !unique.contains(&agent) {
                unique.push(agent);
            }
        }
        Self {
            agents: unique,
            is_global,
        }
    }
}

/// Select agents and scope for an install.
///
/// Explicit flags win over saved defaults; with neither the call fails.
/// `explicit_global` forces global scope. Otherwise scope is local when any
/// selected agent already has a folder in the project, else global.
pub fn resolve_targets(
    explicit_agent_flags: &[String],
    explicit_global: bool,
    saved_default_agents: &[String],
    locally_present_agents: &[Agent],
) -> Result<ScopeDecision> {
    let agents = if explicit_agent_flags.is_empty() {
        agents_from_flags(saved_default_agents)
    } else {
        explicit_agent_flags
            .iter()
            .map(|flag| Agent::from_flag(flag))
            .collect::<Result<Vec<_>>>()?
    };

    if agents.is_empty() {
        return Err(SkillError::NoTargetAgents);
    }

    let is_global = explicit_global
        || !agents
            .iter()
            .any(|agent| locally_present_agents.contains(agent));

    Ok(ScopeDecision::new(agents, is_global))
}

/// Base directories for global (home) and local (project) installs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRoots {
    pub home_dir: PathBuf,
    pub project_dir: PathBuf,
}

impl InstallRoots {
    pub fn new(home_dir: impl Into<PathBuf>, project_dir: impl Into<PathBuf>) -> Self {
        Self {
            home_dir: home_dir.into(),
            project_dir: project_dir.into(),
        }
    }

    /// Current user's home and the process working directory.
    pub fn detect() -> Result<Self> {
        let project_dir = std::env::current_dir()?;
        let home_dir = home_dir().ok_or_else(|| {
            SkillError::Configuration("Unable to determine the home directory".to_string())
        })?;
        Ok(Self::new(home_dir, project_dir))
    }

    pub fn base(&self, is_global: bool) -> &Path {
        if is_global {
            &self.home_dir
        } else {
            &self.project_dir
        }
    }

    /// `{home|project}/{agent folder}/skills/{name}`
    pub fn skill_dir(&self, agent: Agent, is_global: bool, skill_name: &str) -> PathBuf {
        agent.skills_root(self.base(is_global)).join(skill_name)
    }
}
