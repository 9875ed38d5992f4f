//! Supported agent integrations that skills can be installed into.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::error::SkillError;

/// Directory inside an agent folder that holds installed skills.
pub const SKILLS_DIR_NAME: &str = "skills";

/// One supported agent target.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
    EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Agent {
    Claude,
    Codex,
}

impl Agent {
    /// All supported agents, in display order.
    pub fn all() -> Vec<Agent> {
        Agent::iter().collect()
    }

    /// Parse a CLI flag identifier (`claude`, `codex`).
    pub fn from_flag(flag: &str) -> Result<Agent, SkillError> {
        Agent::from_str(flag.trim()).map_err(|_| SkillError::UnknownAgent(flag.to_string()))
    }

    /// CLI identifier.
    pub fn flag(self) -> &'static str {
        match self {
            Self::Claude => "claude",
            Self::Codex => "codex",
        }
    }

    /// Human-readable name.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Claude => "Claude Code",
            Self::Codex => "Codex",
        }
    }

    /// Configuration folder name relative to a home or project directory.
    pub fn folder_name(self) -> &'static str {
        match self {
            Self::Claude => ".claude",
            Self::Codex => ".codex",
        }
    }

    /// `{base}/{folder}/skills`
    pub fn skills_root(self, base: &Path) -> PathBuf {
        base.join(self.folder_name()).join(SKILLS_DIR_NAME)
    }
}

/// Agents whose folder exists directly under `project_dir`.
pub fn locally_present_agents(project_dir: &Path) -> Vec<Agent> {
    Agent::iter()
        .filter(|agent| project_dir.join(agent.folder_name()).is_dir())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn from_flag_accepts_known_flags() {
        assert_eq!(Agent::from_flag("claude").unwrap(), Agent::Claude);
        assert_eq!(Agent::from_flag(" codex ").unwrap(), Agent::Codex);
    }

    #[test]
    fn from_flag_rejects_unknown_flag() {
        let err = Agent::from_flag("cursor").unwrap_err();
        assert!(matches!(err, SkillError::UnknownAgent(flag) if flag == "cursor"));
    }

    #[test]
    fn flag_round_trips_through_display() {
        for agent in Agent::all() {
            assert_eq!(agent.to_string(), agent.flag());
            assert_eq!(Agent::from_flag(agent.flag()).unwrap(), agent);
        }
    }

    #[test]
    fn skills_root_joins_folder_and_skills_dir() {
        let root = Agent::Claude.skills_root(Path::new("/home/me"));
        assert_eq!(root, PathBuf::from("/home/me/.claude/skills"));
    }

    #[test]
    fn locally_present_agents_only_reports_existing_directories() {
        let temp = tempdir().expect("temp dir should be created");
        fs::create_dir_all(temp.path().join(".codex")).expect("codex dir should be created");
        fs::write(temp.path().join(".claude"), "not a directory").expect("file should be written");

        assert_eq!(locally_present_agents(temp.path()), vec![Agent::Codex]);
    }
}
