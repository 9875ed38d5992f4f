//! Settings from the environment and the per-user default-agent store.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::agents::Agent;
use crate::error::{Result, SkillError};

const CONFIG_FILE_NAME: &str = "config.json";
const DEFAULT_REGISTRY_URL: &str = "https://registry.skillkit.dev/api";
const DEFAULT_GIT_HOST: &str = "https://github.com";

/// Process-level settings (env > defaults).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillkitSettings {
    /// Registry API base URL.
    pub registry_url: String,
    /// Base URL repositories are cloned from (`{git_host}/{owner}/{repo}`).
    pub git_host: String,
    /// Directory holding `config.json`.
    pub config_dir: PathBuf,
}

impl Default for SkillkitSettings {
    fn default() -> Self {
        Self {
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            git_host: DEFAULT_GIT_HOST.to_string(),
            config_dir: default_config_dir(),
        }
    }
}

impl SkillkitSettings {
    /// Load from `SKILLKIT_REGISTRY_URL`, `SKILLKIT_GIT_HOST` and `SKILLKIT_HOME`.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let mut settings = Self::default();
        if let Ok(url) = std::env::var("SKILLKIT_REGISTRY_URL") {
            settings.registry_url = url;
        }
        if let Ok(host) = std::env::var("SKILLKIT_GIT_HOST") {
            settings.git_host = host;
        }
        if let Some(dir) = std::env::var_os("SKILLKIT_HOME") {
            settings.config_dir = PathBuf::from(dir);
        }
        settings
    }
}

/// Persisted default agents.
pub trait ConfigStore: Send + Sync {
    /// Saved agent flags; empty when nothing has been saved.
    fn load_default_agents(&self) -> Result<Vec<String>>;
    fn save_default_agents(&self, agents: &[String]) -> Result<()>;
    fn is_first_run(&self) -> bool;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    #[serde(default)]
    default_agents: Vec<String>,
    /// Keys written by other tools, kept as-is on save.
    #[serde(flatten)]
    other: serde_json::Map<String, serde_json::Value>,
}

/// Flat JSON config file under a per-user directory.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    dir: PathBuf,
}

impl FileConfigStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn new_default() -> Self {
        Self::new(default_config_dir())
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE_NAME)
    }

    fn load(&self) -> Result<ConfigFile> {
        let path = self.path();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(ConfigFile::default())
            }
            Err(err) => return Err(SkillError::Io(err)),
        };
        serde_json::from_str(&raw).map_err(|err| {
            SkillError::Configuration(format!("Config file {} is invalid: {err}", path.display()))
        })
    }
}

impl ConfigStore for FileConfigStore {
    fn load_default_agents(&self) -> Result<Vec<String>> {
        Ok(self.load()?.default_agents)
    }

    fn save_default_agents(&self, agents: &[String]) -> Result<()> {
        let mut file = match self.load() {
            Ok(file) => file,
            Err(SkillError::Configuration(reason)) => {
                tracing::warn!(
                    path = %self.path().display(),
                    %reason,
                    "replacing unreadable config file"
                );
                ConfigFile::default()
            }
            Err(error) => return Err(error),
        };
        file.default_agents = agents.to_vec();
        fs::create_dir_all(&self.dir)?;
        let serialized = serde_json::to_string_pretty(&file)?;
        fs::write(self.path(), format!("{serialized}\n"))?;
        Ok(())
    }

    fn is_first_run(&self) -> bool {
        !self.path().exists()
    }
}

/// Convert saved flags to agents, dropping unknown ones.
pub fn agents_from_flags(flags: &[String]) -> Vec<Agent> {
    let mut agents = Vec::with_capacity(flags.len());
    for flag in flags {
        match Agent::from_flag(flag) {
            Ok(agent) if !agents.contains(&agent) => agents.push(agent),
            Ok(_) => {}
            Err(_) => tracing::warn!(%flag, "ignoring unknown agent in saved defaults"),
        }
    }
    agents
}

/// Home directory of the current user.
pub fn home_dir() -> Option<PathBuf> {
    directories::UserDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

fn default_config_dir() -> PathBuf {
    home_dir()
        .map(|home| home.join(".skillkit"))
        .unwrap_or_else(|| PathBuf::from(".skillkit"))
}

/// Expand `~` / `~/...` and make relative paths absolute against `base_dir`.
pub fn resolve_path(raw: &str, base_dir: &Path, home_dir: Option<&Path>) -> Result<PathBuf> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SkillError::Configuration(
            "Paths must not be empty".to_string(),
        ));
    }

    if trimmed == "~" || trimmed.starts_with("~/") {
        let home = home_dir.ok_or_else(|| {
            SkillError::Configuration(format!(
                "Cannot resolve home-relative path '{trimmed}' because the home directory is unknown",
            ))
        })?;
        if trimmed == "~" {
            return Ok(home.to_path_buf());
        }
        return Ok(home.join(trimmed.trim_start_matches("~/")));
    }

    let path = PathBuf::from(trimmed);
    if path.is_absolute() {
        return Ok(path);
    }

    Ok(base_dir.join(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn missing_config_is_first_run_with_no_defaults() {
        let temp = tempdir().expect("temp dir should be created");
        let store = FileConfigStore::new(temp.path().join("cfg"));

        assert!(store.is_first_run());
        assert!(store.load_default_agents().unwrap().is_empty());
    }

    #[test]
    fn saved_defaults_round_trip_and_clear_first_run() {
        let temp = tempdir().expect("temp dir should be created");
        let store = FileConfigStore::new(temp.path().join("cfg"));

        store
            .save_default_agents(&["claude".to_string(), "codex".to_string()])
            .expect("save should succeed");

        assert!(!store.is_first_run());
        assert_eq!(
            store.load_default_agents().unwrap(),
            vec!["claude".to_string(), "codex".to_string()]
        );
        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"defaultAgents\""));
    }

    #[test]
    fn malformed_config_is_a_configuration_error() {
        let temp = tempdir().expect("temp dir should be created");
        let store = FileConfigStore::new(temp.path());
        fs::write(store.path(), "{ not json").unwrap();

        assert!(matches!(
            store.load_default_agents(),
            Err(SkillError::Configuration(_))
        ));
    }

    #[test]
    fn saving_keeps_unrelated_keys() {
        let temp = tempdir().expect("temp dir should be created");
        let store = FileConfigStore::new(temp.path());
        fs::write(
            store.path(),
            r#"{"defaultAgents":["codex"],"telemetry":{"enabled":false}}"#,
        )
        .unwrap();

        store
            .save_default_agents(&["claude".to_string()])
            .expect("save should succeed");

        let saved: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(saved["defaultAgents"], serde_json::json!(["claude"]));
        assert_eq!(saved["telemetry"], serde_json::json!({"enabled": false}));
    }

    #[test]
    fn saving_over_malformed_config_replaces_it() {
        let temp = tempdir().expect("temp dir should be created");
        let store = FileConfigStore::new(temp.path());
        fs::write(store.path(), "{ not json").unwrap();

        store
            .save_default_agents(&["codex".to_string()])
            .expect("save should succeed");

        assert_eq!(store.load_default_agents().unwrap(), vec!["codex".to_string()]);
    }

    #[test]
    fn agents_from_flags_drops_unknown_and_duplicates() {
        let flags = vec![
            "codex".to_string(),
            "cursor".to_string(),
            "codex".to_string(),
            "claude".to_string(),
        ];
        assert_eq!(agents_from_flags(&flags), vec![Agent::Codex, Agent::Claude]);
    }

    #[test]
    fn resolve_path_expands_home_and_relative_paths() {
        let home = Path::new("/home/me");
        let cwd = Path::new("/work");

        assert_eq!(
            resolve_path("~/skills/x", cwd, Some(home)).unwrap(),
            PathBuf::from("/home/me/skills/x")
        );
        assert_eq!(resolve_path("~", cwd, Some(home)).unwrap(), home);
        assert_eq!(
            resolve_path("./local", cwd, Some(home)).unwrap(),
            PathBuf::from("/work/./local")
        );
        assert_eq!(
            resolve_path("/abs/path", cwd, Some(home)).unwrap(),
            PathBuf::from("/abs/path")
        );
        assert!(resolve_path("~/x", cwd, None).is_err());
    }
}
