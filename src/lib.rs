//! Skillkit -- install agent skills from anywhere
//!
//! Resolves a skill reference (registry shortcut, GitHub URL or local path),
//! fetches it, and copies every skill it contains into the folders of the
//! selected agents, locally in the project or globally in the home directory.
//!
//! # Quick Start
//!
//! ```no_run
//! use skillkit::prelude::*;
//!
//! # async fn example() -> skillkit::error::Result<()> {
//! let manager = skillkit::default_manager()?;
//! let result = manager.install("./my-skill", Agent::Claude, false).await?;
//! println!("installed {}", result.skill_names.join(", "));
//! # Ok(())
//! # }
//! ```

pub use skillkit_core::*;

use skillkit_core::config::{FileConfigStore, SkillkitSettings};
use skillkit_core::skills::SkillManager;

/// Skill manager wired from the environment: HTTP registry client, git host
/// and the current user's home and working directories.
pub fn default_manager() -> error::Result<SkillManager> {
    SkillManager::from_settings(&SkillkitSettings::from_env())
}

/// Config store at the directory named by the environment settings.
pub fn default_config_store() -> FileConfigStore {
    FileConfigStore::new(SkillkitSettings::from_env().config_dir)
}
