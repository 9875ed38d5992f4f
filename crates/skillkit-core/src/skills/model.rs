//! Data types describing skills and their on-disk installations.

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::agents::Agent;

/// Parsed contents of a `SKILL.md` manifest header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillMetadata {
    /// Canonical skill name; also the installed directory name.
    pub name: String,
    /// Short description of what the skill does.
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compatibility: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_tools: Option<String>,
    /// Free-form entries from the nested `metadata:` block.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

/// One concrete on-disk presence of a named skill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installation {
    pub agent: Agent,
    /// Absolute path of the installed skill directory.
    pub path: PathBuf,
    /// `true` for the home-directory profile, `false` for the project directory.
    pub is_global: bool,
    pub metadata: SkillMetadata,
    /// Short content fingerprint, see [`crate::skills::hash_directory`].
    pub content_hash: String,
}

impl Installation {
    pub fn scope_label(&self) -> &'static str {
        if self.is_global {
            "global"
        } else {
            "local"
        }
    }
}

/// Whether same-named installations have diverging content.
pub fn has_divergent_copies(installations: &[Installation]) -> bool {
    let unique: HashSet<&str> = installations
        .iter()
        .map(|installation| installation.content_hash.as_str())
        .collect();
    unique.len() > 1
}
