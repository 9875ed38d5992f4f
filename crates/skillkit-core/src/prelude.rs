//! Convenience re-exports for common use.

pub use crate::agents::{locally_present_agents, Agent};
pub use crate::config::{ConfigStore, FileConfigStore, SkillkitSettings};
pub use crate::error::{ErrorCategory, Result, SkillError};
pub use crate::registry::{RegistryClient, RegistrySkill, SkillRegistry, StaticRegistry};
pub use crate::skills::{
    has_divergent_copies, resolve_targets, InstallRoots, InstallSkillsResult, Installation,
    ScopeDecision, SkillManager, SkillMetadata, SkillSource, SourceKind,
};
