//! Skill discovery, manifest parsing, hashing and installation.

pub mod discovery;
pub mod frontmatter;
pub mod hash;
pub mod manager;
pub mod model;

pub use discovery::{find_skill_directories, SKILL_FILE_NAME};
pub use frontmatter::{parse_frontmatter, parse_skill_file};
pub use hash::{hash_directory, CONTENT_HASH_LEN};
pub use manager::{
    normalize_repository_url, resolve_targets, InstallRoots, InstallSkillsResult, ScopeDecision,
    SkillManager, SkillSource, SourceKind,
};
pub use model::{has_divergent_copies, Installation, SkillMetadata};
