//! CLI-specific error formatting for user-facing messages.

use skillkit::agents::Agent;
use skillkit::error::{ErrorCategory, SkillError};

/// Map a [`SkillError`] to a user-facing help string with actionable guidance.
pub fn format_error_help(err: &SkillError) -> String {
    match err {
        SkillError::UnknownAgent(flag) => {
            let supported = Agent::all()
                .iter()
                .map(|agent| agent.flag())
                .collect::<Vec<_>>()
                .join(", ");
            format!("Unknown agent '{flag}'. Supported agents: {supported}")
        }
        SkillError::NoSkillsFound { .. } => {
            format!("{err}. A skill is a directory with a SKILL.md that declares a name and description")
        }
        SkillError::InvalidSkill { .. } => {
            format!("{err}. Fix the SKILL.md frontmatter and try again")
        }
        SkillError::Configuration(msg) => {
            format!("Configuration error: {msg}. Check SKILLKIT_* variables in your environment or .env, or run: skillkit config")
        }
        other => match other.category() {
            ErrorCategory::Fetch => {
                format!("{other}. Check the source address and your network connection")
            }
            _ => format!("{other}"),
        },
    }
}
