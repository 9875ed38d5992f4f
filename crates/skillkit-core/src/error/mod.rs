//! Error types for skillkit.

use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for all skill acquisition and installation operations.
#[derive(Error, Debug)]
pub enum SkillError {
    #[error(
        "Could not resolve '{input}'. Expected a registry skill name, a GitHub repository URL \
         (e.g. github.com/owner/repo/tree/main/skills/name), or a local path (./, ../, ~/ or absolute)"
    )]
    UnresolvableSource { input: String },

    #[error("failed to download {input}: {message}")]
    Fetch { input: String, message: String },

    #[error("no skills found in {input}")]
    NoSkillsFound { input: String },

    #[error("Invalid skill at '{}': {reason}", path.display())]
    InvalidSkill { path: PathBuf, reason: String },

    #[error(
        "No target agents configured. Run `skillkit config` to choose default agents, \
         or pass --agent <flag> explicitly"
    )]
    NoTargetAgents,

    #[error("Unknown agent '{0}'")]
    UnknownAgent(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
}

/// Coarse classification used by callers to pick help text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The user-supplied reference or flag could not be interpreted.
    Input,
    /// Content could not be downloaded or staged.
    Fetch,
    /// Content was fetched but holds no usable skill.
    Content,
    /// Agent defaults or settings are missing or malformed.
    Configuration,
    /// Local filesystem or serialization failure.
    Io,
}

impl SkillError {
    pub(crate) fn fetch(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            input: input.into(),
            message: message.into(),
        }
    }

    pub(crate) fn invalid_skill(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidSkill {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnresolvableSource { .. } | Self::UnknownAgent(_) => ErrorCategory::Input,
            Self::Fetch { .. } | Self::Network(_) | Self::Archive(_) => ErrorCategory::Fetch,
            Self::NoSkillsFound { .. } | Self::InvalidSkill { .. } => ErrorCategory::Content,
            Self::NoTargetAgents | Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Io(_) | Self::Serialization(_) => ErrorCategory::Io,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, SkillError>;
