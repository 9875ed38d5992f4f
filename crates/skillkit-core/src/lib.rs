//! Skillkit Core -- skill acquisition and installation engine
//!
//! Resolves a skill reference (registry shortcut, GitHub repository URL or
//! local path), fetches it into a staging directory, discovers every
//! `SKILL.md` inside, and copies each skill into the agent folders selected
//! for the invocation.
//!
//! The `skillkit` facade crate re-exports this crate; the `skillkit` binary
//! lives in `skillkit-cli`.

pub mod agents;
pub mod config;
pub mod error;
pub mod prelude;
pub mod registry;
pub mod skills;
