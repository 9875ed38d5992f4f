//! Integration tests for the `skillkit` facade crate.
//!
//! Verifies that the core API is reachable through the `skillkit` namespace
//! and that a local install works end to end through it.

use std::fs;
use std::sync::Arc;

use tempfile::TempDir;

use skillkit::prelude::*;

#[test]
fn prelude_exposes_registry_trait() {
    fn _assert_trait_accessible<T: skillkit::registry::SkillRegistry>() {}
    _assert_trait_accessible::<StaticRegistry>();
}

#[test]
fn default_config_store_is_constructible() {
    let store = skillkit::default_config_store();
    assert!(store.path().ends_with("config.json"));
}

#[tokio::test]
async fn local_install_through_facade() {
    let dir = TempDir::new().unwrap();
    let home = dir.path().join("home");
    let project = dir.path().join("project");
    let source = project.join("my-skill");
    fs::create_dir_all(&home).unwrap();
    fs::create_dir_all(&source).unwrap();
    fs::write(
        source.join("SKILL.md"),
        "---\nname: widget\ndescription: Builds widgets\n---\n",
    )
    .unwrap();

    let manager = SkillManager::new(
        Arc::new(StaticRegistry::default()),
        InstallRoots::new(&home, &project),
    );
    let result = manager
        .install("./my-skill", Agent::Claude, false)
        .await
        .unwrap();

    assert_eq!(result.skill_names, vec!["widget".to_string()]);
    assert!(project.join(".claude/skills/widget/SKILL.md").exists());
}
