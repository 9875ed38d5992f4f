//! End-to-end install flows through the public `SkillManager` API with an
//! HTTP registry served by a mock server.

use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::Arc;

use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use skillkit_core::agents::Agent;
use skillkit_core::registry::RegistryClient;
use skillkit_core::skills::{has_divergent_copies, InstallRoots, SkillManager, SourceKind};

fn skill_archive() -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored);
    writer
        .start_file("tinker-main/SKILL.md", options)
        .expect("zip entry should start");
    writer
        .write_all(b"---\nname: tinker\ndescription: Tinker with things\n---\n# Tinker\n")
        .expect("zip entry should be written");
    writer
        .start_file("tinker-main/scripts/run.sh", options)
        .expect("zip entry should start");
    writer
        .write_all(b"echo tinker\n")
        .expect("zip entry should be written");
    writer
        .finish()
        .expect("zip archive should finish")
        .into_inner()
}

fn roots(base: &Path) -> InstallRoots {
    let home = base.join("home");
    let project = base.join("project");
    fs::create_dir_all(&home).expect("home dir should be created");
    fs::create_dir_all(&project).expect("project dir should be created");
    InstallRoots::new(home, project)
}

async fn mount_listing(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/skills"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "name": "tinker",
                "description": "Tinker with things",
                "author": "acme",
                "degitPath": "acme/skills/tinker",
                "zipPath": "files/tinker.zip"
            }
        ])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn registry_shortcut_installs_archive_and_tracks_download() {
    let server = MockServer::start().await;
    mount_listing(&server).await;
    Mock::given(method("GET"))
        .and(path("/files/tinker.zip"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(skill_archive()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/skills/tinker/downloads"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let temp = tempdir().expect("temp dir should be created");
    let roots = roots(temp.path());
    let manager = SkillManager::new(Arc::new(RegistryClient::new(server.uri())), roots.clone());

    let result = manager
        .install("tinker", Agent::Claude, true)
        .await
        .expect("shortcut install should succeed");

    assert_eq!(result.source.kind, SourceKind::Shortcut);
    assert_eq!(result.skill_names, vec!["tinker".to_string()]);
    let installed = roots.home_dir.join(".claude/skills/tinker");
    assert_eq!(
        fs::read_to_string(installed.join("scripts/run.sh")).expect("script should be copied"),
        "echo tinker\n"
    );
}

#[tokio::test]
async fn download_tracking_failure_does_not_fail_the_install() {
    let server = MockServer::start().await;
    mount_listing(&server).await;
    Mock::given(method("GET"))
        .and(path("/files/tinker.zip"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(skill_archive()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/skills/tinker/downloads"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let temp = tempdir().expect("temp dir should be created");
    let manager = SkillManager::new(
        Arc::new(RegistryClient::new(server.uri())),
        roots(temp.path()),
    );

    let result = manager.install("tinker", Agent::Codex, false).await;
    assert!(result.is_ok(), "{result:?}");
}

#[tokio::test]
async fn registry_outage_still_allows_local_installs() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/skills"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let temp = tempdir().expect("temp dir should be created");
    let roots = roots(temp.path());
    let skill_dir = roots.project_dir.join("tinker");
    fs::create_dir_all(&skill_dir).expect("skill dir should be created");
    fs::write(
        skill_dir.join("SKILL.md"),
        "---\nname: local-tinker\ndescription: Local copy\n---\n",
    )
    .expect("manifest should be written");

    let manager = SkillManager::new(Arc::new(RegistryClient::new(server.uri())), roots.clone());
    let result = manager
        .install("tinker", Agent::Claude, false)
        .await
        .expect("local install should succeed");

    assert_eq!(result.source.kind, SourceKind::Local);
    assert!(roots
        .project_dir
        .join(".claude/skills/local-tinker/SKILL.md")
        .exists());
}

#[tokio::test]
async fn divergent_copies_are_detectable_after_two_installs() {
    let server = MockServer::start().await;
    mount_listing(&server).await;

    let temp = tempdir().expect("temp dir should be created");
    let roots = roots(temp.path());
    let source = roots.project_dir.join("src/x");
    fs::create_dir_all(&source).expect("source dir should be created");
    fs::write(source.join("SKILL.md"), "---\nname: x\ndescription: v1\n---\n").unwrap();

    let manager = SkillManager::new(Arc::new(RegistryClient::new(server.uri())), roots);
    manager
        .install("./src/x", Agent::Claude, false)
        .await
        .expect("local install should succeed");
    fs::write(source.join("SKILL.md"), "---\nname: x\ndescription: v2\n---\n").unwrap();
    manager
        .install("./src/x", Agent::Claude, true)
        .await
        .expect("global install should succeed");

    let installations = manager.find_installations("x");
    assert_eq!(installations.len(), 2);
    assert!(has_divergent_copies(&installations));
    assert_eq!(installations[0].metadata.description, "v1");
    assert_eq!(installations[1].metadata.description, "v2");
}
