//! Command handlers. Batch commands keep going after a failed item and report
//! how many items failed.

use std::error::Error;
use std::io::Write;

use skillkit::agents::Agent;
use skillkit::config::{agents_from_flags, ConfigStore};
use skillkit::skills::{has_divergent_copies, Installation, SkillManager};

use crate::cli::prompt::AgentPrompt;
use crate::cli::{AddArgs, RemoveArgs};
use crate::errors::format_error_help;

pub type CliResult<T> = Result<T, Box<dyn Error>>;

/// Outcome of a command over one or more items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    fn failure() -> Self {
        Self {
            succeeded: 0,
            failed: 1,
        }
    }
}

/// Handle `skillkit add <source>...`.
pub async fn handle_add(
    manager: &SkillManager,
    store: &dyn ConfigStore,
    prompt: &mut dyn AgentPrompt,
    args: &AddArgs,
    out: &mut dyn Write,
) -> CliResult<BatchReport> {
    let mut saved = store.load_default_agents()?;
    if args.agents.is_empty() && agents_from_flags(&saved).is_empty() && store.is_first_run() {
        let chosen = prompt.select_agents(&[])?;
        saved = chosen.iter().map(|agent| agent.flag().to_string()).collect();
        if !saved.is_empty() {
            store.save_default_agents(&saved)?;
            writeln!(out, "Saved default agents: {}", agent_names(&chosen))?;
        }
    }

    let scope = manager.resolve_scope(&args.agents, args.global, &saved)?;
    let scope_label = scope_label(scope.is_global);

    let mut report = BatchReport::default();
    for source in &args.sources {
        match manager.install_targets(source, &scope).await {
            Ok(result) => {
                report.succeeded += 1;
                writeln!(
                    out,
                    "Installed {} for {} ({scope_label})",
                    result.skill_names.join(", "),
                    agent_names(&scope.agents)
                )?;
            }
            Err(error) => {
                report.failed += 1;
                eprintln!("Failed to install {source}: {}", format_error_help(&error));
            }
        }
    }
    Ok(report)
}

/// Handle `skillkit remove <name>...`.
pub fn handle_remove(
    manager: &SkillManager,
    store: &dyn ConfigStore,
    args: &RemoveArgs,
    out: &mut dyn Write,
) -> CliResult<BatchReport> {
    let saved = store.load_default_agents()?;
    let scope = manager.resolve_scope(&args.agents, args.global, &saved)?;
    let scope_label = scope_label(scope.is_global);

    let mut report = BatchReport::default();
    for name in &args.names {
        let mut removed_from = Vec::new();
        let mut failed = false;
        for agent in &scope.agents {
            match manager.remove(name, *agent, scope.is_global) {
                Ok(true) => removed_from.push(*agent),
                Ok(false) => {}
                Err(error) => {
                    failed = true;
                    eprintln!("Failed to remove {name}: {}", format_error_help(&error));
                    break;
                }
            }
        }

        if failed {
            report.failed += 1;
        } else if removed_from.is_empty() {
            report.failed += 1;
            eprintln!(
                "{name} is not installed for {} ({scope_label})",
                agent_names(&scope.agents)
            );
        } else {
            report.succeeded += 1;
            writeln!(
                out,
                "Removed {name} from {} ({scope_label})",
                agent_names(&removed_from)
            )?;
        }
    }
    Ok(report)
}

/// Handle `skillkit list`.
pub fn handle_list(manager: &SkillManager, out: &mut dyn Write) -> CliResult<()> {
    let installations = manager.list_installations();
    if installations.is_empty() {
        writeln!(out, "No skills installed.")?;
        return Ok(());
    }
    for installation in &installations {
        write_installation_line(out, installation)?;
    }
    Ok(())
}

/// Handle `skillkit show <name>`.
pub fn handle_show(
    manager: &SkillManager,
    name: &str,
    out: &mut dyn Write,
) -> CliResult<BatchReport> {
    let installations = manager.find_installations(name);
    let Some(first) = installations.first() else {
        eprintln!("{name} is not installed for any agent");
        return Ok(BatchReport::failure());
    };

    let metadata = &first.metadata;
    writeln!(out, "{}", metadata.name)?;
    writeln!(out, "  {}", metadata.description)?;
    for (label, value) in [
        ("license", &metadata.license),
        ("compatibility", &metadata.compatibility),
        ("allowed tools", &metadata.allowed_tools),
    ] {
        if let Some(value) = value {
            writeln!(out, "  {label}: {value}")?;
        }
    }
    for (key, value) in &metadata.metadata {
        writeln!(out, "  {key}: {value}")?;
    }

    writeln!(out)?;
    for installation in &installations {
        write_installation_line(out, installation)?;
    }
    if has_divergent_copies(&installations) {
        writeln!(
            out,
            "\nWarning: installed copies of {name} have different content. Reinstall to sync them."
        )?;
    }

    Ok(BatchReport {
        succeeded: 1,
        failed: 0,
    })
}

/// Handle `skillkit config`.
pub fn handle_config(
    store: &dyn ConfigStore,
    prompt: &mut dyn AgentPrompt,
    out: &mut dyn Write,
) -> CliResult<()> {
    let current = agents_from_flags(&store.load_default_agents()?);
    let chosen = prompt.select_agents(&current)?;
    if chosen.is_empty() {
        return Err("Select at least one agent".into());
    }

    let flags: Vec<String> = chosen.iter().map(|agent| agent.flag().to_string()).collect();
    store.save_default_agents(&flags)?;
    writeln!(out, "Default agents: {}", agent_names(&chosen))?;
    Ok(())
}

/// Handle `skillkit catalog`.
pub async fn handle_catalog(manager: &SkillManager, out: &mut dyn Write) -> CliResult<()> {
    let skills = manager.registry().list().await?;
    if skills.is_empty() {
        writeln!(out, "The registry has no skills.")?;
        return Ok(());
    }
    for skill in &skills {
        if skill.author.is_empty() {
            writeln!(out, "{:<24} {}", skill.name, skill.description)?;
        } else {
            writeln!(
                out,
                "{:<24} {} (by {})",
                skill.name, skill.description, skill.author
            )?;
        }
    }
    Ok(())
}

fn write_installation_line(out: &mut dyn Write, installation: &Installation) -> std::io::Result<()> {
    writeln!(
        out,
        "{:<24} {:<6} {:<6} {}  {}",
        installation.metadata.name,
        installation.agent.flag(),
        installation.scope_label(),
        installation.content_hash,
        installation.path.display()
    )
}

fn scope_label(is_global: bool) -> &'static str {
    if is_global {
        "global"
    } else {
        "local"
    }
}

fn agent_names(agents: &[Agent]) -> String {
    agents
        .iter()
        .map(|agent| agent.display_name())
        .collect::<Vec<_>>()
        .join(", ")
}
