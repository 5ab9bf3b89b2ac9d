//! Command dispatch: maps parsed arguments onto application services.

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use generational_arena::Index;
use termtree::Tree;
use tracing::{debug, instrument};

use crate::application::services::{TemplateArtifact, TemplateFormat};
use crate::cli::args::{Cli, Commands, ConfigCommands, TemplateFormatArg};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::Forest;
use crate::infrastructure::di::ServiceContainer;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let mut settings = Settings::load()?;
    if let Some(store) = &cli.store {
        settings.store_path = store.clone();
    }
    debug!("settings: {:?}", settings);

    let container = ServiceContainer::new(settings)?;

    match &cli.command {
        Some(Commands::Validate { file }) => validate(&container, file),
        Some(Commands::Children { file, parent }) => children(&container, file, parent.as_deref()),
        Some(Commands::Tree { file }) => tree(&container, file),
        Some(Commands::Import {
            file,
            company,
            force,
        }) => import(&container, file, company, *force),
        Some(Commands::Conflicts { company }) => conflicts(&container, company),
        Some(Commands::Template { format, out }) => template(&container, *format, out.as_deref()),
        Some(Commands::Config { command }) => config_command(&container, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            generate(*shell, &mut cmd, "ccimport", &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, try --help".to_string(),
        )),
    }
}

#[instrument(skip(container))]
fn validate(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let report = container.importer.validate_artifact(file)?;
    output::success(&format!(
        "{} is importable: {} cost centers, {} roots, depth {}",
        file.display(),
        report.nodes,
        report.roots,
        report.depth
    ));
    Ok(())
}

#[instrument(skip(container))]
fn children(container: &ServiceContainer, file: &Path, parent: Option<&str>) -> CliResult<()> {
    let entries = container.importer.children(file, parent)?;
    match parent {
        Some(p) => output::header(&format!("Children of {p}")),
        None => output::header(&"Roots"),
    }
    for entry in entries {
        let marker = if entry.is_group { " [group]" } else { "" };
        output::detail(&format!("{}  {}{}", entry.id, entry.name, marker));
    }
    Ok(())
}

#[instrument(skip(container))]
fn tree(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let forest = container.importer.load_forest(file)?;
    for &root in forest.roots() {
        output::info(&render_tree(&forest, root));
    }
    Ok(())
}

fn render_tree(forest: &Forest, idx: Index) -> Tree<String> {
    let label = forest
        .get_node(idx)
        .map(|n| format!("{} ({})", n.data.name, n.data.id))
        .unwrap_or_default();
    let mut tree = Tree::new(label);
    if let Some(node) = forest.get_node(idx) {
        for &child in &node.children {
            tree.push(render_tree(forest, child));
        }
    }
    tree
}

#[instrument(skip(container))]
fn import(container: &ServiceContainer, file: &Path, company: &str, force: bool) -> CliResult<()> {
    let outcome = container.importer.import(file, company, force)?;

    if let Some(deleted) = outcome.deleted_ledger_entries {
        output::warning(&format!(
            "deleted {deleted} ledger entries with cost centers"
        ));
    }
    output::success(&format!(
        "imported {} cost centers for '{}'",
        outcome.created, company
    ));
    if let Some(root) = outcome.default_node {
        output::action("default cost center", &root);
    }
    Ok(())
}

#[instrument(skip(container))]
fn conflicts(container: &ServiceContainer, company: &str) -> CliResult<()> {
    let report = container.importer.check_conflicts(company)?;
    if report.has_conflicts {
        output::warning(&format!(
            "{} ledger entries with cost centers exist for '{}', import requires --force",
            report.count, company
        ));
    } else {
        output::success(&format!("no conflicting ledger entries for '{company}'"));
    }
    Ok(())
}

#[instrument(skip(container))]
fn template(
    container: &ServiceContainer,
    format: TemplateFormatArg,
    out: Option<&Path>,
) -> CliResult<()> {
    let format = match format {
        TemplateFormatArg::Csv => TemplateFormat::Csv,
        TemplateFormatArg::Xlsx => TemplateFormat::Xlsx,
    };
    let TemplateArtifact { filename, bytes } = container.template.render(format)?;

    let target: PathBuf = out
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&filename));
    std::fs::write(&target, bytes)
        .map_err(|e| crate::infrastructure::InfraError::io("write template", e))?;

    output::action("template written", &target.display());
    Ok(())
}

fn config_command(container: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let rendered = toml::to_string_pretty(container.settings.as_ref())
                .map_err(|e| CliError::Usage(format!("render config: {e}")))?;
            output::info(&rendered);
            Ok(())
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::info(&path.display()),
                None => output::warning(&"no config directory available"),
            }
            output::action("store", &container.settings.store_path.display());
            Ok(())
        }
        ConfigCommands::Init => {
            let path = global_config_path()
                .ok_or_else(|| CliError::Usage("no config directory available".to_string()))?;
            if path.exists() {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| crate::infrastructure::InfraError::io("create config dir", e))?;
            }
            std::fs::write(&path, Settings::template())
                .map_err(|e| crate::infrastructure::InfraError::io("write config", e))?;
            output::action("config written", &path.display());
            Ok(())
        }
    }
}
