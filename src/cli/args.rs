//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum, ValueHint};

/// Cost-center chart importer: flat CSV rows into a validated tree, destructive per-company replace
#[derive(Parser, Debug)]
#[command(name = "ccimport")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging (repeat for more verbosity)
    #[arg(short = 'd', long = "debug", action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Store file to work against (default: from config)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate an artifact without touching the store (dry run)
    Validate {
        /// Artifact file (CSV)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// List the children of one node in an artifact
    Children {
        /// Artifact file (CSV)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,

        /// Parent node id (omit for roots)
        #[arg(short, long)]
        parent: Option<String>,
    },

    /// Render an artifact's hierarchy as a tree
    Tree {
        /// Artifact file (CSV)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Replace a company's cost-center chart with an artifact's contents
    Import {
        /// Artifact file (CSV)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,

        /// Owning company
        #[arg(short, long)]
        company: String,

        /// Delete blocking ledger entries instead of aborting (irrevocable)
        #[arg(long)]
        force: bool,
    },

    /// Check whether ledger entries block an import for a company
    Conflicts {
        /// Owning company
        #[arg(short, long)]
        company: String,
    },

    /// Write an import template with sample rows
    Template {
        /// Output format
        #[arg(long, value_enum, default_value_t = TemplateFormatArg::Csv)]
        format: TemplateFormatArg,

        /// Output path (default: template filename in cwd)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateFormatArg {
    Csv,
    Xlsx,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show config paths
    Path,

    /// Create config template
    Init,
}
