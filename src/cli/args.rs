//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum, ValueHint};

use crate::application::services::Strategy;
use crate::domain::MenuMode;

/// Materialize parent-sorted adjacency-list rows into nested navigation menu trees
#[derive(Parser, Debug)]
#[command(name = "menutree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Directory holding the local .menutree.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a menu tree from a JSON records file
    Build {
        /// Records file (JSON array); falls back to `input` from config
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// Parent id of top-level records
        #[arg(long)]
        root: Option<i64>,
        /// Output shape: native or extended
        #[arg(short, long)]
        mode: Option<MenuMode>,
        /// Assembly algorithm: scan or indexed
        #[arg(short, long)]
        strategy: Option<Strategy>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        /// Sort records by parent_id, sort_order first
        #[arg(long)]
        sort: bool,
        /// Reject malformed input
        #[arg(long)]
        strict: bool,
        /// Deepest menu accepted
        #[arg(long)]
        max_depth: Option<usize>,
        /// Write output to file instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Check a records file for duplicate ids, ordering and orphans
    Validate {
        /// Records file (JSON array); falls back to `input` from config
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// Parent id of top-level records
        #[arg(long)]
        root: Option<i64>,
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

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Print a commented template config
    Template,
    /// Show config file locations
    Path,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Menu-widget items as JSON
    Json,
    /// Indented text tree
    Tree,
}
