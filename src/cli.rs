//! Command-line interface definition.
use std::path::PathBuf;

use clap::Parser;

/// Merge a self-contained package tree into a shared hierarchy with symlinks.
#[derive(Parser, Debug)]
#[command(name = "spill", version)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Package tree to link, ending in <name>/<version>; a relative path
    /// produces relative links
    pub source: PathBuf,

    /// Shared hierarchy to link into
    #[arg(default_value = ".")]
    pub dest: PathBuf,

    /// Paths relative to the package root to leave alone
    pub ignore: Vec<PathBuf>,

    /// Skip the bin/sbin/lib sanity check
    #[arg(short, long)]
    pub force: bool,

    /// Remove the previously recorded version first
    #[arg(short, long, conflicts_with = "delete")]
    pub upgrade: bool,

    /// Check and report without changing anything
    #[arg(short = 'n', long, alias = "dry_run")]
    pub dry_run: bool,

    /// Show only warnings and errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Expand links to other packages' directories when needed
    #[arg(short = 'x', long)]
    pub expand: bool,

    /// Replace conflicting links that belong to other packages
    #[arg(short = 'o', long = "override")]
    pub override_conflicts: bool,

    /// Remove the package's links instead of installing
    #[arg(short, long)]
    pub delete: bool,

    /// Write conflicting destination paths to FILE
    #[arg(short = 'l', long, value_name = "FILE")]
    pub conflict_list: Option<PathBuf>,

    /// Read defaults from FILE instead of $XDG_CONFIG_HOME/spill/config.toml
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
