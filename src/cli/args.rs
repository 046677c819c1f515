//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};

/// Developer CLI for common ArgoEKS workflows
#[derive(Parser, Debug)]
#[command(name = "argoeks")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Print commands without executing them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Echo commands before running
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Repository root (default: discovered from cwd)
    #[arg(short = 'C', long, global = true, env = "ARGOEKS_REPO_ROOT", value_hint = ValueHint::DirPath)]
    pub repo_root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Environment level commands
    Env {
        #[command(subcommand)]
        command: EnvCommands,
    },

    /// Documentation utilities
    Docs {
        #[command(subcommand)]
        command: DocsCommands,
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

/// Environment and region selection shared by plan/apply/destroy.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Environment name (default: dev)
    #[arg(long)]
    pub env: Option<String>,

    /// AWS region (default: us-east-1)
    #[arg(long)]
    pub region: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum EnvCommands {
    /// Plan environment
    Plan(TargetArgs),

    /// Apply environment
    Apply {
        #[command(flatten)]
        target: TargetArgs,
        /// Skip approval prompts
        #[arg(long)]
        auto_approve: bool,
    },

    /// Destroy environment
    Destroy(TargetArgs),

    /// Show environment outputs
    Output {
        /// Environment name (default: dev)
        #[arg(long)]
        env: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum DocsCommands {
    /// Run the documentation freshness check
    Status,

    /// Open a registered document in the pager
    Open {
        /// Document name (case-insensitive), e.g. "quick start"
        #[arg(long)]
        name: String,
        /// Only print the file path
        #[arg(long)]
        print_only: bool,
    },

    /// List registered documents
    List,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show config paths
    Path,

    /// Create config template
    Init {
        /// Create global config instead of the repository one
        #[arg(short, long)]
        global: bool,
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}
