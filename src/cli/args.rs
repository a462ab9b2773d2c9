//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::application::OutputFormat;

/// Leadership org chart: keyword tiering, department-matched tree assembly, rendering
#[derive(Parser, Debug)]
#[command(name = "orgchart")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Project directory holding .orgchart.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the tier (0-3) of each position title
    Tier {
        /// Position titles, e.g. "Vice President"
        #[arg(required = true)]
        positions: Vec<String>,
    },

    /// Show the chart as a tree
    Tree {
        /// Leader JSON file ("-" for stdin; default: data_file from config)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Render the chart as text, HTML or JSON
    Render {
        /// Leader JSON file ("-" for stdin; default: data_file from config)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// Output format (default: render.format from config)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
        /// Write to file instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
        /// Emit a complete HTML document with styles
        #[arg(long)]
        standalone: bool,
        /// Omit avatar images
        #[arg(long)]
        no_avatars: bool,
    },

    /// Show chart statistics
    Stats {
        /// Leader JSON file ("-" for stdin; default: data_file from config)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
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
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show config paths
    Path,
}
