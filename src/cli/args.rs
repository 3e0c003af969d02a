//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Vitrine static site navigation runtime CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long, global = true)]
    pub verbose: bool,

    /// Config file path (default: vitrine.toml)
    #[arg(short = 'C', long, default_value = "vitrine.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Boot the runtime headless on every page and report what would break
    #[command(visible_alias = "c")]
    Check {
        #[command(flatten)]
        args: CheckArgs,
    },

    /// Print the base prefix for a URL or path
    #[command(visible_alias = "b")]
    Base {
        /// Page URL or URL path (e.g. /websites/acme/work/acme/)
        url: String,

        /// Site root URL path, overriding `site.root`
        #[arg(short, long)]
        root: Option<String>,
    },

    /// Print the default configuration as TOML
    Config,
}

/// Check command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct CheckArgs {
    /// Built site directory
    #[arg(short, long, default_value = ".", value_hint = clap::ValueHint::DirPath)]
    pub dir: PathBuf,

    /// Origin the site is served from
    #[arg(long, default_value = "http://localhost/", value_hint = clap::ValueHint::Url)]
    pub origin: String,

    /// Treat problems as warnings instead of errors
    #[arg(long, short = 'w')]
    pub warn_only: bool,
}
