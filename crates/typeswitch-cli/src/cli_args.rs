use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "typeswitch",
    version,
    about = "Report type switches that miss implementors of enum-like Go interfaces"
)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as structured JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Print a per-package summary to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Config file to use instead of ./typeswitch.json
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Check type switches in the given packages
    Check(PackageArgs),

    /// List enum-like interfaces and their implementors
    Enums(PackageArgs),
}

#[derive(Args, Debug, Clone)]
pub(crate) struct PackageArgs {
    /// Package directories; `dir/...` includes every package below `dir`
    #[arg(default_value = "./...")]
    pub patterns: Vec<String>,

    /// Include `_test.go` files
    #[arg(long)]
    pub tests: bool,

    /// Do not load imported packages
    #[arg(long)]
    pub no_imports: bool,
}

#[cfg(test)]
#[path = "cli_args_tests.rs"]
mod tests;
