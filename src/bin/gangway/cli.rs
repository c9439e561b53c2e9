//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand};

/// Gangway - runtime discovery and inspection for LLVM toolkits
#[derive(Parser)]
#[command(name = "gangway")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check the installed toolkit and report what discovery found
    Doctor,

    /// List the backends the toolkit was built with
    Targets,

    /// Inspect a target data layout string
    Layout(LayoutArgs),
}

#[derive(Args)]
pub struct LayoutArgs {
    /// Data layout string, e.g. `e-p:32:32:32-i64:32:64`
    pub layout: String,

    /// Address space to report the pointer size for
    #[arg(long, default_value_t = 0)]
    pub address_space: u32,
}
