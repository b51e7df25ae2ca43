use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "loveweb")]
#[command(about = "Package LÖVE games for the web", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Package a game into a web bundle
    Build(BuildArgs),

    /// Export the game source as a .love archive
    Export(ExportArgs),

    /// Start the packaging server
    Serve(ServeArgs),
}

#[derive(Args)]
pub struct BuildArgs {
    /// Input: a game directory, .love file, URL or data URI
    pub input: String,

    /// Output directory
    #[arg(long, short)]
    pub output: PathBuf,

    /// Page title
    #[arg(long, default_value = loveweb_core::DEFAULT_TITLE)]
    pub title: String,

    /// Memory ceiling in bytes
    #[arg(long, default_value_t = loveweb_core::DEFAULT_MEMORY_LIMIT)]
    pub memory: u64,

    /// Use the compat runtime flavor (no worker file, broader support)
    #[arg(long)]
    pub compatibility: bool,

    /// Emit one self-contained HTML document instead of a file tree
    #[arg(long)]
    pub single_file: bool,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Input: a game directory, .love file, URL or data URI
    pub input: String,

    /// Output archive path (e.g. game.love)
    #[arg(long, short)]
    pub output: PathBuf,
}

#[derive(Args)]
pub struct ServeArgs {
    #[arg(long)]
    pub host: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,

    /// Runtime asset directory holding release/ and compat/ flavors
    #[arg(long)]
    pub assets: Option<PathBuf>,
}
