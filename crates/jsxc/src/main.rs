//! jsxc CLI - compiles inline markup in `.jsx` files into factory calls.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod compile;
mod files;

#[derive(Parser)]
#[command(name = "jsxc")]
#[command(about = "Compile inline markup into factory calls")]
#[command(version)]
pub struct Cli {
    /// Files or directories to compile (directories are searched for .jsx files)
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Path to jsxc.toml config file
    #[arg(short, long, default_value = "jsxc.toml")]
    config: PathBuf,

    /// Output directory (defaults to config, else next to each input)
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Factory for lowercase elements
    #[arg(long)]
    element: Option<String>,

    /// Factory for components
    #[arg(long)]
    component: Option<String>,

    /// Wrapper for text children
    #[arg(long)]
    text: Option<String>,

    /// Fail on malformed markup instead of recovering
    #[arg(long)]
    strict: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    let options = compile::Options {
        paths: cli.paths,
        config: cli.config,
        out_dir: cli.out_dir,
        element: cli.element,
        component: cli.component,
        text: cli.text,
        strict: cli.strict,
    };

    compile::run(&options)?;

    Ok(())
}
