//! Brochure CLI - multilingual marketing site generator.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "brochure")]
#[command(about = "Generate a multilingual marketing site from JSON config and translations")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to the site config file
    #[arg(short, long, default_value = "config.json", global = true)]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the site (default)
    Build(commands::build::PathArgs),

    /// Report translation keys missing from any language
    Check {
        #[command(flatten)]
        paths: commands::build::PathArgs,

        /// Exit with an error when any key is missing
        #[arg(long)]
        strict: bool,
    },

    /// Scaffold config, translations, template and stylesheet
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        None => {
            commands::build::run(&cli.config, commands::build::PathArgs::default())?;
        }
        Some(Commands::Build(paths)) => {
            commands::build::run(&cli.config, paths)?;
        }
        Some(Commands::Check { paths, strict }) => {
            commands::check::run(&cli.config, paths, strict)?;
        }
        Some(Commands::Init { yes }) => {
            commands::init::run(&cli.config, yes)?;
        }
    }

    Ok(())
}
