//! `tplfactory` command-line entry point.
//!
//! Loads settings, sets up logging, and dispatches to a command handler.

mod commands;

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tplfactory_core::logging::setup_logging;
use tplfactory_core::settings_loader;
use tplfactory_core::Settings;

use crate::commands::RenderOptions;

#[derive(Parser)]
#[command(name = "tplfactory")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file (TOML, or JSON with a `.json` extension)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// List the available template engines
    Engines,
    /// Check the configuration for problems
    Check,
    /// Render a page as a request would
    Render {
        /// Content template of the page
        #[arg(long)]
        template: String,
        /// Page name (defaults to the template name)
        #[arg(long)]
        page_name: Option<String>,
        /// Page title
        #[arg(long)]
        title: Option<String>,
        /// Template variable as key=value; repeatable
        #[arg(long = "var", value_name = "KEY=VALUE")]
        vars: Vec<String>,
    },
}

fn load_settings(path: Option<&PathBuf>) -> anyhow::Result<Settings> {
    match path {
        Some(path) => settings_loader::from_file_with_env(path)
            .with_context(|| format!("loading settings from {}", path.display())),
        None => Ok(settings_loader::from_env()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(cli.settings.as_ref())?;
    setup_logging(&settings);
    tracing::debug!(command = ?cli.command, engine = %settings.engine, "running command");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Engines => commands::engines(&settings, &mut out)?,
        Commands::Check => commands::check(&settings, &mut out)?,
        Commands::Render {
            template,
            page_name,
            title,
            vars,
        } => {
            let options = RenderOptions {
                template,
                page_name,
                title,
                vars,
            };
            commands::render(settings, &options, &mut out)?;
            writeln!(out)?;
        }
    }

    Ok(())
}
