use std::{
    path::{Path, PathBuf},
    process,
};

mod drds;
mod export;
mod milestones;
mod outline;
mod terminal;

use anyhow::Context;
use clap::ArgAction;
use drds::Drds;
use export::Export;
use milestones::Milestones;
use outline::Outline;
use tailoring::{Catalog, CatalogRequirement, CatalogSource, Config};
use tracing::instrument;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a TOML file with the phase milestone table
    ///
    /// The ECSS-M-ST-10 review table is used when omitted.
    #[arg(short, long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => Config::default(),
        };

        self.command.run(&config)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Print the chapter outline of a catalog
    Outline(Outline),

    /// List the DRDs applicable to the given project phases
    ///
    /// A DRD applies when a requirement references it and its delivery
    /// milestone is one of the reviews of an active phase.
    Drds(Drds),

    /// Assemble a catalog (or a tailoring) and save it as YAML
    Export(Export),

    /// Show the milestone table in use
    Milestones(Milestones),
}

impl Command {
    fn run(self, config: &Config) -> anyhow::Result<()> {
        match self {
            Self::Outline(command) => command.run()?,
            Self::Drds(command) => command.run(config)?,
            Self::Export(command) => command.run()?,
            Self::Milestones(command) => command.run(config)?,
        }
        Ok(())
    }
}

/// Loads and imports a catalog source.
///
/// Import failures name the offending source row; they are reported as a
/// single message and end the process with exit code 1.
#[instrument(level = "debug")]
fn import(source: &Path) -> anyhow::Result<Catalog<CatalogRequirement>> {
    let source = CatalogSource::load(source)
        .with_context(|| format!("Failed to read catalog source {}", source.display()))?;

    match source.import() {
        Ok(catalog) => Ok(catalog),
        Err(error) => {
            eprintln!("{error}");
            process::exit(1);
        }
    }
}
