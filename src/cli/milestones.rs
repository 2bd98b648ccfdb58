use std::path::PathBuf;

use clap::Parser;
use tailoring::{Config, Phase};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Show the milestone table in use")]
pub struct Milestones {
    /// Also write the table to this TOML file, e.g. as a starting point for
    /// a custom configuration
    #[arg(long, value_name = "PATH")]
    save: Option<PathBuf>,
}

impl Milestones {
    #[instrument(level = "debug", skip(self, config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        for phase in Phase::ALL {
            let milestones = config.milestones(phase).collect::<Vec<_>>().join(", ");
            println!("{}  {milestones}", format!("Phase {phase}").info());
        }

        if let Some(path) = self.save {
            config.save(&path)?;
            println!("{}", format!("Wrote {}", path.display()).success());
        }

        Ok(())
    }
}
