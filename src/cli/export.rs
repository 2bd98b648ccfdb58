use std::{collections::BTreeSet, path::PathBuf};

use clap::Parser;
use tailoring::{save_catalog, Phase};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Assemble a catalog and save it as YAML")]
pub struct Export {
    /// Path to the catalog source file (YAML)
    source: PathBuf,

    /// Path of the YAML file to write
    out: PathBuf,

    /// Save a tailoring for these project phases instead of the catalog
    #[arg(short, long = "phase", value_name = "PHASE")]
    phases: Vec<Phase>,
}

impl Export {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self) -> anyhow::Result<()> {
        let catalog = super::import(&self.source)?;

        if self.phases.is_empty() {
            save_catalog(&self.out, &catalog)?;
        } else {
            let phases: BTreeSet<Phase> = self.phases.into_iter().collect();
            let tailoring = catalog.tailor(&phases);
            let selected = tailoring
                .root()
                .all_requirements()
                .filter(|requirement| requirement.selected())
                .count();
            save_catalog(&self.out, &tailoring)?;
            println!(
                "{}",
                format!(
                    "Selected {selected} of {} requirements",
                    catalog.root().all_requirements().count()
                )
                .dim()
            );
        }

        println!("{}", format!("Wrote {}", self.out.display()).success());
        Ok(())
    }
}
