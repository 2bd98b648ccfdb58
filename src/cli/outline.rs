use std::path::PathBuf;

use clap::Parser;
use tailoring::{domain::number::depth_of, Requirement};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Print the chapter outline of a catalog")]
pub struct Outline {
    /// Path to the catalog source file (YAML)
    source: PathBuf,

    /// Also list the requirements of every chapter
    #[arg(short, long)]
    requirements: bool,
}

impl Outline {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self) -> anyhow::Result<()> {
        let catalog = super::import(&self.source)?;

        println!(
            "{} {}",
            catalog.root().name(),
            format!("(version {})", catalog.version()).dim()
        );

        for chapter in catalog.root().chapters().filter(|chapter| !chapter.is_root()) {
            let indent = "  ".repeat(depth_of(chapter.number()));
            let count = chapter.requirements().len();
            if count == 0 {
                println!("{indent}{} {}", chapter.number().info(), chapter.name());
            } else {
                println!(
                    "{indent}{} {} {}",
                    chapter.number().info(),
                    chapter.name(),
                    format!("[{count}]").dim()
                );
            }

            if self.requirements {
                for requirement in chapter.requirements() {
                    let phases = requirement
                        .phases
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(",");
                    println!(
                        "{indent}  {}) {} {}",
                        requirement.position(),
                        first_line(requirement.text()),
                        format!("[{phases}]").dim()
                    );
                }
            }
        }

        Ok(())
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default().trim()
}
