use std::{collections::BTreeSet, fmt, path::PathBuf, str::FromStr};

use anyhow::{anyhow, bail};
use clap::Parser;
use serde::Serialize;
use tailoring::{
    Chapter, Config, Phase, PhaseMilestones, Resolution, Resolver, TailoringRequirement,
};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "List the DRDs applicable to the given project phases")]
pub struct Drds {
    /// Path to the catalog source file (YAML)
    source: PathBuf,

    /// Active project phase (repeatable)
    #[arg(short, long = "phase", value_name = "PHASE", required = true)]
    phases: Vec<Phase>,

    /// Only consider the subtree of this chapter
    #[arg(long, value_name = "NUMBER")]
    chapter: Option<String>,

    /// Tailor the catalog for the phases first and only count selected
    /// requirements
    #[arg(long)]
    tailor: bool,

    /// Deselect a requirement of the tailoring (implies --tailor)
    #[arg(long, value_name = "CHAPTER:POSITION")]
    deselect: Vec<RequirementRef>,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// A requirement addressed as `CHAPTER:POSITION`, e.g. `5.2:a`.
#[derive(Debug, Clone)]
struct RequirementRef {
    chapter: String,
    position: String,
}

impl FromStr for RequirementRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split_once(':')
            .map(|(chapter, position)| (chapter.trim(), position.trim()));
        match parts {
            Some((chapter, position)) if !chapter.is_empty() && !position.is_empty() => Ok(Self {
                chapter: chapter.to_string(),
                position: position.to_string(),
            }),
            _ => Err(format!("expected CHAPTER:POSITION, got '{s}'")),
        }
    }
}

impl fmt::Display for RequirementRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.chapter, self.position)
    }
}

#[derive(Debug, Serialize)]
struct DocumentRow<'a> {
    number: &'a str,
    title: &'a str,
    delivery_milestone: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    action: Option<&'a str>,
    chapters: Vec<&'a str>,
}

impl Drds {
    #[instrument(level = "debug", skip(self, config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let catalog = super::import(&self.source)?;
        let phases: BTreeSet<Phase> = self.phases.iter().copied().collect();
        let resolver = Resolver::from_config(config);

        let resolution = if self.tailor || !self.deselect.is_empty() {
            let mut tailoring = catalog.tailor(&phases);
            for target in &self.deselect {
                let Some(requirement) = tailoring
                    .root_mut()
                    .find_chapter_mut(&target.chapter)
                    .and_then(|chapter| chapter.find_requirement_mut(&target.position))
                else {
                    bail!("Requirement {target} not found");
                };
                requirement.set_selected(false);
            }
            let chapter = subtree(tailoring.root(), self.chapter.as_deref())?;
            resolver.resolve(chapter, &phases, TailoringRequirement::selected)
        } else {
            let chapter = subtree(catalog.root(), self.chapter.as_deref())?;
            resolver.resolve_all(chapter, &phases)
        };

        match self.output {
            OutputFormat::Table => Self::output_table(&resolution, &phases, resolver.rule()),
            OutputFormat::Json => Self::output_json(&resolution)?,
        }

        Ok(())
    }

    fn output_table(resolution: &Resolution, phases: &BTreeSet<Phase>, rule: &PhaseMilestones) {
        if resolution.is_empty() {
            let phases = phases
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            println!("{}", format!("No DRDs apply in phase(s) {phases}").warning());
            return;
        }

        let width = resolution
            .iter()
            .map(|(document, _)| document.number().len())
            .max()
            .unwrap_or_default();

        for (document, chapters) in resolution.sorted() {
            let native = rule
                .phases_of(document.delivery_milestone())
                .map(|phase| phase.to_string())
                .collect::<Vec<_>>()
                .join(",");
            let chapters = chapters
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            let number = format!("{:<width$}", document.number().to_string());
            println!(
                "{}  {}  {} {}",
                number.info(),
                document.title(),
                format!("{} ({native})", document.delivery_milestone()).dim(),
                format!("chapters: {chapters}").dim(),
            );
        }
    }

    fn output_json(resolution: &Resolution) -> anyhow::Result<()> {
        let rows: Vec<DocumentRow<'_>> = resolution
            .sorted()
            .into_iter()
            .map(|(document, chapters)| DocumentRow {
                number: document.number(),
                title: document.title(),
                delivery_milestone: document.delivery_milestone(),
                action: document.action(),
                chapters: chapters.iter().map(String::as_str).collect(),
            })
            .collect();

        serde_json::to_writer_pretty(std::io::stdout(), &rows)?;
        println!();
        Ok(())
    }
}

fn subtree<'a, T>(root: &'a Chapter<T>, number: Option<&str>) -> anyhow::Result<&'a Chapter<T>> {
    match number {
        None => Ok(root),
        Some(number) => root
            .find_chapter(number)
            .ok_or_else(|| anyhow!("Chapter {number} not found")),
    }
}
