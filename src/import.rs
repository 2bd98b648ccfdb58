//! Import of catalogs from flat, row-based sources such as spreadsheets.
//!
//! Every [`Row`] names a chapter by its dotted number. A row with a
//! requirement position adds a requirement to that chapter; a row without
//! one only declares the chapter (and usually its title). Documents are
//! referenced by number and resolved against a separately supplied DRD
//! table.
//!
//! Failures are reported against the row that caused them, so a human can
//! fix the source table. The DRD table must not list a document number
//! twice.

use std::collections::{hash_map::Entry, HashMap};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::{
    builder::{BuildError, TreeBuilder},
    domain::{
        phase::UnknownPhaseError, Catalog, CatalogRequirement, Chapter, Document, Identifier,
        Phase, Reference, Requirement,
    },
};

/// One row of a catalog source table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// Dotted number of the chapter the row belongs to.
    pub chapter: String,
    /// Chapter title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Position of the requirement within its chapter, e.g. `a`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    /// Requirement statement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Codes of the phases the requirement applies to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phases: Vec<String>,
    /// Typed identifiers of the requirement.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<Identifier>,
    /// Origin of the requirement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<Reference>,
    /// Numbers of the documents the requirement asks for.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub documents: Vec<String>,
}

/// Errors that can occur when importing a catalog.
///
/// Every variant except [`ImportError::DuplicateDocument`] carries the number
/// of the offending source row.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ImportError {
    /// The DRD table lists the same document number more than once.
    #[error("DRD '{number}' is listed more than once in the DRD table")]
    DuplicateDocument {
        /// The repeated document number.
        number: String,
    },

    /// The chapter of the row is malformed or cannot be placed in the tree.
    #[error("Row {row} could not be imported: {source}")]
    Chapter {
        /// The offending row.
        row: usize,
        /// What was wrong with the chapter.
        source: BuildError,
    },

    /// The row references a document missing from the DRD table.
    #[error("Row {row} could not be imported: unknown DRD '{number}'")]
    UnknownDocument {
        /// The offending row.
        row: usize,
        /// The unknown document number.
        number: String,
    },

    /// The row lists an unknown phase.
    #[error("Row {row} could not be imported: {source}")]
    Phase {
        /// The offending row.
        row: usize,
        /// The unknown phase.
        source: UnknownPhaseError,
    },

    /// The row has requirement text but no position.
    #[error("Row {row} could not be imported: requirement has no position")]
    MissingPosition {
        /// The offending row.
        row: usize,
    },

    /// The row repeats the position of an earlier requirement of the same
    /// chapter.
    #[error(
        "Row {row} could not be imported: duplicate requirement '{position}' in chapter \
         '{chapter}'"
    )]
    DuplicateRequirement {
        /// The offending row.
        row: usize,
        /// The chapter number.
        chapter: String,
        /// The repeated position.
        position: String,
    },
}

impl ImportError {
    /// The number of the source row that caused the error, if a row did.
    #[must_use]
    pub const fn row(&self) -> Option<usize> {
        match self {
            Self::DuplicateDocument { .. } => None,
            Self::Chapter { row, .. }
            | Self::UnknownDocument { row, .. }
            | Self::Phase { row, .. }
            | Self::MissingPosition { row }
            | Self::DuplicateRequirement { row, .. } => Some(*row),
        }
    }
}

/// Turns source rows into a [`Catalog`].
#[derive(Debug, Clone)]
pub struct Importer {
    documents: HashMap<String, Document>,
    first_row: usize,
}

impl Importer {
    /// Creates an importer resolving document references against the given
    /// DRD table.
    ///
    /// Rows are numbered from 1.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::DuplicateDocument`] if two documents share a
    /// number.
    pub fn new(documents: impl IntoIterator<Item = Document>) -> Result<Self, ImportError> {
        let mut table = HashMap::new();
        for document in documents {
            match table.entry(document.number().to_string()) {
                Entry::Occupied(entry) => {
                    warn!(number = entry.key().as_str(), "duplicate DRD");
                    return Err(ImportError::DuplicateDocument {
                        number: entry.key().clone(),
                    });
                }
                Entry::Vacant(entry) => {
                    entry.insert(document);
                }
            }
        }

        Ok(Self {
            documents: table,
            first_row: 1,
        })
    }

    /// Sets the number of the first row, for sources with header rows.
    #[must_use]
    pub const fn with_first_row(mut self, first_row: usize) -> Self {
        self.first_row = first_row;
        self
    }

    /// Imports the rows into a catalog.
    ///
    /// Chapters may be declared in any order and requirements may appear
    /// before their chapter's title row. Requirements keep their row order
    /// within each chapter.
    ///
    /// # Errors
    ///
    /// Returns an [`ImportError`] naming the first row that could not be
    /// imported.
    #[instrument(level = "info", skip_all, fields(version = %version.as_ref()))]
    pub fn import(
        &self,
        version: impl AsRef<str>,
        title: impl Into<String>,
        rows: impl IntoIterator<Item = Row>,
    ) -> Result<Catalog<CatalogRequirement>, ImportError> {
        // Chapter number → (first row, chapter), in order of first appearance
        let mut chapters: IndexMap<String, (usize, Chapter<CatalogRequirement>)> =
            IndexMap::new();

        for (row, source) in (self.first_row..).zip(rows) {
            let number = source.chapter.trim().to_string();

            let (_, chapter) = match chapters.entry(number) {
                indexmap::map::Entry::Occupied(entry) => entry.into_mut(),
                indexmap::map::Entry::Vacant(entry) => {
                    let chapter = Chapter::new(String::new(), entry.key().as_str())
                        .map_err(|error| reject(row, error.into()))?;
                    entry.insert((row, chapter))
                }
            };

            if let Some(title) = &source.title {
                chapter.set_name(title.trim());
            }

            if let Some(requirement) = self.requirement(row, source)? {
                if chapter.find_requirement(requirement.position()).is_some() {
                    warn!(row, "duplicate requirement");
                    return Err(ImportError::DuplicateRequirement {
                        row,
                        chapter: chapter.number().to_string(),
                        position: requirement.position,
                    });
                }
                chapter.requirements_mut().push(requirement);
            }
        }

        let mut builder = TreeBuilder::new(Chapter::root(title));
        let mut first_rows = HashMap::with_capacity(chapters.len());
        for (number, (row, chapter)) in chapters {
            builder.insert(chapter).map_err(|error| reject(row, error))?;
            first_rows.insert(number, row);
        }

        let root = builder.build().map_err(|error| {
            let row = first_rows
                .get(error.number())
                .copied()
                .unwrap_or(self.first_row);
            reject(row, error)
        })?;

        let catalog = Catalog::new(version.as_ref(), root);
        info!(
            chapters = catalog.root().chapters().count() - 1,
            requirements = catalog.root().all_requirements().count(),
            "imported catalog"
        );
        Ok(catalog)
    }

    /// Converts the requirement part of a row, if it has one.
    fn requirement(
        &self,
        row: usize,
        source: Row,
    ) -> Result<Option<CatalogRequirement>, ImportError> {
        let position = source
            .position
            .map(|position| position.trim().to_string())
            .filter(|position| !position.is_empty());

        let Some(position) = position else {
            if source.text.is_some() {
                warn!(row, "requirement without position");
                return Err(ImportError::MissingPosition { row });
            }
            return Ok(None);
        };

        let phases = source
            .phases
            .iter()
            .map(|code| code.parse::<Phase>())
            .collect::<Result<_, _>>()
            .map_err(|source| ImportError::Phase { row, source })?;

        let documents = source
            .documents
            .iter()
            .map(|number| {
                self.documents
                    .get(number.trim())
                    .cloned()
                    .ok_or_else(|| ImportError::UnknownDocument {
                        row,
                        number: number.clone(),
                    })
            })
            .collect::<Result<_, _>>()?;

        Ok(Some(CatalogRequirement {
            position,
            text: source.text.unwrap_or_default(),
            reference: source.reference,
            documents,
            phases,
            identifiers: source.identifiers,
        }))
    }
}

fn reject(row: usize, source: BuildError) -> ImportError {
    warn!(row, %source, "rejected row");
    ImportError::Chapter { row, source }
}
