use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{read_yaml, LoadError};
use crate::{
    domain::{Catalog, CatalogRequirement, Document},
    import::{ImportError, Importer, Row},
};

/// A catalog in its flat, row-based source form.
///
/// ```yaml
/// version: "2020"
/// title: Space project management
/// documents:
///   - number: DRD-1
///     title: Management plan
///     delivery_milestone: SRR
/// rows:
///   - chapter: "1"
///     title: Scope
///   - chapter: "1"
///     position: a
///     text: The supplier shall ...
///     phases: [B, C]
///     documents: [DRD-1]
/// ```
///
/// Rows are numbered from 1 in the order they appear.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSource {
    /// Version of the catalog.
    pub version: String,
    /// Title of the catalog, used as the name of the root chapter.
    pub title: String,
    /// The DRD table referenced by the rows.
    #[serde(default)]
    pub documents: Vec<Document>,
    /// The catalog rows.
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl CatalogSource {
    /// Reads a catalog source from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(level = "debug")]
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        read_yaml(path)
    }

    /// Assembles the rows into a catalog.
    ///
    /// # Errors
    ///
    /// Returns an [`ImportError`] naming the first row that could not be
    /// imported, or [`ImportError::DuplicateDocument`] if the DRD table
    /// repeats a number.
    pub fn import(self) -> Result<Catalog<CatalogRequirement>, ImportError> {
        Importer::new(self.documents)?.import(self.version, self.title, self.rows)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    const SOURCE: &str = r#"
version: "2020"
title: Space project management
documents:
  - number: DRD-1
    title: Management plan
    delivery_milestone: SRR
  - number: DRD-2
    title: Risk register
    delivery_milestone: PDR
rows:
  - chapter: "2.1"
    position: a
    text: Plan the project.
    phases: [B]
    documents: [DRD-1]
  - chapter: "1"
    title: Scope
  - chapter: "2"
    title: Management
  - chapter: "2.1"
    title: Planning
  - chapter: "2.1"
    position: b
    text: Manage risks.
    phases: [b, c]
    documents: [DRD-2, DRD-1]
"#;

    fn write_source(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("source.yaml");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn loads_and_imports_a_source() {
        let dir = TempDir::new().unwrap();
        let path = write_source(&dir, SOURCE);

        let catalog = CatalogSource::load(&path).unwrap().import().unwrap();

        assert_eq!(catalog.version(), "2020");
        assert_eq!(catalog.root().name(), "Space project management");
        let planning = catalog.find_chapter("2.1").unwrap();
        assert_eq!(planning.name(), "Planning");
        assert_eq!(planning.requirements().len(), 2);
        assert_eq!(planning.requirements()[1].documents.len(), 2);
        let numbers: Vec<_> = catalog.root().chapters().map(|c| c.number()).collect();
        assert_eq!(numbers, ["", "1", "2", "2.1"]);
    }

    #[test]
    fn unknown_document_names_the_row() {
        let dir = TempDir::new().unwrap();
        let path = write_source(&dir, &SOURCE.replace("[DRD-2, DRD-1]", "[DRD-9]"));

        let error = CatalogSource::load(&path).unwrap().import().unwrap_err();

        assert_eq!(error.row(), Some(5));
        assert_eq!(
            error.to_string(),
            "Row 5 could not be imported: unknown DRD 'DRD-9'"
        );
    }

    #[test]
    fn missing_source_is_reported() {
        let dir = TempDir::new().unwrap();
        let result = CatalogSource::load(&dir.path().join("missing.yaml"));
        assert!(matches!(result, Err(LoadError::NotFound(_))));
    }

    #[test]
    fn repeated_drd_is_reported() {
        let dir = TempDir::new().unwrap();
        let source = SOURCE.replace("number: DRD-2", "number: DRD-1");
        let path = write_source(&dir, &source);

        let error = CatalogSource::load(&path).unwrap().import().unwrap_err();

        assert_eq!(
            error,
            ImportError::DuplicateDocument {
                number: "DRD-1".to_string(),
            }
        );
    }
}
