use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use tracing::instrument;

use super::{read_yaml, write_yaml, LoadError};
use crate::domain::Catalog;

/// Writes a catalog to the given path as YAML.
///
/// Parent directories are created automatically if they don't exist.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to.
#[instrument(level = "debug", skip(catalog), fields(version = catalog.version()))]
pub fn save_catalog<T: Serialize>(path: &Path, catalog: &Catalog<T>) -> Result<(), LoadError> {
    write_yaml(path, catalog)
}

/// Reads a catalog previously written by [`save_catalog`].
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid catalog.
#[instrument(level = "debug")]
pub fn load_catalog<T: DeserializeOwned>(path: &Path) -> Result<Catalog<T>, LoadError> {
    read_yaml(path)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use tempfile::TempDir;

    use super::*;
    use crate::domain::{
        chapter::tests::chapter, CatalogRequirement, Chapter, Phase, TailoringRequirement,
    };

    fn catalog() -> Catalog<CatalogRequirement> {
        let mut root = Chapter::root("Catalog");
        root.push_child(chapter("1", &["a", "b"]));
        root.push_child(chapter("2", &["a"]));
        Catalog::new("2020", root)
    }

    #[test]
    fn catalog_survives_a_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out/catalog.yaml");

        save_catalog(&path, &catalog()).unwrap();
        let loaded: Catalog<CatalogRequirement> = load_catalog(&path).unwrap();

        assert_eq!(loaded, catalog());
    }

    #[test]
    fn tailoring_keeps_its_selection() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tailoring.yaml");
        let mut tailoring = catalog().tailor(&BTreeSet::from([Phase::B]));
        let requirement = tailoring
            .root_mut()
            .find_chapter_mut("1")
            .and_then(|chapter| chapter.find_requirement_mut("a"))
            .unwrap();
        assert!(requirement.set_text("Revised".to_string()));

        save_catalog(&path, &tailoring).unwrap();
        let loaded: Catalog<TailoringRequirement> = load_catalog(&path).unwrap();

        assert_eq!(loaded, tailoring);
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let result = load_catalog::<CatalogRequirement>(&dir.path().join("missing.yaml"));
        assert!(matches!(result, Err(LoadError::NotFound(_))));
    }

    #[test]
    fn malformed_file_is_a_yaml_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.yaml");
        std::fs::write(&path, "version: [unterminated").unwrap();

        let result = load_catalog::<CatalogRequirement>(&path);
        assert!(matches!(result, Err(LoadError::Yaml(_))));
    }
}
