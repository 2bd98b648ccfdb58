use std::{
    fs::File,
    io::{self, BufReader, BufWriter},
    path::Path,
};

use serde::{de::DeserializeOwned, Serialize};

/// Catalog source files: flat rows plus a DRD table.
pub mod source;
pub use source::CatalogSource;

mod catalog;
pub use catalog::{load_catalog, save_catalog};

/// Errors that can occur when reading or writing catalog files.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file was not found.
    #[error("file not found: {0}")]
    NotFound(String),
    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The YAML content could not be parsed or produced.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let file = File::open(path).map_err(|io_error| match io_error.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound(path.display().to_string()),
        _ => LoadError::Io(io_error),
    })?;
    Ok(serde_yaml::from_reader(BufReader::new(file))?)
}

fn write_yaml<T: Serialize>(path: &Path, value: &T) -> Result<(), LoadError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    serde_yaml::to_writer(BufWriter::new(file), value)?;
    Ok(())
}
