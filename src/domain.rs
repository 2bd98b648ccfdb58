//! Domain models for tailored requirement catalogs.
//!
//! This module contains the core domain types including chapters,
//! requirements, documents (DRDs), project phases and configuration.

mod catalog;
pub use catalog::{Catalog, Tailoring};

/// The recursive chapter tree and its navigation.
pub mod chapter;
pub use chapter::Chapter;

pub(crate) mod config;
pub use config::{Config, ConfigError};

/// Document Requirement Definitions.
pub mod document;
pub use document::{Document, DocumentNumber};

/// Parsing of dotted chapter numbers.
pub mod number;
pub use number::FormatError;

/// Project lifecycle phases.
pub mod phase;
pub use phase::Phase;

mod requirement;
pub use requirement::{
    CatalogRequirement, Identifier, Reference, Requirement, TailoringRequirement,
};
