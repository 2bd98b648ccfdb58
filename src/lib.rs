//! Tailoring of ECSS requirement catalogs
//!
//! A catalog is a tree of numbered chapters holding requirements. Catalogs
//! are assembled from flat chapter records, tailored for the phases of a
//! project, and queried for the documents (DRDs) whose delivery milestones
//! fall into those phases.

pub mod builder;
pub use builder::{build_tree, BuildError, TreeBuilder};

pub mod domain;
pub use domain::{
    Catalog, CatalogRequirement, Chapter, Config, Document, DocumentNumber, Phase, Requirement,
    Tailoring, TailoringRequirement,
};

pub mod import;
pub use import::{ImportError, Importer, Row};

pub mod resolver;
pub use resolver::{MilestoneRule, PhaseMilestones, Resolution, Resolver};

/// Filesystem storage for catalog sources and assembled catalogs.
pub mod storage;
pub use storage::{load_catalog, save_catalog, CatalogSource, LoadError};
