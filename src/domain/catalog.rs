use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::domain::{CatalogRequirement, Chapter, Phase, TailoringRequirement};

/// A versioned tree of chapters and requirements.
///
/// Once built, a catalog is treated as an immutable value: every query
/// borrows it, so any number of readers may traverse it concurrently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog<T> {
    version: String,
    root: Chapter<T>,
}

/// A project-specific narrowing of a master catalog.
pub type Tailoring = Catalog<TailoringRequirement>;

impl<T> Catalog<T> {
    /// Creates a catalog from a fully built root chapter.
    #[must_use]
    pub fn new(version: impl Into<String>, root: Chapter<T>) -> Self {
        Self {
            version: version.into(),
            root,
        }
    }

    /// The version of the catalog, e.g. `ECSS-Q-ST-80C Rev.1`.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The root chapter.
    #[must_use]
    pub const fn root(&self) -> &Chapter<T> {
        &self.root
    }

    /// Mutable access to the root chapter.
    pub fn root_mut(&mut self) -> &mut Chapter<T> {
        &mut self.root
    }

    /// Finds a chapter anywhere in the catalog by number.
    #[must_use]
    pub fn find_chapter(&self, number: &str) -> Option<&Chapter<T>> {
        self.root.find_chapter(number)
    }

    /// Returns every chapter number that occurs more than once, in pre-order
    /// of the second occurrence.
    ///
    /// A well-formed catalog returns an empty list.
    #[must_use]
    pub fn duplicate_numbers(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.root
            .chapters()
            .map(Chapter::number)
            .filter(|number| !seen.insert(*number))
            .collect()
    }
}

impl Catalog<CatalogRequirement> {
    /// Derives a tailoring for a project running the given phases.
    ///
    /// Requirements applicable to any of the phases start selected; all
    /// others start deselected.
    #[must_use]
    pub fn tailor(&self, phases: &BTreeSet<Phase>) -> Tailoring {
        Catalog {
            version: self.version.clone(),
            root: self
                .root
                .map(&mut |requirement| TailoringRequirement::from_catalog(requirement, phases)),
        }
    }
}
