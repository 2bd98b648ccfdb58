use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Document, Phase};

/// The capabilities shared by every kind of requirement stored in a
/// [`Chapter`](crate::Chapter).
///
/// Catalog requirements and tailoring requirements carry different
/// bookkeeping, but tree navigation and document resolution only need these
/// three accessors.
pub trait Requirement {
    /// Identifier of the requirement, unique within its chapter (e.g. `a`).
    fn position(&self) -> &str;

    /// The requirement statement.
    fn text(&self) -> &str;

    /// The documents (DRDs) the requirement asks for.
    ///
    /// A requirement without documents returns an empty slice.
    fn documents(&self) -> &[Document];
}

/// The origin of a requirement, such as the standard clause it was taken
/// from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Citation text, e.g. `ECSS-Q-ST-80C 5.2.1a`.
    pub text: String,
    /// Whether the requirement was modified with respect to its origin.
    #[serde(default)]
    pub changed: bool,
    /// Reference to the logo of the originating organisation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

/// A typed identifier attached to a catalog requirement, e.g. a product
/// assurance category with a criticality level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    /// Category code, e.g. `ME`.
    pub category: String,
    /// Numeric level within the category.
    pub level: u8,
    /// Restrictions on when the identifier applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limitation: Option<String>,
}

/// A requirement of the master catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRequirement {
    /// Identifier within the owning chapter.
    pub position: String,
    /// The requirement statement.
    pub text: String,
    /// Where the requirement comes from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<Reference>,
    /// Referenced documents.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub documents: Vec<Document>,
    /// The lifecycle phases the requirement applies to.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub phases: BTreeSet<Phase>,
    /// Typed identifiers of the requirement.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<Identifier>,
}

impl CatalogRequirement {
    /// Creates a requirement with no reference, documents, phases or
    /// identifiers.
    #[must_use]
    pub fn new(position: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            position: position.into(),
            text: text.into(),
            reference: None,
            documents: Vec::new(),
            phases: BTreeSet::new(),
            identifiers: Vec::new(),
        }
    }

    /// Whether the requirement applies to any of the given phases.
    #[must_use]
    pub fn applies_to(&self, phases: &BTreeSet<Phase>) -> bool {
        !self.phases.is_disjoint(phases)
    }
}

impl Requirement for CatalogRequirement {
    fn position(&self) -> &str {
        &self.position
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn documents(&self) -> &[Document] {
        &self.documents
    }
}

/// A requirement of a project tailoring.
///
/// Tailoring requirements start as copies of catalog requirements and are
/// then selected, deselected or reworded for a specific project. Each kind of
/// change is timestamped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TailoringRequirement {
    position: String,
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reference: Option<Reference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    documents: Vec<Document>,
    selected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    selection_changed: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text_changed: Option<DateTime<Utc>>,
}

impl TailoringRequirement {
    /// Derives a tailoring requirement from a catalog requirement.
    ///
    /// The requirement starts selected if it applies to any of the project
    /// phases.
    #[must_use]
    pub fn from_catalog(requirement: &CatalogRequirement, phases: &BTreeSet<Phase>) -> Self {
        Self {
            position: requirement.position.clone(),
            text: requirement.text.clone(),
            reference: requirement.reference.clone(),
            documents: requirement.documents.clone(),
            selected: requirement.applies_to(phases),
            selection_changed: None,
            text_changed: None,
        }
    }

    /// Whether the requirement is part of the tailoring.
    #[must_use]
    pub const fn selected(&self) -> bool {
        self.selected
    }

    /// The reference of the requirement, if any.
    #[must_use]
    pub const fn reference(&self) -> Option<&Reference> {
        self.reference.as_ref()
    }

    /// When the selection was last changed.
    #[must_use]
    pub const fn selection_changed(&self) -> Option<DateTime<Utc>> {
        self.selection_changed
    }

    /// When the text was last changed.
    #[must_use]
    pub const fn text_changed(&self) -> Option<DateTime<Utc>> {
        self.text_changed
    }

    /// Selects or deselects the requirement.
    ///
    /// Returns `true` if the selection changed, in which case the change is
    /// timestamped.
    pub fn set_selected(&mut self, selected: bool) -> bool {
        if self.selected == selected {
            return false;
        }
        self.selected = selected;
        self.selection_changed = Some(Utc::now());
        true
    }

    /// Rewords the requirement.
    ///
    /// Returns `true` if the text changed, in which case the change is
    /// timestamped.
    pub fn set_text(&mut self, text: String) -> bool {
        if self.text == text {
            return false;
        }
        self.text = text;
        self.text_changed = Some(Utc::now());
        true
    }
}

impl Requirement for TailoringRequirement {
    fn position(&self) -> &str {
        &self.position
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn documents(&self) -> &[Document] {
        &self.documents
    }
}
