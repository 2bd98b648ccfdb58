//! Resolution of the documents (DRDs) applicable to a chapter tree.
//!
//! The [`Resolver`] walks every chapter of a (sub)tree, keeps the
//! requirements a caller-supplied predicate selects, and records for every
//! document whose delivery milestone is due in the active phases which
//! chapters ask for it. Whether a milestone is due is decided by a
//! [`MilestoneRule`], so different standards can plug in their own review
//! tables.

use std::collections::{BTreeMap, BTreeSet};

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, instrument, trace};

use crate::domain::{config::normalize, Chapter, Config, Document, Phase, Requirement};

/// Decides whether a document's delivery milestone is due in a set of
/// active phases.
pub trait MilestoneRule {
    /// Returns `true` if `milestone` belongs to any of the `phases`.
    ///
    /// `milestone` is passed exactly as it appears on the document. Rules
    /// decide for themselves how to compare codes; [`PhaseMilestones`]
    /// trims them and ignores case.
    fn is_due(&self, milestone: &str, phases: &BTreeSet<Phase>) -> bool;
}

impl<F> MilestoneRule for F
where
    F: Fn(&str, &BTreeSet<Phase>) -> bool,
{
    fn is_due(&self, milestone: &str, phases: &BTreeSet<Phase>) -> bool {
        self(milestone, phases)
    }
}

/// A [`MilestoneRule`] backed by a table of the milestones native to each
/// phase.
///
/// Milestone codes are compared after trimming, ignoring case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhaseMilestones {
    table: BTreeMap<Phase, BTreeSet<String>>,
}

impl PhaseMilestones {
    /// Creates a rule from the milestone table of a configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            table: config.milestone_table().clone(),
        }
    }

    /// The phases in which the milestone is native.
    pub fn phases_of<'a>(&'a self, milestone: &str) -> impl Iterator<Item = Phase> + 'a {
        let milestone = normalize(milestone);
        self.table
            .iter()
            .filter(move |(_, codes)| codes.contains(&milestone))
            .map(|(phase, _)| *phase)
    }
}

impl From<&Config> for PhaseMilestones {
    fn from(config: &Config) -> Self {
        Self::new(config)
    }
}

impl MilestoneRule for PhaseMilestones {
    fn is_due(&self, milestone: &str, phases: &BTreeSet<Phase>) -> bool {
        let milestone = normalize(milestone);
        phases.iter().any(|phase| {
            self.table
                .get(phase)
                .is_some_and(|codes| codes.contains(&milestone))
        })
    }
}

/// The documents applicable to a chapter tree, each with the numbers of the
/// chapters that ask for it.
///
/// Documents and chapter numbers are kept in the order they were first
/// encountered in a pre-order traversal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    documents: IndexMap<Document, IndexSet<String>>,
}

impl Resolution {
    fn record(&mut self, document: &Document, chapter: &str) {
        if let Some(chapters) = self.documents.get_mut(document) {
            chapters.insert(chapter.to_string());
        } else {
            self.documents
                .insert(document.clone(), IndexSet::from([chapter.to_string()]));
        }
    }

    /// The number of applicable documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether no document is applicable.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Whether the document is applicable.
    #[must_use]
    pub fn contains(&self, document: &Document) -> bool {
        self.documents.contains_key(document)
    }

    /// The chapters asking for the document with the given number.
    #[must_use]
    pub fn chapters_of(&self, number: &str) -> Option<&IndexSet<String>> {
        self.documents
            .iter()
            .find(|(document, _)| document.number().as_str() == number)
            .map(|(_, chapters)| chapters)
    }

    /// Iterates over the documents and their chapters in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (&Document, &IndexSet<String>)> {
        self.documents.iter()
    }

    /// The documents and their chapters, sorted by document number.
    #[must_use]
    pub fn sorted(&self) -> Vec<(&Document, &IndexSet<String>)> {
        let mut entries: Vec<_> = self.documents.iter().collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        entries
    }

    /// Consumes the resolution, returning the underlying map.
    #[must_use]
    pub fn into_inner(self) -> IndexMap<Document, IndexSet<String>> {
        self.documents
    }
}

/// Resolves the documents applicable to a chapter tree.
///
/// `select` decides which requirements take part at all (for example only
/// those selected in a tailoring); `rule` decides whether a document's
/// delivery milestone is due in `phases`. A document is recorded against the
/// chapter owning the requirement that references it.
///
/// The tree is only borrowed, so resolutions over the same tree may run
/// concurrently.
#[instrument(level = "debug", skip_all, fields(chapter = chapter.number(), phases = ?phases))]
pub fn resolve<T, P, R>(
    chapter: &Chapter<T>,
    phases: &BTreeSet<Phase>,
    select: P,
    rule: &R,
) -> Resolution
where
    T: Requirement,
    P: Fn(&T) -> bool,
    R: MilestoneRule + ?Sized,
{
    let mut resolution = Resolution::default();

    for chapter in chapter.chapters() {
        let documents = chapter
            .requirements()
            .iter()
            .filter(|requirement| select(requirement))
            .flat_map(Requirement::documents);

        for document in documents {
            if rule.is_due(document.delivery_milestone(), phases) {
                trace!(
                    document = %document.number(),
                    chapter = chapter.number(),
                    "document applicable"
                );
                resolution.record(document, chapter.number());
            }
        }
    }

    debug!(documents = resolution.len(), "resolved applicable documents");
    resolution
}

/// A [`resolve`] bound to a configured milestone rule.
///
/// The rule is supplied once, at construction, rather than on every call.
#[derive(Debug, Clone)]
pub struct Resolver<R = PhaseMilestones> {
    rule: R,
}

impl Resolver<PhaseMilestones> {
    /// Creates a resolver using the milestone table of a configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(PhaseMilestones::new(config))
    }
}

impl<R: MilestoneRule> Resolver<R> {
    /// Creates a resolver with the given milestone rule.
    #[must_use]
    pub const fn new(rule: R) -> Self {
        Self { rule }
    }

    /// The milestone rule in use.
    #[must_use]
    pub const fn rule(&self) -> &R {
        &self.rule
    }

    /// Resolves the documents applicable to `chapter`, considering only the
    /// requirements for which `select` returns `true`.
    pub fn resolve<T, P>(
        &self,
        chapter: &Chapter<T>,
        phases: &BTreeSet<Phase>,
        select: P,
    ) -> Resolution
    where
        T: Requirement,
        P: Fn(&T) -> bool,
    {
        resolve(chapter, phases, select, &self.rule)
    }

    /// Resolves the documents applicable to `chapter`, considering every
    /// requirement.
    pub fn resolve_all<T: Requirement>(
        &self,
        chapter: &Chapter<T>,
        phases: &BTreeSet<Phase>,
    ) -> Resolution {
        self.resolve(chapter, phases, |_| true)
    }
}
