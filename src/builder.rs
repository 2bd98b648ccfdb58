//! Assembly of a chapter tree from flat, number-keyed chapter records.
//!
//! Importers hand over one record per chapter, each already owning its
//! direct requirements. The [`TreeBuilder`] infers every chapter's parent
//! from its dotted number and produces a single rooted tree in which the
//! children of every chapter are sorted by position, regardless of the order
//! the records arrived in.

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument, trace, warn};

use crate::domain::{
    number::{depth_of, parent_number_of, position_of},
    Chapter, FormatError,
};

/// Errors that can occur when assembling a chapter tree.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum BuildError {
    /// A chapter number is malformed.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// The parent of a chapter is not among the records.
    #[error("Dangling chapter '{number}': parent chapter '{parent}' does not exist")]
    DanglingChapter {
        /// Number of the chapter that could not be attached.
        number: String,
        /// Number of the missing parent chapter.
        parent: String,
    },

    /// Two records share a chapter number.
    #[error("Duplicate chapter '{0}'")]
    DuplicateChapter(String),

    /// A record's key differs from the number of the chapter it holds.
    #[error("Chapter '{number}' is recorded under the number '{key}'")]
    KeyMismatch {
        /// The key the record was supplied under.
        key: String,
        /// The number of the chapter itself.
        number: String,
    },
}

impl BuildError {
    /// The number of the chapter that caused the error.
    #[must_use]
    pub fn number(&self) -> &str {
        match self {
            Self::Format(error) => error.number(),
            Self::DanglingChapter { number, .. } | Self::KeyMismatch { number, .. } => number,
            Self::DuplicateChapter(number) => number,
        }
    }
}

/// Collects chapter records and assembles them under a root chapter.
///
/// The builder owns the partially built structure, so it cannot be shared
/// while construction is under way. The finished tree is an ordinary
/// [`Chapter`] that can be read from anywhere.
#[derive(Debug)]
pub struct TreeBuilder<T> {
    root: Chapter<T>,
    chapters: Vec<Chapter<T>>,
    numbers: HashSet<String>,
}

impl<T> TreeBuilder<T> {
    /// Starts a tree under the given root chapter.
    #[must_use]
    pub fn new(root: Chapter<T>) -> Self {
        Self {
            root,
            chapters: Vec::new(),
            numbers: HashSet::new(),
        }
    }

    /// Adds a chapter record.
    ///
    /// The parent does not need to have been added yet; parents are resolved
    /// by [`build`](Self::build).
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Format`] if the chapter number is malformed
    /// (including the empty number of a root chapter), or
    /// [`BuildError::DuplicateChapter`] if a chapter with the same number
    /// was already added.
    pub fn insert(&mut self, chapter: Chapter<T>) -> Result<(), BuildError> {
        position_of(chapter.number())?;

        if !self.numbers.insert(chapter.number().to_string()) {
            warn!(number = chapter.number(), "duplicate chapter");
            return Err(BuildError::DuplicateChapter(chapter.number().to_string()));
        }

        self.chapters.push(chapter);
        Ok(())
    }

    /// The number of chapter records added so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    /// Whether no chapter records have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    /// Assembles the tree.
    ///
    /// Chapters without a separator in their number become children of the
    /// root; every other chapter becomes a child of the chapter whose number
    /// is its own with the last segment removed. Children are sorted by
    /// position at every level; chapters with equal positions keep the order
    /// they were added in.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::DanglingChapter`] for the first chapter (in
    /// insertion order) whose parent was never added.
    #[instrument(level = "debug", skip(self), fields(chapters = self.chapters.len()))]
    pub fn build(self) -> Result<Chapter<T>, BuildError> {
        let Self {
            mut root,
            mut chapters,
            numbers,
        } = self;

        for chapter in &chapters {
            if let Some(parent) = parent_number_of(chapter.number()) {
                if !numbers.contains(parent) {
                    warn!(number = chapter.number(), parent, "dangling chapter");
                    return Err(BuildError::DanglingChapter {
                        number: chapter.number().to_string(),
                        parent: parent.to_string(),
                    });
                }
            }
        }

        // Deepest chapters first, so every chapter is complete before it is
        // handed to its parent. The sort is stable, which keeps siblings in
        // insertion order until they are sorted by position.
        chapters.sort_by_key(|chapter| std::cmp::Reverse(depth_of(chapter.number())));

        // Children waiting for their parent, keyed by the parent's number.
        // Top-level chapters wait under the root's number.
        let mut pending: HashMap<String, Vec<Chapter<T>>> = HashMap::new();

        for mut chapter in chapters {
            for child in pending.remove(chapter.number()).into_iter().flatten() {
                chapter.push_child(child);
            }
            chapter.sort_children();

            let parent = parent_number_of(chapter.number())
                .unwrap_or_else(|| root.number())
                .to_string();
            trace!(number = chapter.number(), %parent, "attaching chapter");
            pending.entry(parent).or_default().push(chapter);
        }

        for child in pending.remove(root.number()).into_iter().flatten() {
            root.push_child(child);
        }
        root.sort_children();

        debug!(top_level = root.children().len(), "chapter tree assembled");
        Ok(root)
    }
}

/// Assembles a tree from a mapping of chapter number to chapter record.
///
/// This is a convenience over [`TreeBuilder`] for callers that already hold
/// the full set of records.
///
/// # Errors
///
/// Returns [`BuildError::KeyMismatch`] if a key differs from the number of
/// its chapter, and otherwise any error of [`TreeBuilder::insert`] or
/// [`TreeBuilder::build`].
pub fn build_tree<T, I>(root: Chapter<T>, records: I) -> Result<Chapter<T>, BuildError>
where
    I: IntoIterator<Item = (String, Chapter<T>)>,
{
    let mut builder = TreeBuilder::new(root);
    for (key, chapter) in records {
        if key != chapter.number() {
            return Err(BuildError::KeyMismatch {
                key,
                number: chapter.number().to_string(),
            });
        }
        builder.insert(chapter)?;
    }
    builder.build()
}
