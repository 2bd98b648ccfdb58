//! The recursive chapter hierarchy of a catalog.
//!
//! A [`Chapter`] owns its child chapters and the requirements that belong
//! directly to it. All navigation is read-only and traverses the tree in
//! pre-order: a chapter comes before its children, and children come in
//! `position` order.

use serde::{Deserialize, Serialize};

use crate::domain::{
    number::{position_of, FormatError},
    Requirement,
};

/// A chapter of a catalog, generic over the requirement type it holds.
///
/// The position is never read from serialized data; it is derived from the
/// number, as in [`Chapter::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "ChapterRecord<T>",
    bound(deserialize = "T: Deserialize<'de>")
)]
pub struct Chapter<T> {
    name: String,
    number: String,
    #[serde(skip_serializing)]
    position: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<Chapter<T>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    requirements: Vec<T>,
}

impl<T> Chapter<T> {
    /// Creates a chapter without children or requirements.
    ///
    /// The position is derived from the last segment of the number.
    ///
    /// # Errors
    ///
    /// Returns a [`FormatError`] if the last segment of `number` is not a
    /// non-negative integer.
    pub fn new(name: impl Into<String>, number: impl Into<String>) -> Result<Self, FormatError> {
        let number = number.into();
        let position = position_of(&number)?;
        Ok(Self {
            name: name.into(),
            number,
            position,
            children: Vec::new(),
            requirements: Vec::new(),
        })
    }

    /// Creates the root chapter of a catalog.
    ///
    /// The root has an empty number and every top-level chapter is one of
    /// its children.
    #[must_use]
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            number: String::new(),
            position: 0,
            children: Vec::new(),
            requirements: Vec::new(),
        }
    }

    /// Replaces the requirements of the chapter.
    #[must_use]
    pub fn with_requirements(mut self, requirements: Vec<T>) -> Self {
        self.requirements = requirements;
        self
    }

    /// The display title of the chapter.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the display title of the chapter.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// The dotted chapter number, e.g. `3.2.1`. Empty for the root.
    #[must_use]
    pub fn number(&self) -> &str {
        &self.number
    }

    /// Whether this is the root chapter of a catalog.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.number.is_empty()
    }

    /// Ordinal position of the chapter among its siblings.
    #[must_use]
    pub const fn position(&self) -> u32 {
        self.position
    }

    /// The child chapters, ordered by position.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// The requirements belonging directly to this chapter.
    #[must_use]
    pub fn requirements(&self) -> &[T] {
        &self.requirements
    }

    /// Mutable access to the requirements belonging directly to this
    /// chapter.
    pub fn requirements_mut(&mut self) -> &mut Vec<T> {
        &mut self.requirements
    }

    pub(crate) fn push_child(&mut self, child: Self) {
        self.children.push(child);
    }

    /// Stable sort, so equal positions keep their insertion order.
    pub(crate) fn sort_children(&mut self) {
        self.children.sort_by_key(Self::position);
    }

    /// Iterates over this chapter and all of its descendants in pre-order.
    ///
    /// Every call starts a fresh traversal.
    #[must_use]
    pub fn chapters(&self) -> Chapters<'_, T> {
        Chapters { stack: vec![self] }
    }

    /// Iterates over the requirements of this chapter and all of its
    /// descendants, chapter by chapter in pre-order.
    pub fn all_requirements(&self) -> impl Iterator<Item = &T> + '_ {
        self.chapters().flat_map(|chapter| chapter.requirements.iter())
    }

    /// Finds the first chapter in pre-order with the given number.
    #[must_use]
    pub fn find_chapter(&self, number: &str) -> Option<&Self> {
        self.chapters().find(|chapter| chapter.number == number)
    }

    /// Finds the first chapter in pre-order with the given number, mutably.
    pub fn find_chapter_mut(&mut self, number: &str) -> Option<&mut Self> {
        if self.number == number {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_chapter_mut(number))
    }

    /// Converts every requirement of the tree, preserving its structure.
    pub fn map<U>(&self, f: &mut impl FnMut(&T) -> U) -> Chapter<U> {
        Chapter {
            name: self.name.clone(),
            number: self.number.clone(),
            position: self.position,
            children: self.children.iter().map(|child| child.map(&mut *f)).collect(),
            requirements: self.requirements.iter().map(&mut *f).collect(),
        }
    }
}

impl<T: Requirement> Chapter<T> {
    /// Finds a requirement of this chapter (not of its descendants) by
    /// position.
    #[must_use]
    pub fn find_requirement(&self, position: &str) -> Option<&T> {
        self.requirements
            .iter()
            .find(|requirement| requirement.position() == position)
    }

    /// Finds a requirement of this chapter (not of its descendants) by
    /// position, mutably.
    pub fn find_requirement_mut(&mut self, position: &str) -> Option<&mut T> {
        self.requirements
            .iter_mut()
            .find(|requirement| requirement.position() == position)
    }

    /// The zero-based index of a requirement of this chapter, by position.
    #[must_use]
    pub fn index_of_requirement(&self, position: &str) -> Option<usize> {
        self.requirements
            .iter()
            .position(|requirement| requirement.position() == position)
    }
}

/// Serialized form of a [`Chapter`].
#[derive(Deserialize)]
struct ChapterRecord<T> {
    name: String,
    number: String,
    #[serde(default = "Vec::new")]
    children: Vec<Chapter<T>>,
    #[serde(default = "Vec::new")]
    requirements: Vec<T>,
}

impl<T> TryFrom<ChapterRecord<T>> for Chapter<T> {
    type Error = FormatError;

    fn try_from(record: ChapterRecord<T>) -> Result<Self, Self::Error> {
        // Only the root has an empty number
        let position = if record.number.is_empty() {
            0
        } else {
            position_of(&record.number)?
        };

        Ok(Self {
            name: record.name,
            number: record.number,
            position,
            children: record.children,
            requirements: record.requirements,
        })
    }
}

/// Pre-order iterator over a chapter and its descendants.
///
/// Returned by [`Chapter::chapters`].
#[derive(Debug, Clone)]
pub struct Chapters<'a, T> {
    stack: Vec<&'a Chapter<T>>,
}

impl<'a, T> Iterator for Chapters<'a, T> {
    type Item = &'a Chapter<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let chapter = self.stack.pop()?;
        // Reversed, so the first child is popped next
        self.stack.extend(chapter.children.iter().rev());
        Some(chapter)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::domain::CatalogRequirement;

    pub(crate) fn chapter(number: &str, positions: &[&str]) -> Chapter<CatalogRequirement> {
        Chapter::new(format!("Chapter {number}"), number)
            .unwrap()
            .with_requirements(
                positions
                    .iter()
                    .map(|position| {
                        CatalogRequirement::new(*position, format!("{number} {position}"))
                    })
                    .collect(),
            )
    }

    /// root
    /// ├── 1 [a, b]
    /// │   ├── 1.1 [a]
    /// │   └── 1.2
    /// │       └── 1.2.1 [a, b]
    /// └── 2 [a]
    fn sample() -> Chapter<CatalogRequirement> {
        let mut c1_2 = chapter("1.2", &[]);
        c1_2.push_child(chapter("1.2.1", &["a", "b"]));

        let mut c1 = chapter("1", &["a", "b"]);
        c1.push_child(chapter("1.1", &["a"]));
        c1.push_child(c1_2);

        let mut root = Chapter::root("Catalog");
        root.push_child(c1);
        root.push_child(chapter("2", &["a"]));
        root
    }

    #[test]
    fn new_derives_position_from_number() {
        let chapter = Chapter::<CatalogRequirement>::new("Scope", "4.12").unwrap();
        assert_eq!(chapter.position(), 12);
        assert_eq!(chapter.number(), "4.12");
        assert!(!chapter.is_root());
    }

    #[test]
    fn new_rejects_malformed_number() {
        let error = Chapter::<CatalogRequirement>::new("Scope", "4.x").unwrap_err();
        assert_eq!(error.number(), "4.x");
    }

    #[test]
    fn chapters_are_pre_order() {
        let root = sample();
        let numbers: Vec<&str> = root.chapters().map(Chapter::number).collect();
        assert_eq!(numbers, vec!["", "1", "1.1", "1.2", "1.2.1", "2"]);
    }

    #[test]
    fn chapters_is_restartable() {
        let root = sample();
        assert_eq!(root.chapters().count(), root.chapters().count());
    }

    #[test]
    fn chapter_numbers_are_unique() {
        let root = sample();
        let mut seen = HashSet::new();
        assert!(root.chapters().all(|chapter| seen.insert(chapter.number())));
    }

    #[test]
    fn chapters_of_subtree_start_with_receiver() {
        let root = sample();
        let sub = root.find_chapter("1.2").unwrap();
        let numbers: Vec<&str> = sub.chapters().map(Chapter::number).collect();
        assert_eq!(numbers, vec!["1.2", "1.2.1"]);
    }

    #[test]
    fn all_requirements_is_union_in_pre_order() {
        let root = sample();
        let texts: Vec<&str> = root.all_requirements().map(Requirement::text).collect();
        assert_eq!(texts, vec!["1 a", "1 b", "1.1 a", "1.2.1 a", "1.2.1 b", "2 a"]);

        let expected: usize = root
            .chapters()
            .map(|chapter| chapter.requirements().len())
            .sum();
        assert_eq!(root.all_requirements().count(), expected);
    }

    #[test]
    fn empty_tree_yields_nothing() {
        let root = Chapter::<CatalogRequirement>::root("Empty");
        assert_eq!(root.chapters().count(), 1);
        assert_eq!(root.all_requirements().count(), 0);
        assert!(root.find_chapter("1").is_none());
        assert!(root.find_requirement("a").is_none());
    }

    #[test]
    fn find_chapter() {
        let root = sample();
        assert_eq!(root.find_chapter("1.2.1").unwrap().number(), "1.2.1");
        assert_eq!(root.find_chapter("").unwrap().name(), "Catalog");
        assert!(root.find_chapter("3").is_none());
        assert!(root.find_chapter("1.2").unwrap().find_chapter("1.1").is_none());
    }

    #[test]
    fn find_chapter_mut() {
        let mut root = sample();
        root.find_chapter_mut("1.2.1").unwrap().set_name("Renamed");
        assert_eq!(root.find_chapter("1.2.1").unwrap().name(), "Renamed");
        assert!(root.find_chapter_mut("9").is_none());
    }

    #[test]
    fn find_requirement_is_local_to_chapter() {
        let root = sample();
        let c1 = root.find_chapter("1").unwrap();

        assert_eq!(c1.find_requirement("b").unwrap().text(), "1 b");
        assert!(c1.find_requirement("c").is_none());
        assert_eq!(c1.index_of_requirement("b"), Some(1));
        assert_eq!(c1.index_of_requirement("c"), None);

        // 1.2 owns no requirements even though 1.2.1 does
        let c1_2 = root.find_chapter("1.2").unwrap();
        assert!(c1_2.find_requirement("a").is_none());
        assert_eq!(c1_2.index_of_requirement("a"), None);
    }

    #[test]
    fn map_preserves_structure() {
        let root = sample();
        let mapped = root.map(&mut |requirement| requirement.text().len());

        let numbers: Vec<&str> = mapped.chapters().map(Chapter::number).collect();
        let original: Vec<&str> = root.chapters().map(Chapter::number).collect();
        assert_eq!(numbers, original);
        assert_eq!(mapped.find_chapter("1.2.1").unwrap().requirements(), &[7, 7]);
    }

    #[test]
    fn serde_treats_missing_lists_as_empty() {
        let yaml = "name: Scope\nnumber: '1'\nposition: 1\n";
        let chapter: Chapter<CatalogRequirement> = serde_yaml::from_str(yaml).unwrap();
        assert!(chapter.children().is_empty());
        assert!(chapter.requirements().is_empty());
    }

    #[test]
    fn serde_derives_position_from_number() {
        let yaml = "name: Scope\nnumber: '4.12'\nposition: 9\n";
        let chapter: Chapter<CatalogRequirement> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(chapter.position(), 12);

        let yaml = "name: Scope\nnumber: '4.x'\n";
        assert!(serde_yaml::from_str::<Chapter<CatalogRequirement>>(yaml).is_err());
    }

    #[test]
    fn serde_accepts_the_root() {
        let yaml = "name: Catalog\nnumber: ''\nchildren:\n  - name: Scope\n    number: '1'\n";
        let root: Chapter<CatalogRequirement> = serde_yaml::from_str(yaml).unwrap();
        assert!(root.is_root());
        assert_eq!(root.children()[0].position(), 1);
    }
}
