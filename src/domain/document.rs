//! Document Requirement Definitions (DRDs).
//!
//! A DRD describes a deliverable document that one or more requirements ask
//! for, together with the review milestone at which it is due.

use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    ops::Deref,
};

use non_empty_string::NonEmptyString;
use serde::{Deserialize, Serialize};

/// The identifier of a DRD within a catalog, e.g. `05.01`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentNumber(NonEmptyString);

/// Error returned when a DRD number is empty.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("DRD number must not be empty")]
pub struct EmptyDocumentNumber;

impl DocumentNumber {
    /// Creates a new DRD number.
    ///
    /// Surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyDocumentNumber`] if nothing but whitespace is left.
    pub fn new(number: impl Into<String>) -> Result<Self, EmptyDocumentNumber> {
        let number: String = number.into();
        NonEmptyString::new(number.trim().to_string())
            .map(Self)
            .map_err(|_| EmptyDocumentNumber)
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for DocumentNumber {
    type Error = EmptyDocumentNumber;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for DocumentNumber {
    type Error = EmptyDocumentNumber;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DocumentNumber> for String {
    fn from(value: DocumentNumber) -> Self {
        value.0.into_inner()
    }
}

impl Deref for DocumentNumber {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl fmt::Display for DocumentNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Ord for DocumentNumber {
    /// Shorter numbers sort first; numbers of equal length compare
    /// case-insensitively, falling back to a byte-wise comparison so that the
    /// ordering agrees with equality.
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b) = (self.as_str(), other.as_str());
        a.len()
            .cmp(&b.len())
            .then_with(|| {
                a.chars()
                    .flat_map(char::to_lowercase)
                    .cmp(b.chars().flat_map(char::to_lowercase))
            })
            .then_with(|| a.cmp(b))
    }
}

impl PartialOrd for DocumentNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A Document Requirement Definition.
///
/// Two documents are the same document if they share a [`DocumentNumber`];
/// the remaining fields are descriptive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    number: DocumentNumber,
    title: String,
    delivery_milestone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    action: Option<String>,
}

impl Document {
    /// Creates a new document.
    #[must_use]
    pub fn new(
        number: DocumentNumber,
        title: impl Into<String>,
        delivery_milestone: impl Into<String>,
    ) -> Self {
        Self {
            number,
            title: title.into(),
            delivery_milestone: delivery_milestone.into(),
            action: None,
        }
    }

    /// Sets the free-text action associated with the delivery.
    #[must_use]
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// The identifier of the document.
    #[must_use]
    pub const fn number(&self) -> &DocumentNumber {
        &self.number
    }

    /// The title of the document.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The code of the milestone at which the document is delivered, e.g.
    /// `PDR`.
    #[must_use]
    pub fn delivery_milestone(&self) -> &str {
        &self.delivery_milestone
    }

    /// The action expected at delivery (for approval, for review, ...).
    #[must_use]
    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.number == other.number
    }
}

impl Eq for Document {}

impl Hash for Document {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.number.hash(state);
    }
}

impl Ord for Document {
    fn cmp(&self, other: &Self) -> Ordering {
        self.number.cmp(&other.number)
    }
}

impl PartialOrd for Document {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use test_case::test_case;

    use super::*;

    fn number(s: &str) -> DocumentNumber {
        DocumentNumber::new(s).unwrap()
    }

    #[test]
    fn empty_number_is_rejected() {
        assert_eq!(DocumentNumber::new("   "), Err(EmptyDocumentNumber));
        assert_eq!(DocumentNumber::new(""), Err(EmptyDocumentNumber));
    }

    #[test]
    fn number_is_trimmed() {
        assert_eq!(number(" 05.01 ").as_str(), "05.01");
    }

    #[test_case("9", "10"; "shorter first")]
    #[test_case("05.01", "05.02"; "same length")]
    #[test_case("a1", "B1"; "case insensitive")]
    #[test_case("B1", "b1"; "case tie broken byte wise")]
    fn ordering(lesser: &str, greater: &str) {
        assert!(number(lesser) < number(greater));
        assert!(number(greater) > number(lesser));
    }

    #[test]
    fn sorting_uses_length_first() {
        let mut numbers = vec![number("100"), number("20"), number("3"), number("10")];
        numbers.sort();
        let sorted: Vec<&str> = numbers.iter().map(DocumentNumber::as_str).collect();
        assert_eq!(sorted, vec!["3", "10", "20", "100"]);
    }

    #[test]
    fn documents_are_identified_by_number() {
        let a = Document::new(number("05.01"), "Plan", "SRR");
        let b = Document::new(number("05.01"), "Another title", "PDR").with_action("approval");
        let c = Document::new(number("05.02"), "Plan", "SRR");

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn deserializes_from_yaml() {
        let yaml = "number: '05.01'\ntitle: Management plan\ndelivery_milestone: SRR\n";
        let document: Document = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(document.number().as_str(), "05.01");
        assert_eq!(document.delivery_milestone(), "SRR");
        assert_eq!(document.action(), None);
    }

    #[test]
    fn empty_number_fails_to_deserialize() {
        let yaml = "number: ''\ntitle: Plan\ndelivery_milestone: SRR\n";
        assert!(serde_yaml::from_str::<Document>(yaml).is_err());
    }
}
