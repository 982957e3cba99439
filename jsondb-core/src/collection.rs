//! The in-memory collection type.
//!
//! A [`Collection`] is an ordered sequence of [`Document`]s representing one named table.
//! It knows nothing about files; persistence is layered on top of it by
//! [`PersistentCollection`](crate::persistent::PersistentCollection).
//!
//! Insertion order is the only ordering guarantee. Documents are never sorted or
//! deduplicated, and read, update and delete all preserve the relative order of the
//! documents they touch.
//!
//! # Example
//!
//! ```ignore
//! use jsondb_core::{collection::Collection, document::Document};
//!
//! let mut users = Collection::new();
//! users.add(Document::from_iter([("name", "A")]));
//!
//! let found = users.read(Some(&Document::from_iter([("name", "A")])));
//! assert_eq!(found.len(), 1);
//! ```

use serde::{Deserialize, Serialize};

use crate::document::{Document, Filter};

/// An ordered, owned sequence of documents.
///
/// Serialized transparently as a JSON array of flat objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection {
    documents: Vec<Document>,
}

impl Collection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a document to the end of the collection. Returns the collection for chaining.
    pub fn add(&mut self, document: Document) -> &mut Self {
        self.documents.push(document);

        self
    }

    /// Returns every document matching `filter`, in collection order.
    ///
    /// `None` and an empty filter both return the full sequence. The stored documents
    /// are never modified.
    pub fn read(&self, filter: Option<&Filter>) -> Vec<Document> {
        self.matching(filter)
            .cloned()
            .collect()
    }

    /// Merges `patch` into every document matching `filter`, in place.
    ///
    /// Returns the updated documents (only those that matched). No match yields an
    /// empty vector.
    pub fn update(&mut self, patch: &Document, filter: Option<&Filter>) -> Vec<Document> {
        let mut updated = Vec::new();

        for document in self
            .documents
            .iter_mut()
            .filter(|document| is_match(document, filter))
        {
            document.merge(patch);
            updated.push(document.clone());
        }

        updated
    }

    /// Removes every document matching `filter` and returns them in their original order.
    ///
    /// The remaining documents keep their relative order. No match yields an empty vector.
    pub fn delete(&mut self, filter: Option<&Filter>) -> Vec<Document> {
        let (removed, kept): (Vec<Document>, Vec<Document>) = std::mem::take(&mut self.documents)
            .into_iter()
            .partition(|document| is_match(document, filter));

        self.documents = kept;

        removed
    }

    /// Returns the full sequence by reference.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn matching<'a>(&'a self, filter: Option<&'a Filter>) -> impl Iterator<Item = &'a Document> {
        self.documents
            .iter()
            .filter(move |document| is_match(document, filter))
    }
}

fn is_match(document: &Document, filter: Option<&Filter>) -> bool {
    filter.is_none_or(|filter| document.matches(filter))
}

impl From<Vec<Document>> for Collection {
    fn from(documents: Vec<Document>) -> Self {
        Self { documents }
    }
}

impl FromIterator<Document> for Collection {
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        Self {
            documents: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Collection {
    type Item = Document;
    type IntoIter = std::vec::IntoIter<Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Value;

    fn person(name: &str, age: i64) -> Document {
        Document::from_iter([
            ("name", Value::from(name)),
            ("age", Value::from(age)),
        ])
    }

    fn people() -> Collection {
        Collection::from(vec![person("A", 25), person("B", 40), person("C", 40)])
    }

    fn by_age(age: i64) -> Filter {
        Document::from_iter([("age", age)])
    }

    #[test]
    fn add_appends_at_the_end() {
        let mut users = people();
        users
            .add(person("D", 19))
            .add(person("E", 52));

        assert_eq!(users.read(None)[3..], [person("D", 19), person("E", 52)]);
        assert_eq!(users.len(), 5);
    }

    #[test]
    fn read_without_filter_returns_everything() {
        let users = people();

        assert_eq!(users.read(None), users.documents());
        assert_eq!(users.read(Some(&Document::new())), users.documents());
    }

    #[test]
    fn read_filters_by_every_key() {
        let users = people();

        assert_eq!(users.read(Some(&by_age(40))), vec![person("B", 40), person("C", 40)]);
        assert!(users.read(Some(&Document::from_iter([("age", "40")]))).is_empty());
        assert_eq!(users.len(), 3);
    }

    #[test]
    fn update_patches_only_matches() {
        let mut users = people();
        let patch = Document::from_iter([("age", 41)]);

        let updated = users.update(&patch, Some(&Document::from_iter([("name", "B")])));

        assert_eq!(updated, vec![person("B", 41)]);
        assert_eq!(
            users.read(None),
            vec![person("A", 25), person("B", 41), person("C", 40)]
        );
    }

    #[test]
    fn update_without_match_is_empty() {
        let mut users = people();

        assert!(users.update(&by_age(1), Some(&by_age(99))).is_empty());
        assert_eq!(users, people());
    }

    #[test]
    fn update_without_filter_touches_all() {
        let mut users = people();
        let updated = users.update(&Document::from_iter([("active", 1)]), None);

        assert_eq!(updated.len(), 3);
        assert!(users.iter().all(|doc| doc.get("active") == Some(&Value::from(1))));
    }

    #[test]
    fn delete_removes_matches_and_keeps_order() {
        let mut users = people();

        let removed = users.delete(Some(&by_age(40)));

        assert_eq!(removed, vec![person("B", 40), person("C", 40)]);
        assert_eq!(users.read(None), vec![person("A", 25)]);
        assert!(users.read(Some(&by_age(40))).is_empty());
    }

    #[test]
    fn delete_without_filter_empties_collection() {
        let mut users = people();

        assert_eq!(users.delete(None).len(), 3);
        assert!(users.is_empty());
        assert!(users.delete(None).is_empty());
    }
}
