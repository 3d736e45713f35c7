// File: src/core/encoder.rs
use crate::core::types::EncodedId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Maps titles to dense integer ids and back.
///
/// The first fit assigns ids in sorted title order. Titles seen afterwards are
/// appended behind the existing labels (sorted among themselves), so an id
/// handed out once never changes for the life of the encoder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SafeLabelEncoder {
    classes: Vec<String>,
    index: HashMap<String, EncodedId>,
}

impl SafeLabelEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Known labels, indexed by id.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Fits on `titles` and returns the id of every input, in input order.
    /// Duplicate titles share one id. Calling it again with a superset keeps
    /// the ids already assigned and appends the new labels.
    pub fn fit_transform<S: AsRef<str>>(&mut self, titles: &[S]) -> Vec<EncodedId> {
        self.register(titles.iter().map(|t| t.as_ref()));
        titles
            .iter()
            .map(|t| self.index[t.as_ref()])
            .collect()
    }

    /// Pure lookup. Never mutates the label set.
    pub fn try_encode(&self, title: &str) -> Option<EncodedId> {
        self.index.get(title).copied()
    }

    /// Pure batch lookup; `None` if any title is unknown.
    pub fn try_transform<S: AsRef<str>>(&self, titles: &[S]) -> Option<Vec<EncodedId>> {
        titles.iter().map(|t| self.try_encode(t.as_ref())).collect()
    }

    /// Returns the id for `title`, minting a new one if it has never been seen.
    pub fn register_and_encode(&mut self, title: &str) -> EncodedId {
        if let Some(id) = self.try_encode(title) {
            return id;
        }
        self.register(std::iter::once(title));
        self.index[title]
    }

    /// Batch encode that absorbs unseen labels instead of rejecting them.
    ///
    /// Side effect: any title not yet known is added to the label set, which
    /// is why this takes `&mut self`. Use [`Self::try_transform`] for a
    /// read-only lookup.
    pub fn transform<S: AsRef<str>>(&mut self, titles: &[S]) -> Vec<EncodedId> {
        if let Some(ids) = self.try_transform(titles) {
            return ids;
        }
        let before = self.len();
        let ids = self.fit_transform(titles);
        tracing::warn!(
            new_labels = self.len() - before,
            "transform encountered unseen titles; label set extended"
        );
        ids
    }

    /// The title an id was assigned to.
    pub fn decode(&self, id: EncodedId) -> Option<&str> {
        self.classes.get(id).map(String::as_str)
    }

    fn register<'a>(&mut self, titles: impl Iterator<Item = &'a str>) {
        // BTreeSet gives us the unseen labels deduplicated and sorted.
        let unseen: BTreeSet<&str> = titles.filter(|t| !self.index.contains_key(*t)).collect();
        for title in unseen {
            self.index.insert(title.to_string(), self.classes.len());
            self.classes.push(title.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_assigns_sorted_ids_in_input_order() {
        let mut enc = SafeLabelEncoder::new();
        let ids = enc.fit_transform(&["Heat", "Alien", "Casino"]);
        assert_eq!(ids, vec![2, 0, 1]);
        assert_eq!(enc.classes(), &["Alien", "Casino", "Heat"]);
    }

    #[test]
    fn duplicate_titles_collapse_to_one_id() {
        let mut enc = SafeLabelEncoder::new();
        let ids = enc.fit_transform(&["Heat", "Alien", "Heat"]);
        assert_eq!(ids, vec![1, 0, 1]);
        assert_eq!(enc.len(), 2);
    }

    #[test]
    fn try_encode_does_not_mutate() {
        let mut enc = SafeLabelEncoder::new();
        enc.fit_transform(&["Alien"]);
        assert_eq!(enc.try_encode("Brazil"), None);
        assert_eq!(enc.try_transform(&["Alien", "Brazil"]), None);
        assert_eq!(enc.len(), 1);
    }

    #[test]
    fn unseen_titles_get_new_ids_without_disturbing_old_ones() {
        let mut enc = SafeLabelEncoder::new();
        enc.fit_transform(&["Casino", "Heat"]);

        let ids = enc.transform(&["Heat", "Zodiac", "Alien"]);
        // Existing ids are stable; new labels are appended sorted among themselves.
        assert_eq!(ids, vec![1, 3, 2]);
        assert_eq!(enc.try_encode("Casino"), Some(0));
        assert_eq!(enc.decode(2), Some("Alien"));
        assert_eq!(enc.decode(3), Some("Zodiac"));
    }

    #[test]
    fn refit_with_superset_succeeds() {
        let mut enc = SafeLabelEncoder::new();
        enc.fit_transform(&["B", "A"]);
        let ids = enc.fit_transform(&["A", "B", "C"]);
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn register_and_encode_is_idempotent() {
        let mut enc = SafeLabelEncoder::new();
        let first = enc.register_and_encode("Memento");
        let second = enc.register_and_encode("Memento");
        assert_eq!(first, second);
        assert_eq!(enc.len(), 1);
    }
}
