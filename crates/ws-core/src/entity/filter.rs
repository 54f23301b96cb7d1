//! Filter state with "empty equals unset" semantics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Reserved filter key carrying the free-text search term.
pub const SEARCH_KEY: &str = "search";

/// Map of filter key to value.
///
/// A key holding an empty string is equivalent to the key being absent:
/// lookups, active-filter counting, query serialization and equality all
/// treat the two the same way.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterState(BTreeMap<String, String>);

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_defaults(defaults: &BTreeMap<String, String>) -> Self {
        Self(defaults.clone())
    }

    /// Returns the value of `key`, or `None` when absent or empty.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) {
        self.0.remove(key);
    }

    pub fn is_active(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn search(&self) -> Option<&str> {
        self.get(SEARCH_KEY)
    }

    /// Stores a trimmed search term; a blank term removes the key entirely.
    pub fn set_search(&mut self, term: &str) {
        let term = term.trim();
        if term.is_empty() {
            self.clear_search();
        } else {
            self.set(SEARCH_KEY, term);
        }
    }

    pub fn clear_search(&mut self) {
        self.remove(SEARCH_KEY);
    }

    /// Number of filters with a value, not counting the search term.
    pub fn active_count(&self) -> usize {
        self.active().filter(|(key, _)| *key != SEARCH_KEY).count()
    }

    /// Non-empty entries in key order.
    pub fn active(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Query pairs for the non-search filters, empty values dropped.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.active()
            .filter(|(key, _)| *key != SEARCH_KEY)
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }
}

impl PartialEq for FilterState {
    fn eq(&self, other: &Self) -> bool {
        self.active().eq(other.active())
    }
}

impl Eq for FilterState {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_value_is_equivalent_to_absent_key() {
        let mut with_empty = FilterState::new();
        with_empty.set("status", "");
        let absent = FilterState::new();

        assert_eq!(with_empty, absent);
        assert_eq!(with_empty.get("status"), None);
        assert!(!with_empty.is_active("status"));
        assert_eq!(with_empty.active_count(), absent.active_count());
        assert_eq!(with_empty.query_pairs(), absent.query_pairs());
    }

    #[test]
    fn active_count_ignores_search_and_empty_values() {
        let mut filters = FilterState::new();
        filters.set("status", "active");
        filters.set("owner", "");
        filters.set_search("john");
        assert_eq!(filters.active_count(), 1);
    }

    #[test]
    fn blank_search_removes_key() {
        let mut filters = FilterState::new();
        filters.set_search("john");
        assert_eq!(filters.search(), Some("john"));
        filters.set_search("   ");
        assert_eq!(filters.search(), None);
        assert!(!filters.0.contains_key(SEARCH_KEY));
    }

    #[test]
    fn query_pairs_exclude_search_and_keep_key_order() {
        let mut filters = FilterState::new();
        filters.set("type", "b2b");
        filters.set("status", "active");
        filters.set_search("acme");
        assert_eq!(
            filters.query_pairs(),
            vec![
                ("status".to_string(), "active".to_string()),
                ("type".to_string(), "b2b".to_string()),
            ]
        );
    }
}
