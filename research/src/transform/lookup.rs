//! Lookup tables for the left joins in the pipeline.
//!
//! Each [`Lookup`] holds de-duplicated `(key, title)` pairs in a fixed order.
//! A key with several titles joins to several rows, in that order; a key
//! with none joins to a single row with a missing title.

use crate::cip::{cip2_of, is_cip6};
use crate::models::{DirectoryEntry, TaxonomyEntry};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Ordered, de-duplicated `(key, title)` pairs indexed by key.
#[derive(Debug, Clone, Default)]
pub struct Lookup<K> {
    pairs: Vec<(K, String)>,
    index: HashMap<K, Vec<usize>>,
}

impl<K: Clone + Eq + Hash> Lookup<K> {
    /// Build from pairs, keeping the first occurrence of each pair.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, String)>,
    {
        let mut seen = HashSet::new();
        let unique: Vec<(K, String)> = pairs
            .into_iter()
            .filter(|pair| seen.insert(pair.clone()))
            .collect();
        Self::indexed(unique)
    }

    fn indexed(pairs: Vec<(K, String)>) -> Self {
        let mut index: HashMap<K, Vec<usize>> = HashMap::new();
        for (i, (key, _)) in pairs.iter().enumerate() {
            index.entry(key.clone()).or_default().push(i);
        }
        Self { pairs, index }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[(K, String)] {
        &self.pairs
    }

    /// Number of distinct keys.
    pub fn key_count(&self) -> usize {
        self.index.len()
    }

    /// Left-join semantics: every title for `key`, or a single `None`.
    pub fn join(&self, key: Option<&K>) -> Vec<Option<&str>> {
        match key.and_then(|k| self.index.get(k)) {
            Some(rows) => rows
                .iter()
                .map(|&i| Some(self.pairs[i].1.as_str()))
                .collect(),
            None => vec![None],
        }
    }
}

impl<K: Clone + Eq + Hash + Ord> Lookup<K> {
    /// Stable sort by key.
    pub fn sorted_by_key(self) -> Self {
        let mut pairs = self.pairs;
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        Self::indexed(pairs)
    }
}

/// CIP2 family → family name, sorted by family code.
pub fn cip2_lookup(taxonomy: &[TaxonomyEntry]) -> Lookup<String> {
    Lookup::from_pairs(taxonomy.iter().filter_map(|entry| {
        let code = entry.cipcode.as_deref()?;
        Some((cip2_of(code), entry.family.clone()?))
    }))
    .sorted_by_key()
}

/// Full six-digit CIP code → program title.
pub fn cip6_lookup(taxonomy: &[TaxonomyEntry]) -> Lookup<String> {
    Lookup::from_pairs(taxonomy.iter().filter_map(|entry| {
        let code = entry.cipcode.clone()?;
        let title = entry.title.clone()?;
        is_cip6(&code).then_some((code, title))
    }))
}

/// UNITID → institution name. Entries without an id or a name are skipped,
/// so an unnamed institution joins as `None`.
pub fn directory_lookup(directory: &[DirectoryEntry]) -> Lookup<i64> {
    Lookup::from_pairs(directory.iter().filter_map(|entry| {
        Some((entry.unitid?, entry.institution.clone()?))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(code: &str, title: &str, family: &str) -> TaxonomyEntry {
        TaxonomyEntry {
            cipcode: Some(code.to_string()),
            title: Some(title.to_string()),
            family: Some(family.to_string()),
        }
    }

    fn taxonomy() -> Vec<TaxonomyEntry> {
        vec![
            entry(
                "11",
                "Computer and Information Sciences and Support Services.",
                "Computer Sciences",
            ),
            entry("11.07", "Computer Science.", "Computer Sciences"),
            entry("11.0701", "Computer Science.", "Computer Sciences"),
            entry("01.0101", "Agricultural Business and Management, General.", "Agriculture"),
            entry("01.0101", "Agricultural Business and Management, General.", "Agriculture"),
            TaxonomyEntry {
                cipcode: Some("52.0201".into()),
                title: None,
                family: None,
            },
        ]
    }

    #[test]
    fn test_cip2_lookup_dedups_and_sorts() {
        let lookup = cip2_lookup(&taxonomy());
        let keys: Vec<&str> = lookup.pairs().iter().map(|(k, _)| k.as_str()).collect();

        assert_eq!(keys, vec!["01", "11"]);
        assert_eq!(lookup.join(Some(&"11".to_string())), vec![Some("Computer Sciences")]);
    }

    #[test]
    fn test_cip6_lookup_keeps_only_six_digit_codes() {
        let lookup = cip6_lookup(&taxonomy());

        assert_eq!(lookup.len(), 2);
        assert_eq!(lookup.join(Some(&"11.0701".to_string())), vec![Some("Computer Science.")]);
        assert_eq!(lookup.join(Some(&"11.07".to_string())), vec![None]);
        assert_eq!(lookup.join(Some(&"52.0201".to_string())), vec![None]);
    }

    #[test]
    fn test_join_missing_key() {
        let lookup = cip6_lookup(&taxonomy());
        assert_eq!(lookup.join(None), vec![None]);
    }

    #[test]
    fn test_join_expands_multiple_titles_in_order() {
        let lookup = Lookup::from_pairs(vec![
            (1_i64, "First".to_string()),
            (2, "Other".to_string()),
            (1, "Second".to_string()),
            (1, "First".to_string()),
        ]);

        assert_eq!(lookup.len(), 3);
        assert_eq!(lookup.key_count(), 2);
        assert_eq!(lookup.join(Some(&1)), vec![Some("First"), Some("Second")]);
    }

    #[test]
    fn test_sort_is_stable() {
        let lookup = Lookup::from_pairs(vec![
            ("14".to_string(), "Engineering B".to_string()),
            ("01".to_string(), "Agriculture".to_string()),
            ("14".to_string(), "Engineering A".to_string()),
        ])
        .sorted_by_key();

        assert_eq!(
            lookup.join(Some(&"14".to_string())),
            vec![Some("Engineering B"), Some("Engineering A")]
        );
    }

    fn named(unitid: Option<i64>, name: &str) -> DirectoryEntry {
        DirectoryEntry {
            unitid,
            institution: Some(name.to_string()),
        }
    }

    #[test]
    fn test_directory_lookup() {
        let directory = vec![
            named(Some(151351), "Indiana University-Bloomington"),
            named(Some(151351), "Indiana University-Bloomington"),
            named(None, "Orphan"),
            DirectoryEntry {
                unitid: Some(171100),
                institution: None,
            },
        ];
        let lookup = directory_lookup(&directory);

        assert_eq!(lookup.len(), 1);
        assert_eq!(lookup.join(Some(&151351)), vec![Some("Indiana University-Bloomington")]);
        assert_eq!(lookup.join(Some(&171100)), vec![None]);
        assert_eq!(lookup.join(Some(&240444)), vec![None]);
    }
}
