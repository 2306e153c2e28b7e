//! Key report: one row per column combination, most informative first.
//!
//! Unique counts are exact for combinations of one or two columns, for
//! discovered keys, and for supersets of a discovered key (which inherit
//! uniqueness). Other combinations get an estimate, the average distinct
//! count of their columns capped at the row count, unless exact counting
//! is requested.
//!
//! A unique row is a superkey when a candidate key, or an exactly counted
//! unique row of smaller size, is a proper subset of it.
//!
//! Rows are sorted keys first, then by uniqueness ratio descending, then
//! by combination size ascending; ties keep enumeration order.

use std::cmp::Ordering;

use itertools::Itertools;
use tracing::instrument;

use crate::discovery::keys::KeyIndex;
use crate::discovery::partition::GroupingCache;
use crate::discovery::types::{ColumnSet, KeyClassification, KeyDiscovery, KeyProfile};

/// Builds key report rows from a grouping cache and a key discovery.
#[derive(Debug, Clone)]
pub struct KeyReportBuilder {
    max_combination_size: usize,
    exact_unique_counts: bool,
}

impl KeyReportBuilder {
    pub fn new(max_combination_size: usize) -> Self {
        Self {
            max_combination_size,
            exact_unique_counts: false,
        }
    }

    /// Counts every combination exactly instead of estimating large ones.
    pub fn exact_unique_counts(mut self, exact: bool) -> Self {
        self.exact_unique_counts = exact;
        self
    }

    #[instrument(skip_all, fields(max_combination_size = self.max_combination_size))]
    pub fn build(&self, cache: &mut GroupingCache, keys: &KeyDiscovery) -> Vec<KeyProfile> {
        let n_rows = cache.n_rows();
        let n_columns = cache.n_columns();
        if n_rows == 0 || n_columns == 0 {
            return Vec::new();
        }

        let names = cache.names().to_vec();
        let discovered = key_index(&names, &keys.all_keys);
        // Grows with every exactly counted unique row, smaller sizes first.
        let mut known = key_index(&names, &keys.candidate_keys);

        let mut rows = Vec::new();
        for size in 1..=self.max_combination_size.min(n_columns) {
            for combo in (0..n_columns).combinations(size) {
                let (unique_count, exact) =
                    if size <= 2 || discovered.contains(&combo) || self.exact_unique_counts {
                        (cache.unique_count(&combo), true)
                    } else if known.covers(&combo) {
                        (n_rows, true)
                    } else {
                        (estimate_unique_count(cache, &combo), false)
                    };

                let classification = if unique_count != n_rows {
                    KeyClassification::None
                } else if known.covers_strictly(&combo) {
                    KeyClassification::Superkey
                } else {
                    KeyClassification::CandidateKey
                };
                if exact && unique_count == n_rows {
                    known.insert(&combo);
                }

                rows.push(KeyProfile {
                    columns: ColumnSet::new(combo.iter().map(|&c| names[c].as_str())),
                    unique_count,
                    uniqueness_ratio: unique_count as f64 / n_rows as f64,
                    classification,
                    exact,
                });
            }
        }

        sort_key_profiles(&mut rows);
        rows
    }
}

/// Indexes named keys by column position, dropping unknown names.
fn key_index(names: &[String], keys: &[ColumnSet]) -> KeyIndex {
    let mut index = KeyIndex::new();
    for key in keys {
        let columns: Vec<usize> = key
            .columns()
            .iter()
            .filter_map(|column| names.iter().position(|name| name == column))
            .collect();
        if columns.len() == key.len() {
            index.insert(&columns);
        }
    }
    index
}

/// Average per-column distinct count, never above the row count.
fn estimate_unique_count(cache: &GroupingCache, combo: &[usize]) -> usize {
    if combo.is_empty() {
        return 0;
    }
    let total: usize = combo.iter().map(|&c| cache.distinct_count(c)).sum();
    (total / combo.len()).min(cache.n_rows())
}

/// Sorts keys first, then uniqueness ratio descending, then size ascending.
pub fn sort_key_profiles(rows: &mut [KeyProfile]) {
    rows.sort_by(|a, b| {
        b.classification
            .is_key()
            .cmp(&a.classification.is_key())
            .then_with(|| {
                b.uniqueness_ratio
                    .partial_cmp(&a.uniqueness_ratio)
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| a.columns.len().cmp(&b.columns.len()))
    });
}
