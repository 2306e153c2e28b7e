//! Candidate key search and key classification.
//!
//! The search walks column combinations by increasing size:
//!
//! 1. A single column is a key when its distinct count equals the row count.
//! 2. For larger sizes, any combination containing an already known key is
//!    skipped (it can only be a superkey); the rest are tested by counting
//!    distinct value-tuples through the [`GroupingCache`].
//! 3. Once at least one key is known, the search stops at the first size
//!    that produced no new key.
//!
//! Discovered keys are then split into minimal candidate keys and
//! superkeys by [`classify_keys`].

use std::time::Instant;

use itertools::Itertools;
use tracing::{debug, instrument};

use crate::dataset::Dataset;
use crate::discovery::partition::GroupingCache;
use crate::discovery::types::{ColumnSet, KeyDiscovery};
use crate::error::{Result, SchemaError};
use crate::logging::LogConfig;
use crate::{log_search, log_summary};

/// Arena of discovered keys answering subset-containment queries.
///
/// Keys are stored as sorted column-index lists in discovery order.
#[derive(Debug, Clone, Default)]
pub struct KeyIndex {
    keys: Vec<Vec<usize>>,
}

impl KeyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a key. The columns need not be sorted.
    pub fn insert(&mut self, columns: &[usize]) {
        let mut key = columns.to_vec();
        key.sort_unstable();
        if !self.keys.contains(&key) {
            self.keys.push(key);
        }
    }

    /// Returns `true` if some recorded key is a subset of `columns`,
    /// equal sets included.
    pub fn covers(&self, columns: &[usize]) -> bool {
        self.keys
            .iter()
            .any(|key| key.iter().all(|c| columns.contains(c)))
    }

    /// Returns `true` if some recorded key is a proper subset of `columns`.
    pub fn covers_strictly(&self, columns: &[usize]) -> bool {
        self.keys
            .iter()
            .any(|key| key.len() < columns.len() && key.iter().all(|c| columns.contains(c)))
    }

    /// Returns `true` if exactly this set was recorded.
    pub fn contains(&self, columns: &[usize]) -> bool {
        let mut key = columns.to_vec();
        key.sort_unstable();
        self.keys.contains(&key)
    }

    pub fn keys(&self) -> &[Vec<usize>] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Searches column combinations for unique row identifiers.
#[derive(Debug, Clone)]
pub struct KeyFinder {
    max_combination_size: usize,
    log: LogConfig,
}

impl KeyFinder {
    /// Creates a finder bounded to combinations of `max_combination_size`
    /// columns.
    pub fn new(max_combination_size: usize) -> Self {
        Self {
            max_combination_size,
            log: LogConfig::default(),
        }
    }

    pub fn with_log_config(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }

    /// Runs the search, returning the raw index of discovered keys.
    ///
    /// An empty dataset has no keys.
    #[instrument(skip_all, fields(max_combination_size = self.max_combination_size))]
    pub fn search(&self, cache: &mut GroupingCache) -> KeyIndex {
        let start = Instant::now();
        let n_rows = cache.n_rows();
        let n_columns = cache.n_columns();
        let mut index = KeyIndex::new();

        if n_rows == 0 || n_columns == 0 {
            debug!("Empty dataset, skipping key search");
            return index;
        }

        let single_keys: Vec<usize> = (0..n_columns)
            .filter(|&c| cache.distinct_count(c) == n_rows)
            .collect();
        for &column in &single_keys {
            index.insert(&[column]);
        }
        debug!(size = 1, keys = single_keys.len(), "Tested single columns");

        if self.max_combination_size > 1 {
            for size in 2..=self.max_combination_size.min(n_columns) {
                let mut found = 0;
                for combo in (0..n_columns).combinations(size) {
                    if combo.iter().any(|c| single_keys.contains(c)) || index.covers(&combo) {
                        continue;
                    }
                    let unique = cache.unique_count(&combo);
                    log_search!(self.log, size, ?combo, unique, "Tested key combination");
                    if unique == n_rows {
                        index.insert(&combo);
                        found += 1;
                    }
                }
                debug!(size, keys = found, "Tested key combinations");

                if found == 0 && !index.is_empty() {
                    debug!(size, "No new keys at this size, stopping key search");
                    break;
                }
            }
        }

        log_summary!(
            self.log,
            keys = index.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Completed key search"
        );
        index
    }

    /// Runs the search and classifies the result.
    pub fn find(&self, cache: &mut GroupingCache) -> KeyDiscovery {
        let index = self.search(cache);
        let names = cache.names();
        let all_keys: Vec<ColumnSet> = index
            .keys()
            .iter()
            .map(|key| ColumnSet::new(key.iter().map(|&c| names[c].as_str())))
            .collect();
        classify_keys(all_keys)
    }
}

/// Splits discovered keys into minimal candidate keys and superkeys.
///
/// A key is a candidate key when no other discovered key is a proper
/// subset of it. Discovery order is preserved in both lists.
pub fn classify_keys(all_keys: Vec<ColumnSet>) -> KeyDiscovery {
    let (candidate_keys, superkeys): (Vec<ColumnSet>, Vec<ColumnSet>) =
        all_keys.iter().cloned().partition(|key| {
            !all_keys
                .iter()
                .any(|other| other.is_proper_subset_of(key))
        });

    KeyDiscovery {
        all_keys,
        candidate_keys,
        superkeys,
    }
}

/// Finds keys of `dataset` with combinations of up to
/// `max_combination_size` columns.
pub fn find_keys(dataset: &Dataset, max_combination_size: usize) -> Result<KeyDiscovery> {
    if max_combination_size < 1 {
        return Err(SchemaError::configuration(
            "max_combination_size must be at least 1",
        ));
    }
    let mut cache = GroupingCache::new(dataset);
    Ok(KeyFinder::new(max_combination_size).find(&mut cache))
}
