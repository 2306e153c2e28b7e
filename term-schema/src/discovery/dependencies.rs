//! Functional dependency discovery.
//!
//! For every determinant size `s` in `1..=max_lhs_size`:
//!
//! - At `s == 1` only columns with fewer distinct values than rows are tried
//!   as determinants; a unique column determines everything trivially.
//! - A determinant whose partition has one row per cell is skipped.
//! - A dependent with more distinct values than the determinant has cells
//!   cannot be determined and is skipped without scanning rows.
//! - Otherwise `D -> R` holds when every cell of `D` carries a single value
//!   of `R`, nulls compared as values.
//!
//! Results come out ordered by determinant size, then combination order,
//! then dependent column order.
//!
//! [`DependencyFinder::include_unique_determinants`] lifts the first two
//! rules, reporting every dependency a unique determinant implies.

use std::time::Instant;

use itertools::Itertools;
use tracing::{debug, instrument};

use crate::dataset::Dataset;
use crate::discovery::partition::GroupingCache;
use crate::discovery::types::{ColumnSet, FunctionalDependency};
use crate::error::{Result, SchemaError};
use crate::logging::LogConfig;
use crate::{log_search, log_summary};

/// Searches for functional dependencies with bounded determinant size.
#[derive(Debug, Clone)]
pub struct DependencyFinder {
    max_lhs_size: usize,
    include_unique_determinants: bool,
    log: LogConfig,
}

impl DependencyFinder {
    pub fn new(max_lhs_size: usize) -> Self {
        Self {
            max_lhs_size,
            include_unique_determinants: false,
            log: LogConfig::default(),
        }
    }

    /// Also reports dependencies whose determinant has one row per value.
    pub fn include_unique_determinants(mut self, include: bool) -> Self {
        self.include_unique_determinants = include;
        self
    }

    pub fn with_log_config(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }

    /// Returns dependencies as `(determinant indices, dependent index)`.
    #[instrument(skip_all, fields(max_lhs_size = self.max_lhs_size))]
    pub fn search(&self, cache: &mut GroupingCache) -> Vec<(Vec<usize>, usize)> {
        let start = Instant::now();
        let n_rows = cache.n_rows();
        let n_columns = cache.n_columns();
        let mut found = Vec::new();

        if n_rows == 0 || n_columns < 2 {
            debug!(n_rows, n_columns, "Degenerate dataset, skipping FD search");
            return found;
        }

        let non_unique: Vec<usize> = (0..n_columns)
            .filter(|&c| self.include_unique_determinants || cache.distinct_count(c) < n_rows)
            .collect();
        let all_columns: Vec<usize> = (0..n_columns).collect();

        // A determinant spanning every column leaves nothing to determine.
        for size in 1..=self.max_lhs_size.min(n_columns - 1) {
            let candidates = if size == 1 { &non_unique } else { &all_columns };
            let before = found.len();
            let mut skipped = 0usize;

            for determinant in candidates.iter().copied().combinations(size) {
                let partition = cache.partition_by(&determinant);
                if partition.is_all_singletons() && !self.include_unique_determinants {
                    skipped += 1;
                    continue;
                }

                for dependent in 0..n_columns {
                    if determinant.contains(&dependent)
                        || cache.distinct_count(dependent) > partition.cell_count()
                    {
                        continue;
                    }
                    if partition.determines(cache.codes(dependent)) {
                        log_search!(self.log, ?determinant, dependent, "Found dependency");
                        found.push((determinant.clone(), dependent));
                    }
                }
            }

            debug!(
                size,
                dependencies = found.len() - before,
                unique_determinants = skipped,
                "Tested determinants"
            );
        }

        log_summary!(
            self.log,
            dependencies = found.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Completed functional dependency search"
        );
        found
    }

    /// Runs the search and names the results.
    pub fn find(&self, cache: &mut GroupingCache) -> Vec<FunctionalDependency> {
        let raw = self.search(cache);
        let names = cache.names();
        raw.into_iter()
            .map(|(determinant, dependent)| {
                FunctionalDependency::new(
                    ColumnSet::new(determinant.iter().map(|&c| names[c].as_str())),
                    names[dependent].as_str(),
                )
            })
            .collect()
    }
}

/// Finds functional dependencies of `dataset` whose determinant has at most
/// `max_lhs_size` columns.
pub fn find_functional_dependencies(
    dataset: &Dataset,
    max_lhs_size: usize,
) -> Result<Vec<FunctionalDependency>> {
    if max_lhs_size < 1 {
        return Err(SchemaError::configuration("max_lhs_size must be at least 1"));
    }
    let mut cache = GroupingCache::new(dataset);
    Ok(DependencyFinder::new(max_lhs_size).find(&mut cache))
}
