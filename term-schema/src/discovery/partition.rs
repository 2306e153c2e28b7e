//! Row partitions and the per-run grouping cache.
//!
//! A [`Partition`] groups row indices by the distinct value-tuples of a
//! column subset. The [`GroupingCache`] builds partitions on demand and
//! memoizes them by the sorted column tuple, so the FD finder, the key
//! finder and the report builder all reuse the same grouping work.
//!
//! Columns are dictionary-encoded once when the cache is created. Null is
//! encoded like any other value, which makes all-null rows fall into one
//! cell rather than into one cell per row.

use std::collections::HashMap;
use std::sync::Arc;

use crate::dataset::{Dataset, Value};

/// Rows grouped by identical determinant values.
///
/// Cells are ordered by the first row that appears in them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    cells: Vec<Vec<usize>>,
}

impl Partition {
    /// Builds a partition from per-row group codes.
    fn from_row_keys<K: std::hash::Hash + Eq>(keys: impl Iterator<Item = K>) -> Self {
        let mut index: HashMap<K, usize> = HashMap::new();
        let mut cells: Vec<Vec<usize>> = Vec::new();
        for (row, key) in keys.enumerate() {
            let cell = *index.entry(key).or_insert_with(|| {
                cells.push(Vec::new());
                cells.len() - 1
            });
            cells[cell].push(row);
        }
        Self { cells }
    }

    /// Returns the cells, each a list of row indices in ascending order.
    pub fn cells(&self) -> &[Vec<usize>] {
        &self.cells
    }

    /// Number of distinct value-tuples.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` when every row sits in its own cell.
    pub fn is_all_singletons(&self) -> bool {
        self.cells.iter().all(|cell| cell.len() == 1)
    }

    /// Returns `true` if `codes` holds a single value within every cell.
    pub fn determines(&self, codes: &[u32]) -> bool {
        self.cells.iter().all(|cell| match cell.split_first() {
            Some((first, rest)) => {
                let expected = codes[*first];
                rest.iter().all(|row| codes[*row] == expected)
            }
            None => true,
        })
    }
}

/// Memoizes partitions for one profiling run.
///
/// A cache borrows nothing from its dataset after construction and is not
/// shared between runs: every call to the profiler creates its own.
#[derive(Debug)]
pub struct GroupingCache {
    names: Vec<String>,
    codes: Vec<Vec<u32>>,
    distinct_counts: Vec<usize>,
    n_rows: usize,
    partitions: HashMap<Vec<usize>, Arc<Partition>>,
    hits: usize,
    misses: usize,
}

impl GroupingCache {
    /// Encodes every column of `dataset` and starts with an empty cache.
    pub fn new(dataset: &Dataset) -> Self {
        let mut codes = Vec::with_capacity(dataset.n_columns());
        let mut distinct_counts = Vec::with_capacity(dataset.n_columns());

        for column in dataset.columns() {
            let (encoded, distinct) = encode(column.values());
            codes.push(encoded);
            distinct_counts.push(distinct);
        }

        Self {
            names: dataset.column_names(),
            codes,
            distinct_counts,
            n_rows: dataset.n_rows(),
            partitions: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.names.len()
    }

    /// Column names in dataset order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Dictionary codes of one column, one per row.
    pub fn codes(&self, column: usize) -> &[u32] {
        &self.codes[column]
    }

    /// Distinct values in one column, null counted as a value.
    pub fn distinct_count(&self, column: usize) -> usize {
        self.distinct_counts[column]
    }

    /// Returns the partition of rows by the given columns.
    ///
    /// The column order does not matter; results are memoized by the
    /// sorted index tuple.
    pub fn partition_by(&mut self, columns: &[usize]) -> Arc<Partition> {
        let mut key = columns.to_vec();
        key.sort_unstable();
        key.dedup();

        if let Some(partition) = self.partitions.get(&key) {
            self.hits += 1;
            return Arc::clone(partition);
        }
        self.misses += 1;

        let partition = Arc::new(match key.as_slice() {
            [single] => {
                let codes = &self.codes[*single];
                Partition::from_row_keys(codes.iter().copied())
            }
            _ => {
                let codes = &self.codes;
                Partition::from_row_keys(
                    (0..self.n_rows).map(|row| key.iter().map(|&c| codes[c][row]).collect::<Vec<_>>()),
                )
            }
        });

        self.partitions.insert(key, Arc::clone(&partition));
        partition
    }

    /// Number of distinct value-tuples over the given columns.
    pub fn unique_count(&mut self, columns: &[usize]) -> usize {
        self.partition_by(columns).cell_count()
    }

    /// Number of memoized partitions.
    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    /// Lookups answered from the cache.
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Lookups that had to build a partition.
    pub fn misses(&self) -> usize {
        self.misses
    }
}

/// Dictionary-encodes values in first-appearance order, returning the codes
/// and the number of distinct values.
fn encode(values: &[Value]) -> (Vec<u32>, usize) {
    let mut dictionary: HashMap<&Value, u32> = HashMap::new();
    let codes = values
        .iter()
        .map(|value| {
            let next = dictionary.len() as u32;
            *dictionary.entry(value).or_insert(next)
        })
        .collect();
    (codes, dictionary.len())
}
