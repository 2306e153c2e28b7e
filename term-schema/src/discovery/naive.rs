//! Unpruned reference implementation used to cross-check discovery.
//!
//! Every determinant is tested against every dependent and every
//! combination is counted, grouping raw [`Value`] tuples without encoding
//! or memoization. It is quadratic in the number of combinations and meant
//! for tests and benchmarks, not for production profiling.
//!
//! The optimized search differs from this one in exactly one respect: by
//! default it never reports a dependency whose determinant is itself unique.
//! Key labels agree for every combination the optimized report counts
//! exactly.

use std::collections::{HashMap, HashSet};

use itertools::Itertools;

use crate::dataset::{Dataset, Value};
use crate::discovery::types::{ColumnSet, FunctionalDependency, KeyClassification};

/// Returns every `lhs -> rhs` with `|lhs| <= max_lhs_size` that holds in
/// `dataset`, unique determinants included.
pub fn functional_dependencies(dataset: &Dataset, max_lhs_size: usize) -> Vec<FunctionalDependency> {
    let columns = dataset.columns();
    let mut found = Vec::new();
    if dataset.n_rows() == 0 || columns.len() < 2 {
        return found;
    }

    for size in 1..=max_lhs_size {
        for lhs in (0..columns.len()).combinations(size) {
            for rhs in 0..columns.len() {
                if lhs.contains(&rhs) {
                    continue;
                }
                let mut seen: HashMap<Vec<&Value>, &Value> = HashMap::new();
                let holds = (0..dataset.n_rows()).all(|row| {
                    let key: Vec<&Value> = lhs.iter().map(|&c| &columns[c].values()[row]).collect();
                    let value = &columns[rhs].values()[row];
                    *seen.entry(key).or_insert(value) == value
                });
                if holds {
                    found.push(FunctionalDependency::new(
                        ColumnSet::new(lhs.iter().map(|&c| columns[c].name())),
                        columns[rhs].name(),
                    ));
                }
            }
        }
    }
    found
}

/// Number of distinct value-tuples over `names`.
pub fn unique_count(dataset: &Dataset, names: &ColumnSet) -> usize {
    let columns: Vec<&[Value]> = names
        .columns()
        .iter()
        .filter_map(|name| dataset.column(name).ok().map(|c| c.values()))
        .collect();
    (0..dataset.n_rows())
        .map(|row| columns.iter().map(|values| &values[row]).collect::<Vec<_>>())
        .collect::<HashSet<_>>()
        .len()
}

/// Returns `true` if no two rows agree on every column of `names`.
pub fn is_unique(dataset: &Dataset, names: &ColumnSet) -> bool {
    unique_count(dataset, names) == dataset.n_rows()
}

/// Classifies every combination of up to `max_combination_size` columns,
/// in enumeration order.
///
/// A unique combination is a superkey when one of its proper subsets is
/// unique, and a candidate key otherwise.
pub fn key_classifications(
    dataset: &Dataset,
    max_combination_size: usize,
) -> Vec<(ColumnSet, KeyClassification)> {
    if dataset.n_rows() == 0 {
        return Vec::new();
    }
    let names = dataset.column_names();

    let combos: Vec<ColumnSet> = (1..=max_combination_size.min(names.len()))
        .flat_map(|size| (0..names.len()).combinations(size))
        .map(|combo| ColumnSet::new(combo.iter().map(|&c| names[c].as_str())))
        .collect();

    let unique: Vec<bool> = combos.iter().map(|c| is_unique(dataset, c)).collect();

    combos
        .iter()
        .zip(&unique)
        .map(|(combo, &is_key)| {
            let classification = if !is_key {
                KeyClassification::None
            } else if (1..combo.len()).any(|size| {
                combo
                    .columns()
                    .iter()
                    .combinations(size)
                    .any(|subset| is_unique(dataset, &ColumnSet::new(subset.into_iter().cloned())))
            }) {
                KeyClassification::Superkey
            } else {
                KeyClassification::CandidateKey
            };
            (combo.clone(), classification)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Column;

    #[test]
    fn test_naive_includes_unique_determinants() {
        let dataset = Dataset::new(vec![
            Column::new("id", vec![1, 2, 3]),
            Column::new("value", vec!["a", "b", "a"]),
        ])
        .unwrap();

        let fds = functional_dependencies(&dataset, 1);
        assert_eq!(
            fds,
            vec![FunctionalDependency::new(ColumnSet::new(["id"]), "value")]
        );
    }

    #[test]
    fn test_naive_null_grouping() {
        let dataset = Dataset::new(vec![
            Column::new("a", vec![None, None, Some(1)]),
            Column::new("b", vec![Some(1), Some(2), Some(3)]),
        ])
        .unwrap();

        assert_eq!(unique_count(&dataset, &ColumnSet::new(["a"])), 2);
        let fds = functional_dependencies(&dataset, 1);
        assert!(!fds.contains(&FunctionalDependency::new(ColumnSet::new(["a"]), "b")));
    }

    #[test]
    fn test_naive_key_classifications() {
        let dataset = Dataset::new(vec![
            Column::new("id", vec![1, 2, 3]),
            Column::new("x", vec![1, 1, 2]),
            Column::new("y", vec![1, 2, 1]),
        ])
        .unwrap();

        let labels = key_classifications(&dataset, 2);
        let lookup = |cols: &[&str]| {
            labels
                .iter()
                .find(|(c, _)| *c == ColumnSet::new(cols.iter().copied()))
                .map(|(_, k)| *k)
                .unwrap()
        };
        assert_eq!(lookup(&["id"]), KeyClassification::CandidateKey);
        assert_eq!(lookup(&["x"]), KeyClassification::None);
        assert_eq!(lookup(&["id", "x"]), KeyClassification::Superkey);
        assert_eq!(lookup(&["x", "y"]), KeyClassification::CandidateKey);
    }
}
