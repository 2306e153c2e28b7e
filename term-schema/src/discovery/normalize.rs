//! Decomposition proposals from discovered dependencies.
//!
//! Dependencies are grouped by determinant; each determinant becomes a
//! table keyed by it and holding its dependents. Columns left over are
//! attached to the first candidate key that touches them, or to a
//! synthetic table with a suggested surrogate key.

use std::collections::{BTreeSet, HashMap};

use crate::discovery::types::{ColumnSet, FunctionalDependency, NormalizedTable, PrimaryKey};

/// Proposes normalized tables covering every column in `columns`.
///
/// Tables are returned in proposal order and named `Table_1`, `Table_2`,
/// and so on. Attribute lists follow the order of `columns`.
pub fn propose_tables(
    columns: &[String],
    candidate_keys: &[ColumnSet],
    dependencies: &[FunctionalDependency],
) -> Vec<NormalizedTable> {
    let mut groups: Vec<(ColumnSet, BTreeSet<&str>)> = Vec::new();
    let mut by_determinant: HashMap<Vec<&str>, usize> = HashMap::new();

    for dependency in dependencies {
        let slot = *by_determinant
            .entry(dependency.determinant.sorted())
            .or_insert_with(|| {
                groups.push((dependency.determinant.clone(), BTreeSet::new()));
                groups.len() - 1
            });
        let attributes = &mut groups[slot].1;
        attributes.extend(dependency.determinant.columns().iter().map(String::as_str));
        attributes.insert(dependency.dependent.as_str());
    }

    let mut tables = Vec::new();
    let mut used: BTreeSet<&str> = BTreeSet::new();

    for (determinant, attributes) in &groups {
        used.extend(attributes.iter().copied());
        tables.push((
            PrimaryKey::Columns(determinant.clone()),
            ordered(columns, |c| attributes.contains(c)),
        ));
    }

    let remaining: Vec<String> = columns
        .iter()
        .filter(|c| !used.contains(c.as_str()))
        .cloned()
        .collect();

    if !remaining.is_empty() {
        match candidate_keys.iter().find(|key| key.intersects(&remaining)) {
            Some(key) => tables.push((
                PrimaryKey::Columns(key.clone()),
                ordered(columns, |c| remaining.iter().any(|r| r == c) || key.contains(c)),
            )),
            None => tables.push((PrimaryKey::Surrogate, remaining)),
        }
    }

    tables
        .into_iter()
        .enumerate()
        .map(|(i, (primary_key, attributes))| NormalizedTable {
            name: format!("Table_{}", i + 1),
            primary_key,
            attributes,
        })
        .collect()
}

fn ordered(columns: &[String], keep: impl Fn(&str) -> bool) -> Vec<String> {
    columns.iter().filter(|c| keep(c)).cloned().collect()
}
