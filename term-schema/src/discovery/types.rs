//! Shared result types for schema discovery.

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// An ordered, deduplicated set of column names.
///
/// Two column sets are equal when they hold the same names in any order;
/// display keeps the construction order, joined with `", "`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSet {
    columns: Vec<String>,
}

impl ColumnSet {
    /// Creates a column set, dropping repeated names after their first use.
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        let mut seen = BTreeSet::new();
        let columns = columns
            .into_iter()
            .map(Into::<String>::into)
            .filter(|c| seen.insert(c.clone()))
            .collect();
        Self { columns }
    }

    /// Returns the names in iteration order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Returns the names sorted, which is the identity of the set.
    pub fn sorted(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.columns.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns `true` if every column of `self` is in `other`.
    pub fn is_subset_of(&self, other: &ColumnSet) -> bool {
        self.columns.iter().all(|c| other.contains(c))
    }

    /// Returns `true` if `self` is a subset of `other` and strictly smaller.
    pub fn is_proper_subset_of(&self, other: &ColumnSet) -> bool {
        self.len() < other.len() && self.is_subset_of(other)
    }

    /// Returns `true` if any of `columns` belongs to the set.
    pub fn intersects(&self, columns: &[String]) -> bool {
        columns.iter().any(|c| self.contains(c))
    }
}

impl PartialEq for ColumnSet {
    fn eq(&self, other: &Self) -> bool {
        self.sorted() == other.sorted()
    }
}

impl Eq for ColumnSet {}

impl Hash for ColumnSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sorted().hash(state);
    }
}

impl fmt::Display for ColumnSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.columns.join(", "))
    }
}

/// `determinant -> dependent`: rows that agree on the determinant agree on
/// the dependent, nulls compared as ordinary values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionalDependency {
    pub determinant: ColumnSet,
    pub dependent: String,
}

impl FunctionalDependency {
    pub fn new(determinant: ColumnSet, dependent: impl Into<String>) -> Self {
        Self {
            determinant,
            dependent: dependent.into(),
        }
    }
}

impl fmt::Display for FunctionalDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.determinant, self.dependent)
    }
}

/// How a column combination relates to uniqueness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyClassification {
    /// Unique, and no discovered key is a proper subset.
    CandidateKey,
    /// Unique, but some discovered key is a proper subset.
    Superkey,
    /// Not unique.
    None,
}

impl KeyClassification {
    pub fn is_key(self) -> bool {
        !matches!(self, KeyClassification::None)
    }

    /// Display label used in profile results.
    pub fn label(self) -> &'static str {
        match self {
            KeyClassification::CandidateKey => "★ Candidate Key",
            KeyClassification::Superkey => "⊃ Superkey",
            KeyClassification::None => "",
        }
    }
}

/// Output of the candidate key search, each list in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyDiscovery {
    pub all_keys: Vec<ColumnSet>,
    pub candidate_keys: Vec<ColumnSet>,
    pub superkeys: Vec<ColumnSet>,
}

/// One row of the key report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyProfile {
    pub columns: ColumnSet,
    pub unique_count: usize,
    pub uniqueness_ratio: f64,
    pub classification: KeyClassification,
    /// `false` when `unique_count` is an estimate rather than a count.
    pub exact: bool,
}

/// Primary key of a proposed table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrimaryKey {
    /// Backed by real columns.
    Columns(ColumnSet),
    /// No column backs the key; a surrogate should be introduced.
    Surrogate,
}

impl PrimaryKey {
    pub const SURROGATE_LABEL: &'static str = "surrogate_id (suggested)";

    pub fn label(&self) -> String {
        match self {
            PrimaryKey::Columns(columns) => columns.to_string(),
            PrimaryKey::Surrogate => Self::SURROGATE_LABEL.to_string(),
        }
    }
}

/// A table proposed by the normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedTable {
    pub name: String,
    pub primary_key: PrimaryKey,
    /// Attribute names in dataset column order.
    pub attributes: Vec<String>,
}
