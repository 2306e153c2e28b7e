//! Orchestration of a full schema discovery run.
//!
//! A [`SchemaProfiler`] owns a validated [`ProfilerConfig`]. Each call to
//! [`SchemaProfiler::profile`] builds a fresh [`GroupingCache`], shares it
//! between the dependency and key searches, then derives the key report and
//! the normalization proposal. Nothing survives between calls.
//!
//! ## Example
//!
//! ```rust
//! use term_schema::dataset::{Column, Dataset};
//! use term_schema::discovery::SchemaProfiler;
//!
//! # fn example() -> term_schema::error::Result<()> {
//! let dataset = Dataset::new(vec![
//!     Column::new("customer_id", vec![1, 2, 3, 4]),
//!     Column::new("city", vec!["Oslo", "Oslo", "Rome", "Rome"]),
//! ])?;
//!
//! let profiler = SchemaProfiler::builder()
//!     .max_combination_size(2)
//!     .max_lhs_size(1)
//!     .build()?;
//!
//! let profile = profiler.profile(&dataset)?;
//! assert_eq!(profile.keys.candidate_keys.len(), 1);
//!
//! let result = profile.to_result();
//! assert_eq!(result.key_results[0].key_type_label, "★ Candidate Key");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::dataset::Dataset;
use crate::discovery::dependencies::DependencyFinder;
use crate::discovery::keys::KeyFinder;
use crate::discovery::normalize::propose_tables;
use crate::discovery::partition::GroupingCache;
use crate::discovery::report::KeyReportBuilder;
use crate::discovery::types::{FunctionalDependency, KeyDiscovery, KeyProfile, NormalizedTable};
use crate::error::{Result, SchemaError};
use crate::logging::{truncate_field, LogConfig};
use crate::perf_debug;

/// Search bounds and reporting options for a profiling run.
#[derive(Debug, Clone)]
pub struct ProfilerConfig {
    /// Largest column combination tested for uniqueness
    pub max_combination_size: usize,
    /// Largest determinant tested for functional dependencies
    pub max_lhs_size: usize,
    /// Count every report row exactly instead of estimating wide combinations
    pub exact_unique_counts: bool,
    /// Report dependencies implied by unique determinants
    pub include_unique_determinants: bool,
    /// Logging behaviour of the searches
    pub log: LogConfig,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            max_combination_size: 2,
            max_lhs_size: 2,
            exact_unique_counts: false,
            include_unique_determinants: false,
            log: LogConfig::default(),
        }
    }
}

impl ProfilerConfig {
    /// Checks that both search bounds are at least 1.
    pub fn validate(&self) -> Result<()> {
        if self.max_combination_size < 1 {
            return Err(SchemaError::configuration(format!(
                "max_combination_size must be at least 1, got {}",
                self.max_combination_size
            )));
        }
        if self.max_lhs_size < 1 {
            return Err(SchemaError::configuration(format!(
                "max_lhs_size must be at least 1, got {}",
                self.max_lhs_size
            )));
        }
        Ok(())
    }
}

/// Builder for SchemaProfiler
#[derive(Debug, Clone, Default)]
pub struct SchemaProfilerBuilder {
    config: ProfilerConfig,
}

impl SchemaProfilerBuilder {
    /// Set the largest column combination tested for uniqueness
    pub fn max_combination_size(mut self, size: usize) -> Self {
        self.config.max_combination_size = size;
        self
    }

    /// Set the largest determinant tested for functional dependencies
    pub fn max_lhs_size(mut self, size: usize) -> Self {
        self.config.max_lhs_size = size;
        self
    }

    /// Count every report row exactly
    pub fn exact_unique_counts(mut self, exact: bool) -> Self {
        self.config.exact_unique_counts = exact;
        self
    }

    /// Report dependencies whose determinant is itself unique
    pub fn include_unique_determinants(mut self, include: bool) -> Self {
        self.config.include_unique_determinants = include;
        self
    }

    /// Set the logging configuration
    pub fn log_config(mut self, log: LogConfig) -> Self {
        self.config.log = log;
        self
    }

    /// Build the SchemaProfiler, rejecting invalid bounds
    pub fn build(self) -> Result<SchemaProfiler> {
        self.config.validate()?;
        Ok(SchemaProfiler {
            config: self.config,
        })
    }
}

/// Runs dependency, key and normalization discovery over a dataset.
#[derive(Debug, Clone, Default)]
pub struct SchemaProfiler {
    config: ProfilerConfig,
}

impl SchemaProfiler {
    /// Create a new builder for SchemaProfiler
    pub fn builder() -> SchemaProfilerBuilder {
        SchemaProfilerBuilder::default()
    }

    /// Create a SchemaProfiler with default bounds
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing configuration. Bounds are checked on each run.
    pub fn with_config(config: ProfilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProfilerConfig {
        &self.config
    }

    /// Profiles `dataset`.
    ///
    /// Fails only on invalid bounds. A dataset without rows yields empty
    /// dependency, key and table lists.
    #[instrument(skip_all, fields(
        n_rows = dataset.n_rows(),
        n_columns = dataset.n_columns(),
        max_combination_size = self.config.max_combination_size,
        max_lhs_size = self.config.max_lhs_size,
    ))]
    pub fn profile(&self, dataset: &Dataset) -> Result<SchemaProfile> {
        self.config.validate()?;
        let start = Instant::now();
        let columns = dataset.column_names();

        info!(
            columns = %truncate_field(&columns.join(", "), self.config.log.max_field_length),
            "Starting schema discovery"
        );

        let mut cache = GroupingCache::new(dataset);

        let dependencies = DependencyFinder::new(self.config.max_lhs_size)
            .include_unique_determinants(self.config.include_unique_determinants)
            .with_log_config(self.config.log.clone())
            .find(&mut cache);

        let keys = KeyFinder::new(self.config.max_combination_size)
            .with_log_config(self.config.log.clone())
            .find(&mut cache);

        let key_profiles = KeyReportBuilder::new(self.config.max_combination_size)
            .exact_unique_counts(self.config.exact_unique_counts)
            .build(&mut cache, &keys);

        let normalized_tables = if dataset.n_rows() == 0 {
            debug!("No rows, skipping normalization");
            Vec::new()
        } else {
            propose_tables(&columns, &keys.candidate_keys, &dependencies)
        };

        perf_debug!(
            self.config.log,
            partitions = cache.len(),
            hits = cache.hits(),
            misses = cache.misses(),
            "Grouping cache usage"
        );

        let elapsed_ms = start.elapsed().as_millis() as u64;
        info!(
            dependencies = dependencies.len(),
            candidate_keys = keys.candidate_keys.len(),
            tables = normalized_tables.len(),
            elapsed_ms,
            "Completed schema discovery"
        );

        Ok(SchemaProfile {
            n_rows: dataset.n_rows(),
            columns,
            max_combination_size: self.config.max_combination_size,
            max_lhs_size: self.config.max_lhs_size,
            dependencies,
            keys,
            key_profiles,
            normalized_tables,
            elapsed_ms,
        })
    }
}

/// Typed outcome of a profiling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaProfile {
    pub n_rows: usize,
    pub columns: Vec<String>,
    pub max_combination_size: usize,
    pub max_lhs_size: usize,
    pub dependencies: Vec<FunctionalDependency>,
    pub keys: KeyDiscovery,
    /// Sorted key report rows
    pub key_profiles: Vec<KeyProfile>,
    pub normalized_tables: Vec<NormalizedTable>,
    pub elapsed_ms: u64,
}

impl SchemaProfile {
    /// Renders the profile into display labels.
    pub fn to_result(&self) -> ProfileResult {
        ProfileResult {
            fd_results: self
                .dependencies
                .iter()
                .map(|fd| FdRow {
                    lhs_label: fd.determinant.to_string(),
                    rhs_label: fd.dependent.clone(),
                })
                .collect(),
            key_results: self
                .key_profiles
                .iter()
                .map(|row| KeyRow {
                    columns_label: row.columns.to_string(),
                    unique_count: row.unique_count,
                    uniqueness_ratio_label: format!("{:.2}%", row.uniqueness_ratio * 100.0),
                    key_type_label: row.classification.label().to_string(),
                })
                .collect(),
            n_rows: self.n_rows,
            columns: self.columns.clone(),
            max_combination_size: self.max_combination_size,
            max_lhs_size: self.max_lhs_size,
            normalized_tables: self
                .normalized_tables
                .iter()
                .map(|table| TableRow {
                    table_name: table.name.clone(),
                    primary_key_label: table.primary_key.label(),
                    attributes: table.attributes.clone(),
                })
                .collect(),
        }
    }
}

/// A functional dependency as display labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FdRow {
    pub lhs_label: String,
    pub rhs_label: String,
}

/// A key report row as display labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRow {
    pub columns_label: String,
    pub unique_count: usize,
    pub uniqueness_ratio_label: String,
    pub key_type_label: String,
}

/// A proposed table as display labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub table_name: String,
    pub primary_key_label: String,
    pub attributes: Vec<String>,
}

/// Read-only profiling result consumed by presentation layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileResult {
    pub fd_results: Vec<FdRow>,
    pub key_results: Vec<KeyRow>,
    pub n_rows: usize,
    pub columns: Vec<String>,
    pub max_combination_size: usize,
    pub max_lhs_size: usize,
    pub normalized_tables: Vec<TableRow>,
}
