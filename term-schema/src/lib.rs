//! # Term Schema - Schema Discovery for Rust
//!
//! Term Schema inspects an in-memory tabular dataset and infers its relational
//! structure: which column combinations uniquely identify rows (candidate keys
//! and superkeys), which columns are functionally determined by others, and how
//! the table could be decomposed into normalized tables.
//!
//! ## Quick Start
//!
//! ```rust
//! use term_schema::prelude::*;
//!
//! # fn example() -> term_schema::prelude::Result<()> {
//! let dataset = Dataset::new(vec![
//!     Column::new("customer_id", vec![1, 2, 3, 1]),
//!     Column::new("customer_name", vec!["ann", "bob", "cid", "ann"]),
//!     Column::new("order_id", vec![10, 11, 12, 13]),
//! ])?;
//!
//! let result = profile(&dataset, 2, 2)?;
//!
//! assert!(result
//!     .fd_results
//!     .iter()
//!     .any(|fd| fd.lhs_label == "customer_id" && fd.rhs_label == "customer_name"));
//! assert_eq!(result.key_results[0].columns_label, "order_id");
//! assert_eq!(result.key_results[0].key_type_label, "★ Candidate Key");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## How It Works
//!
//! Every run builds a grouping cache that dictionary-encodes the columns and
//! memoizes row partitions per column subset. Both searches share it:
//!
//! - **Functional dependencies** are tested for determinants of increasing
//!   size, skipping dependents with more distinct values than the
//!   determinant has groups. [`profile`] also reports what unique
//!   determinants imply; [`discovery::SchemaProfiler`] skips them unless
//!   asked.
//! - **Keys** are searched from single columns upwards, skipping supersets of
//!   known keys and stopping at the first size that adds nothing new.
//!
//! Null is treated as a value: two rows that are both null in a column agree
//! on that column.
//!
//! Both searches are bounded (`max_combination_size`, `max_lhs_size`); the
//! number of combinations grows as `C(columns, size)`, so wide tables call for
//! small bounds.
//!
//! ## Configuration
//!
//! [`discovery::SchemaProfiler`] exposes the full set of options, including
//! exact counting for wide key combinations and logging verbosity:
//!
//! ```rust
//! use term_schema::prelude::*;
//!
//! # fn example() -> term_schema::prelude::Result<()> {
//! let profiler = SchemaProfiler::builder()
//!     .max_combination_size(3)
//!     .max_lhs_size(1)
//!     .exact_unique_counts(true)
//!     .log_config(LogConfig::production())
//!     .build()?;
//! # let dataset = Dataset::new(vec![Column::new("id", vec![1, 2])])?;
//! let profile = profiler.profile(&dataset)?;
//! println!("{} candidate keys", profile.keys.candidate_keys.len());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Output
//!
//! [`formatters`] renders a [`discovery::ProfileResult`] as JSON, console text
//! or Markdown. [`sources::load_csv`] reads CSV files through Arrow.

pub mod dataset;
pub mod discovery;
pub mod error;
pub mod formatters;
pub mod logging;
pub mod prelude;
pub mod sources;

use dataset::Dataset;
use discovery::{ProfileResult, SchemaProfiler};
use error::Result;

/// Profiles `dataset` with the given bounds and returns display-ready results.
///
/// Dependencies implied by a unique determinant are reported too, so a
/// unique `customer_id` yields `customer_id -> customer_name`. Use
/// [`SchemaProfiler`] directly for the pruned dependency list.
///
/// Returns a configuration error when either bound is below 1.
pub fn profile(
    dataset: &Dataset,
    max_combination_size: usize,
    max_lhs_size: usize,
) -> Result<ProfileResult> {
    let profiler = SchemaProfiler::builder()
        .max_combination_size(max_combination_size)
        .max_lhs_size(max_lhs_size)
        .include_unique_determinants(true)
        .build()?;
    Ok(profiler.profile(dataset)?.to_result())
}
