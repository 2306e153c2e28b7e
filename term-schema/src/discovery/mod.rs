//! Schema discovery: functional dependencies, keys and normalization.
//!
//! The components run leaf-first over one shared [`GroupingCache`]:
//!
//! - [`partition`]: memoized row partitions by column subset
//! - [`dependencies`]: bounded functional dependency search
//! - [`keys`]: candidate key search and key classification
//! - [`report`]: sorted key report with exact or estimated counts
//! - [`normalize`]: decomposition proposals from dependencies and keys
//! - [`profiler`]: orchestration and the display-ready [`ProfileResult`]
//!
//! [`naive`] holds an unpruned reference implementation for cross-checks.

pub mod dependencies;
pub mod keys;
pub mod naive;
pub mod normalize;
pub mod partition;
pub mod profiler;
pub mod report;
pub mod types;

pub use dependencies::{find_functional_dependencies, DependencyFinder};
pub use keys::{classify_keys, find_keys, KeyFinder, KeyIndex};
pub use normalize::propose_tables;
pub use partition::{GroupingCache, Partition};
pub use profiler::{
    FdRow, KeyRow, ProfileResult, ProfilerConfig, SchemaProfile, SchemaProfiler,
    SchemaProfilerBuilder, TableRow,
};
pub use report::{sort_key_profiles, KeyReportBuilder};
pub use types::{
    ColumnSet, FunctionalDependency, KeyClassification, KeyDiscovery, KeyProfile, NormalizedTable,
    PrimaryKey,
};
