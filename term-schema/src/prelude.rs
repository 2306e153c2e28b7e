//! Prelude for commonly used types and traits in term-schema.

pub use crate::dataset::{Column, Dataset, Value};
pub use crate::discovery::{
    ColumnSet, FunctionalDependency, KeyClassification, ProfileResult, ProfilerConfig,
    SchemaProfile, SchemaProfiler,
};
pub use crate::error::{Result, SchemaError};
pub use crate::formatters::{FormatterConfig, ResultFormatter};
pub use crate::logging::LogConfig;
pub use crate::profile;
