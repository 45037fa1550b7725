#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::panic)]
#![forbid(unsafe_code)]

//! # oxiquery: a pull-based query execution engine
//!
//! `oxiquery` evaluates relational operator trees over in-memory relations
//! using the Volcano iterator model:
//! - every physical operator implements [`ExecutionOperator`]
//! - callers build trees bottom-up and pull rows from the root
//! - Sort and NestedLoopJoin materialize their inputs in an explicit `open` phase
//! - filters stream with a single row of lookahead
//!
//! ```
//! use oxiquery::api::{Dataset, QueryBuilder};
//!
//! let data = Dataset::sample();
//! let rows = QueryBuilder::scan(data.relation("movies")?)
//!     .join(QueryBuilder::scan(data.relation("ratings")?), 0, 0)
//!     .execute()?;
//! assert_eq!(rows.len(), 3);
//! # Ok::<(), oxiquery::OxiqueryError>(())
//! ```

pub mod api;
pub mod core;

// Re-export key types for easier use by library consumers
pub use crate::core::common::types::{DataType, Row, RowSet, Value};
pub use crate::core::common::OxiqueryError;
pub use crate::core::config::Config;
pub use crate::core::execution::{collect_rows, explain, ExecutionOperator, RowIter};

/// Core result type for the library
pub type Result<T> = std::result::Result<T, OxiqueryError>;

/// Builds a [`Row`] from a list of expressions convertible into [`Value`].
///
/// ```
/// use oxiquery::{row, Value};
///
/// let r = row![1, "The Matrix", 1999];
/// assert_eq!(r.get(1), Some(&Value::Text("The Matrix".to_string())));
/// ```
#[macro_export]
macro_rules! row {
    ($($value:expr),* $(,)?) => {
        $crate::core::common::types::Row::new(vec![$($crate::core::common::types::Value::from($value)),*])
    };
}
