// src/api/builder.rs
//! Fluent construction of operator trees.

use crate::core::common::types::{Row, RowSet, Value};
use crate::core::common::OxiqueryError;
use crate::core::config::Config;
use crate::core::execution::operators::{NestedLoopJoin, PredicateFilter, SeqScan, Sort};
use crate::core::execution::{collect_rows, explain, BoxedOperator, ExecutionOperator, Predicate};
use std::sync::Arc;

/// Assembles an operator tree bottom-up.
///
/// Each step wraps the current root in a new operator. Invalid filter
/// operators are rejected while building, before any row is read.
///
/// ```
/// use oxiquery::api::{Dataset, QueryBuilder};
///
/// let data = Dataset::sample();
/// let rows = QueryBuilder::scan(data.relation("movies")?)
///     .filter(2, ">=", 2003)?
///     .sort(1)
///     .execute()?;
/// assert_eq!(rows.len(), 2);
/// # Ok::<(), oxiquery::OxiqueryError>(())
/// ```
pub struct QueryBuilder {
    root: BoxedOperator,
    max_materialized_rows: Option<usize>,
}

impl QueryBuilder {
    /// Starts a query with a sequential scan of `relation`.
    #[must_use]
    pub fn scan(relation: Arc<RowSet>) -> Self {
        Self::from_operator(Box::new(SeqScan::over(relation)))
    }

    #[must_use]
    pub fn from_operator(root: BoxedOperator) -> Self {
        Self { root, max_materialized_rows: None }
    }

    /// Applies `config`'s materialization limit to every Sort and Join added after this call.
    #[must_use]
    pub fn with_config(mut self, config: &Config) -> Self {
        self.max_materialized_rows = config.max_materialized_rows;
        self
    }

    /// # Errors
    ///
    /// Returns `OxiqueryError::InvalidOperator` if `symbol` is not a supported comparison.
    pub fn filter(
        self,
        column: usize,
        symbol: &str,
        operand: impl Into<Value>,
    ) -> Result<Self, OxiqueryError> {
        let predicate = Predicate::new(symbol, operand)?;
        Ok(self.filter_with(column, predicate))
    }

    #[must_use]
    pub fn filter_with(self, column: usize, predicate: Predicate) -> Self {
        let root = Box::new(PredicateFilter::new(self.root, column, predicate));
        Self { root, ..self }
    }

    #[must_use]
    pub fn sort(self, column: usize) -> Self {
        let sort = Sort::new(self.root, column).with_materialization_limit(self.max_materialized_rows);
        Self { root: Box::new(sort), ..self }
    }

    /// Joins the current tree (left) with `right` on `left.left_column = right.right_column`.
    #[must_use]
    pub fn join(self, right: Self, left_column: usize, right_column: usize) -> Self {
        let join = NestedLoopJoin::new(self.root, right.root, left_column, right_column)
            .with_materialization_limit(self.max_materialized_rows);
        Self { root: Box::new(join), ..self }
    }

    #[must_use]
    pub fn explain(&self) -> String {
        explain(&*self.root)
    }

    #[must_use]
    pub fn build(self) -> BoxedOperator {
        self.root
    }

    /// Opens the tree and drains it.
    ///
    /// # Errors
    ///
    /// Propagates the first error raised while opening or pulling rows.
    pub fn execute(self) -> Result<Vec<Row>, OxiqueryError> {
        let mut root = self.root;
        root.open()?;
        collect_rows(&mut *root)
    }
}
