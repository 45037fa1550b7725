use crate::core::common::types::{Row, RowSet};
use crate::core::common::OxiqueryError;
use crate::core::execution::operators::Source;
use crate::core::execution::{BoxedOperator, ExecutionOperator};
use std::sync::Arc;

/// Marks a table access in the operator tree. Forwards its child unchanged.
pub struct SeqScan {
    table_name: String,
    input: BoxedOperator,
}

impl SeqScan {
    pub fn new(table_name: impl Into<String>, input: BoxedOperator) -> Self {
        Self { table_name: table_name.into(), input }
    }

    /// The common case: a scan directly over a relation's [`Source`].
    #[must_use]
    pub fn over(relation: Arc<RowSet>) -> Self {
        let table_name = relation.name().to_string();
        Self::new(table_name, Box::new(Source::new(relation)))
    }

    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

impl ExecutionOperator for SeqScan {
    fn open(&mut self) -> Result<(), OxiqueryError> {
        self.input.open()
    }

    fn next_row(&mut self) -> Result<Option<Row>, OxiqueryError> {
        self.input.next_row()
    }

    fn is_exhausted(&self) -> bool {
        self.input.is_exhausted()
    }

    fn describe(&self) -> String {
        format!("SeqScan on {}", self.table_name)
    }

    fn children(&self) -> Vec<&dyn ExecutionOperator> {
        vec![&*self.input]
    }
}
