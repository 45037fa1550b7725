use crate::core::common::types::{Row, RowSet};
use crate::core::common::OxiqueryError;
use crate::core::execution::ExecutionOperator;
use std::sync::Arc;

/// Leaf operator producing the rows of an in-memory [`RowSet`] in insertion order.
pub struct Source {
    /// The relation being read. Shared, never mutated.
    relation: Arc<RowSet>,
    /// Index of the next row to hand out.
    position: usize,
}

impl Source {
    #[must_use]
    pub const fn new(relation: Arc<RowSet>) -> Self {
        Self { relation, position: 0 }
    }

    #[must_use]
    pub fn relation_name(&self) -> &str {
        self.relation.name()
    }
}

impl ExecutionOperator for Source {
    fn open(&mut self) -> Result<(), OxiqueryError> {
        Ok(())
    }

    fn next_row(&mut self) -> Result<Option<Row>, OxiqueryError> {
        let Some(row) = self.relation.rows().get(self.position) else {
            return Ok(None);
        };
        self.position += 1;
        tracing::trace!(relation = self.relation.name(), position = self.position, "source row");
        Ok(Some(row.clone()))
    }

    fn is_exhausted(&self) -> bool {
        self.position >= self.relation.len()
    }

    fn describe(&self) -> String {
        format!("Source {} ({} rows)", self.relation.name(), self.relation.len())
    }

    fn children(&self) -> Vec<&dyn ExecutionOperator> {
        Vec::new()
    }
}
