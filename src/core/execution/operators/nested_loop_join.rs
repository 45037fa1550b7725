use crate::core::common::types::Row;
use crate::core::common::OxiqueryError;
use crate::core::execution::{BoxedOperator, ExecutionOperator};

/// Inner equi-join of two inputs on one column per side.
///
/// `open` materializes both inputs into vectors, since the right side has to
/// be rescanned once per left row and children are single-pass. Rows are then
/// produced lazily by walking the outer cursor `left_pos` over the left rows
/// and the inner cursor `right_pos` over the right rows. Output is
/// left-major, right-minor; every matching pair is emitted exactly once as
/// `left ++ right`.
pub struct NestedLoopJoin {
    /// The left input operator for the join.
    left_input: BoxedOperator,
    /// The right input operator for the join.
    right_input: BoxedOperator,
    left_column: usize,
    right_column: usize,
    left_rows: Vec<Row>,
    right_rows: Vec<Row>,
    left_pos: usize,
    right_pos: usize,
    max_rows: Option<usize>,
    opened: bool,
}

impl NestedLoopJoin {
    #[must_use]
    pub fn new(
        left_input: BoxedOperator,
        right_input: BoxedOperator,
        left_column: usize,
        right_column: usize,
    ) -> Self {
        Self {
            left_input,
            right_input,
            left_column,
            right_column,
            left_rows: Vec::new(),
            right_rows: Vec::new(),
            left_pos: 0,
            right_pos: 0,
            max_rows: None,
            opened: false,
        }
    }

    /// Caps how many rows `open` may buffer across both inputs. `None` means unbounded.
    #[must_use]
    pub fn with_materialization_limit(mut self, max_rows: Option<usize>) -> Self {
        self.max_rows = max_rows;
        self
    }

    /// Rows buffered by `open` as `(left, right)`; zero before it has run.
    #[must_use]
    pub fn materialized_rows(&self) -> (usize, usize) {
        (self.left_rows.len(), self.right_rows.len())
    }

    fn drain(
        input: &mut BoxedOperator,
        budget: Option<usize>,
        limit: Option<usize>,
    ) -> Result<Vec<Row>, OxiqueryError> {
        input.open()?;
        let mut rows = Vec::new();
        while let Some(row) = input.next_row()? {
            if let (Some(budget), Some(limit)) = (budget, limit) {
                if rows.len() >= budget {
                    tracing::warn!(limit, "join inputs exceed materialization limit");
                    return Err(OxiqueryError::ResourceLimit { operator: "NestedLoopJoin", limit });
                }
            }
            rows.push(row);
        }
        Ok(rows)
    }

    fn build(&mut self) -> Result<(), OxiqueryError> {
        let left = Self::drain(&mut self.left_input, self.max_rows, self.max_rows)?;
        let remaining = self.max_rows.map(|limit| limit.saturating_sub(left.len()));
        let right = Self::drain(&mut self.right_input, remaining, self.max_rows)?;

        tracing::debug!(
            left_rows = left.len(),
            right_rows = right.len(),
            "join inputs materialized"
        );
        self.left_rows = left;
        self.right_rows = right;
        Ok(())
    }

    /// Scans forward from the current cursors to the next matching pair.
    fn advance(&mut self) -> Result<Option<Row>, OxiqueryError> {
        if self.right_rows.is_empty() {
            self.left_pos = self.left_rows.len();
            return Ok(None);
        }

        while let Some(left) = self.left_rows.get(self.left_pos) {
            let left_key = left.column(self.left_column)?;
            while let Some(right) = self.right_rows.get(self.right_pos) {
                self.right_pos += 1;
                if left_key.join_eq(right.column(self.right_column)?)? {
                    tracing::trace!(left = self.left_pos, right = self.right_pos - 1, "join match");
                    return Ok(Some(left.concat(right)));
                }
            }
            self.right_pos = 0;
            self.left_pos += 1;
        }
        Ok(None)
    }

    fn fail(&mut self, e: OxiqueryError) -> OxiqueryError {
        self.left_rows.clear();
        self.right_rows.clear();
        self.left_pos = 0;
        self.right_pos = 0;
        e
    }
}

impl ExecutionOperator for NestedLoopJoin {
    fn open(&mut self) -> Result<(), OxiqueryError> {
        if self.opened {
            return Ok(());
        }
        self.opened = true;
        self.build().map_err(|e| self.fail(e))
    }

    fn next_row(&mut self) -> Result<Option<Row>, OxiqueryError> {
        self.open()?;
        self.advance().map_err(|e| self.fail(e))
    }

    fn is_exhausted(&self) -> bool {
        self.opened && self.left_pos >= self.left_rows.len()
    }

    fn describe(&self) -> String {
        format!(
            "NestedLoopJoin (left.{} = right.{})",
            self.left_column, self.right_column
        )
    }

    fn children(&self) -> Vec<&dyn ExecutionOperator> {
        vec![&*self.left_input, &*self.right_input]
    }
}
