use crate::core::common::types::{Row, Value};
use crate::core::common::OxiqueryError;
use crate::core::execution::predicate::Predicate;
use crate::core::execution::{BoxedOperator, ExecutionOperator};

/// Lookahead state of a [`PredicateFilter`].
enum Lookahead {
    /// `open` has not run yet.
    Unopened,
    /// The next qualifying row, already pulled from the child.
    Row(Row),
    /// Pulling the next row failed; reported on the following call.
    Failed(OxiqueryError),
    /// The child has no more qualifying rows.
    Exhausted,
}

/// Keeps the child rows whose value at `column` satisfies `predicate`.
///
/// The filter always holds the next qualifying row (or the end marker) in
/// its lookahead, so exhaustion is known before it is reported and the child
/// is never asked twice for the same row.
pub struct PredicateFilter {
    /// The input operator that provides rows.
    input: BoxedOperator,
    column: usize,
    predicate: Predicate,
    lookahead: Lookahead,
}

impl PredicateFilter {
    pub fn new(input: BoxedOperator, column: usize, predicate: Predicate) -> Self {
        Self { input, column, predicate, lookahead: Lookahead::Unopened }
    }

    /// Shorthand building the predicate from an operator symbol.
    ///
    /// # Errors
    ///
    /// Returns `OxiqueryError::InvalidOperator` for an unknown symbol; no row
    /// is pulled from `input` in that case.
    pub fn with_symbol(
        input: BoxedOperator,
        column: usize,
        symbol: &str,
        operand: impl Into<Value>,
    ) -> Result<Self, OxiqueryError> {
        Ok(Self::new(input, column, Predicate::new(symbol, operand)?))
    }

    #[must_use]
    pub const fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    /// Pulls the child until a row qualifies or the child runs dry.
    fn advance(&mut self) -> Result<Lookahead, OxiqueryError> {
        while let Some(row) = self.input.next_row()? {
            if self.predicate.evaluate(row.column(self.column)?)? {
                return Ok(Lookahead::Row(row));
            }
        }
        Ok(Lookahead::Exhausted)
    }

    fn refill(&mut self) {
        self.lookahead = match self.advance() {
            Ok(next) => next,
            Err(e) => Lookahead::Failed(e),
        };
    }
}

impl ExecutionOperator for PredicateFilter {
    fn open(&mut self) -> Result<(), OxiqueryError> {
        if !matches!(self.lookahead, Lookahead::Unopened) {
            return Ok(());
        }
        if let Err(e) = self.input.open() {
            self.lookahead = Lookahead::Exhausted;
            return Err(e);
        }
        match self.advance() {
            Ok(next) => {
                self.lookahead = next;
                Ok(())
            }
            Err(e) => {
                self.lookahead = Lookahead::Exhausted;
                Err(e)
            }
        }
    }

    fn next_row(&mut self) -> Result<Option<Row>, OxiqueryError> {
        self.open()?;
        match std::mem::replace(&mut self.lookahead, Lookahead::Exhausted) {
            Lookahead::Row(row) => {
                self.refill();
                Ok(Some(row))
            }
            Lookahead::Failed(e) => Err(e),
            Lookahead::Exhausted | Lookahead::Unopened => Ok(None),
        }
    }

    fn is_exhausted(&self) -> bool {
        matches!(self.lookahead, Lookahead::Exhausted)
    }

    fn describe(&self) -> String {
        format!("Filter (column {} {})", self.column, self.predicate)
    }

    fn children(&self) -> Vec<&dyn ExecutionOperator> {
        vec![&*self.input]
    }
}

#[cfg(test)]
mod tests;
