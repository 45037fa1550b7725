//! Pull-based (Volcano) execution.
//!
//! Every physical operator implements [`ExecutionOperator`]. A caller builds a
//! tree bottom-up, optionally calls [`ExecutionOperator::open`] on the root to
//! run the eager phase, then pulls rows with [`ExecutionOperator::next_row`]
//! until it returns `Ok(None)`.

pub mod operators;
pub mod predicate;

pub use predicate::{ComparisonKind, Predicate};

use crate::core::common::types::Row;
use crate::core::common::OxiqueryError;

/// Owned operator node, the unit a parent holds for each child.
pub type BoxedOperator = Box<dyn ExecutionOperator>;

/// The iterator protocol shared by all physical operators.
pub trait ExecutionOperator: Send {
    /// Runs the operator's initialization, including any eager work
    /// (materialization for Sort and Join, the first lookahead for filters).
    /// Opening an already opened operator is a no-op. `next_row` opens an
    /// unopened operator itself.
    fn open(&mut self) -> Result<(), OxiqueryError>;

    /// Produces the next row, or `Ok(None)` once the input is exhausted.
    ///
    /// After the first `Ok(None)` every later call also returns `Ok(None)`.
    fn next_row(&mut self) -> Result<Option<Row>, OxiqueryError>;

    /// Whether the operator is known to have no further rows.
    ///
    /// Operators with lookahead (Source, Sort, PredicateFilter) know this
    /// before handing out the end-of-input signal; NestedLoopJoin knows it
    /// once its outer cursor has passed the last left row.
    fn is_exhausted(&self) -> bool;

    /// One-line description of this node for `explain` output.
    fn describe(&self) -> String;

    /// Child operators, left to right.
    fn children(&self) -> Vec<&dyn ExecutionOperator>;
}

/// Renders an operator tree as indented text, one node per line.
#[must_use]
pub fn explain(root: &dyn ExecutionOperator) -> String {
    fn walk(node: &dyn ExecutionOperator, depth: usize, out: &mut String) {
        out.push_str(&"  ".repeat(depth));
        if depth > 0 {
            out.push_str("-> ");
        }
        out.push_str(&node.describe());
        out.push('\n');
        for child in node.children() {
            walk(child, depth + 1, out);
        }
    }

    let mut out = String::new();
    walk(root, 0, &mut out);
    out
}

/// Adapts an operator to a standard [`Iterator`].
///
/// The iterator is fused: it stops after the first error or end of input.
pub struct RowIter<'a> {
    operator: &'a mut dyn ExecutionOperator,
    done: bool,
}

impl<'a> RowIter<'a> {
    pub fn new(operator: &'a mut dyn ExecutionOperator) -> Self {
        Self { operator, done: false }
    }
}

impl Iterator for RowIter<'_> {
    type Item = Result<Row, OxiqueryError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.operator.next_row() {
            Ok(Some(row)) => Some(Ok(row)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl std::iter::FusedIterator for RowIter<'_> {}

/// Pulls every remaining row out of `operator`.
///
/// # Errors
///
/// Propagates the first error raised anywhere in the tree.
pub fn collect_rows(operator: &mut dyn ExecutionOperator) -> Result<Vec<Row>, OxiqueryError> {
    RowIter::new(operator).collect()
}
