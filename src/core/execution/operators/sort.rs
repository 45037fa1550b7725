use crate::core::common::types::{Row, Value};
use crate::core::common::OxiqueryError;
use crate::core::execution::{BoxedOperator, ExecutionOperator};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// A buffered row together with its sort key.
///
/// `sequence` records arrival order so rows with equal keys leave the heap
/// in the order the child produced them.
struct HeapEntry {
    key: Value,
    sequence: usize,
    row: Row,
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Keys were checked for mutual comparability while buffering.
        self.key
            .compare(&other.key)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

/// Ascending single-column sort.
///
/// `open` drains the child completely into a binary min-heap; each
/// `next_row` pops the smallest remaining key. `Null` keys come first.
pub struct Sort {
    input: BoxedOperator,
    column: usize,
    heap: BinaryHeap<Reverse<HeapEntry>>,
    max_rows: Option<usize>,
    opened: bool,
    materialized: usize,
}

impl Sort {
    #[must_use]
    pub fn new(input: BoxedOperator, column: usize) -> Self {
        Self { input, column, heap: BinaryHeap::new(), max_rows: None, opened: false, materialized: 0 }
    }

    /// Caps how many rows `open` may buffer. `None` means unbounded.
    #[must_use]
    pub fn with_materialization_limit(mut self, max_rows: Option<usize>) -> Self {
        self.max_rows = max_rows;
        self
    }

    #[must_use]
    pub const fn column(&self) -> usize {
        self.column
    }

    /// Number of rows buffered by `open`; zero before it has run.
    #[must_use]
    pub const fn materialized_rows(&self) -> usize {
        self.materialized
    }

    fn build(&mut self) -> Result<(), OxiqueryError> {
        // Every non-null key must order against the first one.
        let mut first_key: Option<Value> = None;
        let mut sequence = 0usize;

        while let Some(row) = self.input.next_row()? {
            if let Some(limit) = self.max_rows {
                if sequence >= limit {
                    tracing::warn!(limit, "sort input exceeds materialization limit");
                    return Err(OxiqueryError::ResourceLimit { operator: "Sort", limit });
                }
            }

            let key = row.column(self.column)?.clone();
            if let Some(first) = &first_key {
                first.compare(&key)?;
            } else if !key.is_null() {
                first_key = Some(key.clone());
            }

            self.heap.push(Reverse(HeapEntry { key, sequence, row }));
            sequence += 1;
        }

        self.materialized = sequence;
        tracing::debug!(column = self.column, rows = sequence, "sort input materialized");
        Ok(())
    }
}

impl ExecutionOperator for Sort {
    fn open(&mut self) -> Result<(), OxiqueryError> {
        if self.opened {
            return Ok(());
        }
        self.opened = true;
        self.input.open()?;
        let result = self.build();
        if result.is_err() {
            self.heap.clear();
        }
        result
    }

    fn next_row(&mut self) -> Result<Option<Row>, OxiqueryError> {
        self.open()?;
        Ok(self.heap.pop().map(|Reverse(entry)| entry.row))
    }

    fn is_exhausted(&self) -> bool {
        self.opened && self.heap.is_empty()
    }

    fn describe(&self) -> String {
        format!("Sort (column {} ASC)", self.column)
    }

    fn children(&self) -> Vec<&dyn ExecutionOperator> {
        vec![&*self.input]
    }
}
