// src/core/execution/operators/filter/tests.rs
use crate::core::common::types::{Row, RowSet, Value};
use crate::core::common::OxiqueryError;
use crate::core::execution::operators::filter::PredicateFilter;
use crate::core::execution::operators::SeqScan;
use crate::core::execution::{collect_rows, ExecutionOperator, Predicate};
use crate::row;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// Mock ExecutionOperator that counts pulls and can fail at a given position
struct MockInputOperator {
    rows: Vec<Row>,
    position: usize,
    pulls: Arc<AtomicUsize>,
    fail_at: Option<usize>,
}

impl MockInputOperator {
    fn new(rows: Vec<Row>) -> (Self, Arc<AtomicUsize>) {
        let pulls = Arc::new(AtomicUsize::new(0));
        (Self { rows, position: 0, pulls: Arc::clone(&pulls), fail_at: None }, pulls)
    }

    fn failing_at(rows: Vec<Row>, position: usize) -> Self {
        let (mut mock, _) = Self::new(rows);
        mock.fail_at = Some(position);
        mock
    }
}

impl ExecutionOperator for MockInputOperator {
    fn open(&mut self) -> Result<(), OxiqueryError> {
        Ok(())
    }

    fn next_row(&mut self) -> Result<Option<Row>, OxiqueryError> {
        self.pulls.fetch_add(1, Ordering::SeqCst);
        if self.fail_at == Some(self.position) {
            self.position += 1;
            return Err(OxiqueryError::Dataset("mock failure".to_string()));
        }
        let row = self.rows.get(self.position).cloned();
        if row.is_some() {
            self.position += 1;
        }
        Ok(row)
    }

    fn is_exhausted(&self) -> bool {
        self.position >= self.rows.len()
    }

    fn describe(&self) -> String {
        "Mock".to_string()
    }

    fn children(&self) -> Vec<&dyn ExecutionOperator> {
        Vec::new()
    }
}

fn movies() -> Vec<Row> {
    vec![row![1, "The Matrix", 1999], row![2, "Avatar", 2009], row![3, "Harry Potter", 2003]]
}

fn scan_movies() -> Box<SeqScan> {
    Box::new(SeqScan::over(RowSet::new("movies", movies()).into_shared()))
}

#[test]
fn test_filter_year_at_least_2003() -> Result<(), OxiqueryError> {
    let mut filter = PredicateFilter::with_symbol(scan_movies(), 2, ">=", 2003)?;
    let results = collect_rows(&mut filter)?;
    assert_eq!(results, vec![row![2, "Avatar", 2009], row![3, "Harry Potter", 2003]]);
    Ok(())
}

#[test]
fn test_filter_text_equals() -> Result<(), OxiqueryError> {
    let mut filter = PredicateFilter::with_symbol(scan_movies(), 1, "=", "The Matrix")?;
    assert_eq!(filter.next_row()?, Some(row![1, "The Matrix", 1999]));
    assert!(filter.is_exhausted());
    assert_eq!(filter.next_row()?, None);
    Ok(())
}

#[test]
fn test_filter_no_matches() -> Result<(), OxiqueryError> {
    let mut filter = PredicateFilter::with_symbol(scan_movies(), 0, ">", 100)?;
    filter.open()?;
    assert!(filter.is_exhausted());
    assert_eq!(filter.next_row()?, None);
    assert_eq!(filter.next_row()?, None);
    Ok(())
}

#[test]
fn test_invalid_operator_fails_before_pulling() {
    let (mock, pulls) = MockInputOperator::new(movies());
    let result = PredicateFilter::with_symbol(Box::new(mock), 0, "!=", 1);
    assert!(matches!(result, Err(OxiqueryError::InvalidOperator(ref op)) if op == "!="));
    assert_eq!(pulls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_lookahead_pulls_child_once_per_row() -> Result<(), OxiqueryError> {
    let (mock, pulls) = MockInputOperator::new(movies());
    let mut filter = PredicateFilter::new(Box::new(mock), 0, Predicate::new("<", 10)?);

    filter.open()?;
    assert_eq!(pulls.load(Ordering::SeqCst), 1);

    assert_eq!(filter.next_row()?, Some(row![1, "The Matrix", 1999]));
    assert_eq!(pulls.load(Ordering::SeqCst), 2);
    assert_eq!(filter.next_row()?, Some(row![2, "Avatar", 2009]));
    assert_eq!(filter.next_row()?, Some(row![3, "Harry Potter", 2003]));
    // Third emit refilled the lookahead with the child's end marker.
    assert_eq!(pulls.load(Ordering::SeqCst), 4);
    assert!(filter.is_exhausted());

    assert_eq!(filter.next_row()?, None);
    assert_eq!(filter.next_row()?, None);
    assert_eq!(pulls.load(Ordering::SeqCst), 4);
    Ok(())
}

#[test]
fn test_refill_error_is_deferred() -> Result<(), OxiqueryError> {
    let mock = MockInputOperator::failing_at(movies(), 1);
    let mut filter = PredicateFilter::new(Box::new(mock), 0, Predicate::new(">=", 1)?);

    assert_eq!(filter.next_row()?, Some(row![1, "The Matrix", 1999]));
    assert!(matches!(filter.next_row(), Err(OxiqueryError::Dataset(_))));
    assert_eq!(filter.next_row()?, None);
    Ok(())
}

#[test]
fn test_column_out_of_bounds() -> Result<(), OxiqueryError> {
    let mut filter = PredicateFilter::with_symbol(scan_movies(), 5, "=", 1)?;
    assert!(matches!(
        filter.open(),
        Err(OxiqueryError::ColumnOutOfBounds { index: 5, arity: 3 })
    ));
    assert_eq!(filter.next_row()?, None);
    Ok(())
}

#[test]
fn test_type_mismatch_surfaces_on_open() -> Result<(), OxiqueryError> {
    let mut filter = PredicateFilter::with_symbol(scan_movies(), 1, ">", 5)?;
    assert!(matches!(filter.open(), Err(OxiqueryError::TypeMismatch { .. })));
    Ok(())
}

#[test]
fn test_null_fields_are_dropped() -> Result<(), OxiqueryError> {
    let rows = vec![row![1, Value::Null], row![2, 5], row![3, Value::Null]];
    let (mock, _) = MockInputOperator::new(rows);
    let mut filter = PredicateFilter::with_symbol(Box::new(mock), 1, "<=", 5)?;
    assert_eq!(collect_rows(&mut filter)?, vec![row![2, 5]]);
    Ok(())
}

#[test]
fn test_float_fields_use_natural_comparison() -> Result<(), OxiqueryError> {
    let rows = vec![row![1, -0.0], row![2, f64::NAN], row![3, 0], row![4, 7.5]];
    let (mock, _) = MockInputOperator::new(rows.clone());
    let mut zero = PredicateFilter::with_symbol(Box::new(mock), 1, "=", 0.0)?;
    assert_eq!(collect_rows(&mut zero)?, vec![row![1, -0.0], row![3, 0]]);

    let (mock, _) = MockInputOperator::new(rows);
    let mut above = PredicateFilter::with_symbol(Box::new(mock), 1, ">", 5)?;
    assert_eq!(collect_rows(&mut above)?, vec![row![4, 7.5]]);
    Ok(())
}

#[test]
fn test_filter_keeps_order_and_arity() -> Result<(), OxiqueryError> {
    let rows: Vec<Row> = (0..50).map(|i| row![i, i % 7, format!("r{}", i)]).collect();
    let expected: Vec<Row> = rows.iter().filter(|r| r.values[1] == Value::Integer(3)).cloned().collect();
    let (mock, _) = MockInputOperator::new(rows);
    let mut filter = PredicateFilter::with_symbol(Box::new(mock), 1, "=", 3)?;
    let results = collect_rows(&mut filter)?;
    assert_eq!(results, expected);
    assert!(results.iter().all(|r| r.len() == 3));
    Ok(())
}
