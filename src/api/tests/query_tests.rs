// src/api/tests/query_tests.rs
//! End-to-end scenarios over the sample movie dataset.

use crate::api::{Dataset, QueryBuilder};
use crate::core::common::types::{Row, RowSet};
use crate::core::common::OxiqueryError;
use crate::core::execution::operators::{NestedLoopJoin, PredicateFilter, SeqScan, Sort, Source};
use crate::core::execution::{BoxedOperator, ExecutionOperator, Predicate};
use crate::row;
use std::sync::Arc;

fn movies() -> Arc<RowSet> {
    Dataset::sample().relation("movies").unwrap()
}

fn ratings() -> Arc<RowSet> {
    Dataset::sample().relation("ratings").unwrap()
}

#[test]
fn test_scan_returns_movies_unchanged() -> Result<(), OxiqueryError> {
    let rows = QueryBuilder::scan(movies()).execute()?;
    assert_eq!(
        rows,
        vec![row![1, "The Matrix", 1999], row![2, "Avatar", 2009], row![3, "Harry Potter", 2003]]
    );
    Ok(())
}

#[test]
fn test_sort_movies_by_title() -> Result<(), OxiqueryError> {
    let rows = QueryBuilder::scan(movies()).sort(1).execute()?;
    assert_eq!(
        rows,
        vec![row![2, "Avatar", 2009], row![3, "Harry Potter", 2003], row![1, "The Matrix", 1999]]
    );
    Ok(())
}

#[test]
fn test_filter_movies_from_2003() -> Result<(), OxiqueryError> {
    let rows = QueryBuilder::scan(movies()).filter(2, ">=", 2003)?.execute()?;
    assert_eq!(rows, vec![row![2, "Avatar", 2009], row![3, "Harry Potter", 2003]]);
    Ok(())
}

#[test]
fn test_join_first_two_movies_with_ratings() -> Result<(), OxiqueryError> {
    let first_two = RowSet::new("movies", movies().rows()[..2].to_vec()).into_shared();
    let rows = QueryBuilder::scan(first_two)
        .join(QueryBuilder::scan(ratings()), 0, 0)
        .execute()?;
    assert_eq!(
        rows,
        vec![
            row![1, "The Matrix", 1999, 1, 10],
            row![2, "Avatar", 2009, 2, 9],
            row![2, "Avatar", 2009, 2, 8],
        ]
    );
    Ok(())
}

#[test]
fn test_filter_then_sort_then_join() -> Result<(), OxiqueryError> {
    let rows = QueryBuilder::scan(movies())
        .filter(2, ">", 2000)?
        .sort(2)
        .join(QueryBuilder::scan(ratings()), 0, 0)
        .execute()?;
    assert_eq!(rows, vec![row![2, "Avatar", 2009, 2, 9], row![2, "Avatar", 2009, 2, 8]]);
    Ok(())
}

#[test]
fn test_invalid_operator_aborts_building() {
    let result = QueryBuilder::scan(movies()).filter(2, "!=", 2003);
    match result {
        Err(OxiqueryError::InvalidOperator(op)) => assert_eq!(op, "!="),
        Err(other) => panic!("Expected InvalidOperator, got {:?}", other),
        Ok(_) => panic!("Expected InvalidOperator, got a query"),
    }
}

/// Every operator kind, each over the sample data.
fn every_operator() -> Vec<BoxedOperator> {
    vec![
        Box::new(Source::new(movies())),
        Box::new(SeqScan::over(movies())),
        Box::new(Sort::new(Box::new(SeqScan::over(movies())), 0)),
        Box::new(PredicateFilter::new(
            Box::new(SeqScan::over(movies())),
            0,
            Predicate::new(">", 1).unwrap(),
        )),
        Box::new(NestedLoopJoin::new(
            Box::new(SeqScan::over(movies())),
            Box::new(SeqScan::over(ratings())),
            0,
            0,
        )),
    ]
}

#[test]
fn test_exhaustion_is_idempotent_for_every_operator() -> Result<(), OxiqueryError> {
    for mut operator in every_operator() {
        let name = operator.describe();
        let mut produced: Vec<Row> = Vec::new();
        while let Some(row) = operator.next_row()? {
            produced.push(row);
        }
        assert!(!produced.is_empty(), "{} produced no rows", name);
        assert!(operator.is_exhausted(), "{} not exhausted after end of input", name);
        for _ in 0..3 {
            assert_eq!(operator.next_row()?, None, "{} resurrected after end of input", name);
        }
        operator.open()?;
        assert_eq!(operator.next_row()?, None, "{} restarted after reopen", name);
    }
    Ok(())
}

#[test]
fn test_trees_can_move_across_threads() -> Result<(), OxiqueryError> {
    let tree = QueryBuilder::scan(movies()).sort(1).build();
    let handle = std::thread::spawn(move || {
        let mut tree = tree;
        tree.next_row()
    });
    let first = handle.join().expect("worker thread panicked")?;
    assert_eq!(first, Some(row![2, "Avatar", 2009]));
    Ok(())
}
