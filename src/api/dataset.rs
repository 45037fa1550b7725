// src/api/dataset.rs
//! In-memory datasets: named relations supplied to [`Source`](crate::core::execution::operators::Source) nodes.

use crate::core::common::types::{Row, RowSet};
use crate::core::common::OxiqueryError;
use crate::row;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// A collection of named relations, usually read from a JSON file of the form
/// `{"relations": [{"name": "movies", "rows": [[1, "The Matrix", 1999]]}]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    relations: Vec<Arc<RowSet>>,
}

impl Dataset {
    /// Builds a dataset, checking that names are unique and that every row of
    /// a relation has the same arity.
    ///
    /// # Errors
    ///
    /// Returns `OxiqueryError::Dataset` when either check fails.
    pub fn new(relations: Vec<RowSet>) -> Result<Self, OxiqueryError> {
        let dataset = Self { relations: relations.into_iter().map(Arc::new).collect() };
        dataset.validate()?;
        Ok(dataset)
    }

    /// # Errors
    ///
    /// Returns `OxiqueryError::Json` for malformed JSON and
    /// `OxiqueryError::Dataset` for inconsistent contents.
    pub fn from_json_str(json: &str) -> Result<Self, OxiqueryError> {
        let dataset: Self = serde_json::from_str(json)?;
        dataset.validate()?;
        Ok(dataset)
    }

    /// # Errors
    ///
    /// Returns `OxiqueryError::Io` if the file cannot be read, otherwise as
    /// [`Dataset::from_json_str`].
    pub fn load(path: &Path) -> Result<Self, OxiqueryError> {
        let contents = fs::read_to_string(path)?;
        let dataset = Self::from_json_str(&contents)?;
        tracing::debug!(
            path = %path.display(),
            relations = dataset.relations.len(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    /// The `movies` and `ratings` relations used throughout the docs and demos.
    #[must_use]
    pub fn sample() -> Self {
        let movies = RowSet::new(
            "movies",
            vec![row![1, "The Matrix", 1999], row![2, "Avatar", 2009], row![3, "Harry Potter", 2003]],
        );
        let ratings = RowSet::new("ratings", vec![row![1, 10], row![2, 9], row![2, 8]]);
        Self { relations: vec![Arc::new(movies), Arc::new(ratings)] }
    }

    /// Looks up a relation by name.
    ///
    /// # Errors
    ///
    /// Returns `OxiqueryError::Dataset` if no relation has that name.
    pub fn relation(&self, name: &str) -> Result<Arc<RowSet>, OxiqueryError> {
        self.relations
            .iter()
            .find(|r| r.name() == name)
            .map(Arc::clone)
            .ok_or_else(|| {
                OxiqueryError::Dataset(format!(
                    "unknown relation '{}' (available: {})",
                    name,
                    self.names().collect::<Vec<_>>().join(", ")
                ))
            })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.relations.iter().map(|r| r.name())
    }

    fn validate(&self) -> Result<(), OxiqueryError> {
        let mut seen = HashSet::new();
        for relation in &self.relations {
            if !seen.insert(relation.name()) {
                return Err(OxiqueryError::Dataset(format!(
                    "duplicate relation '{}'",
                    relation.name()
                )));
            }
            check_arity(relation.name(), relation.rows())?;
        }
        Ok(())
    }
}

fn check_arity(name: &str, rows: &[Row]) -> Result<(), OxiqueryError> {
    let Some(first) = rows.first() else {
        return Ok(());
    };
    match rows.iter().position(|r| r.len() != first.len()) {
        Some(idx) => Err(OxiqueryError::Dataset(format!(
            "relation '{}' row {} has {} columns, expected {}",
            name,
            idx,
            rows[idx].len(),
            first.len()
        ))),
        None => Ok(()),
    }
}
