use super::value::Value;
use crate::core::common::OxiqueryError;
use std::fmt;
use std::sync::Arc;

/// An ordered, fixed-arity tuple of values addressed by zero-based position.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Row {
    pub values: Vec<Value>,
}

impl Row {
    /// Create a new Row with the given values
    #[must_use]
    pub const fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Get a value by column index
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Bounds-checked column access.
    ///
    /// # Errors
    ///
    /// Returns `OxiqueryError::ColumnOutOfBounds` if `index` is not below the row's arity.
    #[inline]
    pub fn column(&self, index: usize) -> Result<&Value, OxiqueryError> {
        self.values
            .get(index)
            .ok_or(OxiqueryError::ColumnOutOfBounds { index, arity: self.values.len() })
    }

    /// Left fields followed by right fields.
    #[must_use]
    pub fn concat(&self, right: &Self) -> Self {
        let mut values = Vec::with_capacity(self.len() + right.len());
        values.extend_from_slice(&self.values);
        values.extend_from_slice(&right.values);
        Self { values }
    }

    /// Iterate over values in the row
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }

    /// Number of values in the row
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the row has no values
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", value)?;
        }
        f.write_str(")")
    }
}

/// A named, immutable, ordered relation held in memory.
///
/// The engine never mutates a `RowSet`; sources share it through an `Arc`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RowSet {
    name: String,
    rows: Vec<Row>,
}

impl RowSet {
    #[must_use]
    pub fn new(name: impl Into<String>, rows: Vec<Row>) -> Self {
        Self { name: name.into(), rows }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}
