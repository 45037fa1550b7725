use super::data_type::DataType;
use crate::core::common::OxiqueryError;
use std::cmp::Ordering;
use std::fmt;

/// A single scalar field of a [`Row`](super::Row).
///
/// Serialized untagged so dataset files can use plain JSON scalars
/// (`[1, "The Matrix", 1999]`). Variant order matters for the untagged
/// decoder: integers must be tried before floats.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Value {
    #[must_use]
    pub const fn get_type(&self) -> DataType {
        match self {
            Self::Integer(_) => DataType::Integer,
            Self::Float(_) => DataType::Float,
            Self::Text(_) => DataType::Text,
            Self::Boolean(_) => DataType::Boolean,
            Self::Null => DataType::Null,
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn is_nan(&self) -> bool {
        matches!(self, Self::Float(f) if f.is_nan())
    }

    /// Natural ordering between two values, as filters and joins see it.
    ///
    /// Integers and floats compare numerically and exactly with each other,
    /// `-0.0` equals `0.0`, and any comparison involving `NaN` or `Null` is
    /// unordered (`None`).
    ///
    /// # Errors
    ///
    /// Returns `OxiqueryError::TypeMismatch` when the two types have no natural ordering.
    pub fn partial_compare(&self, other: &Self) -> Result<Option<Ordering>, OxiqueryError> {
        match (self, other) {
            (Self::Null, _) | (_, Self::Null) => Ok(None),
            (Self::Integer(a), Self::Integer(b)) => Ok(Some(a.cmp(b))),
            (Self::Float(a), Self::Float(b)) => Ok(a.partial_cmp(b)),
            (Self::Integer(a), Self::Float(b)) => Ok(compare_integer_float(*a, *b)),
            (Self::Float(a), Self::Integer(b)) => {
                Ok(compare_integer_float(*b, *a).map(Ordering::reverse))
            }
            (Self::Text(a), Self::Text(b)) => Ok(Some(a.cmp(b))),
            (Self::Boolean(a), Self::Boolean(b)) => Ok(Some(a.cmp(b))),
            _ => Err(OxiqueryError::TypeMismatch { left: self.get_type(), right: other.get_type() }),
        }
    }

    /// Total ordering used for sort keys.
    ///
    /// Follows [`Value::partial_compare`], with `Null` before every non-null
    /// value and `NaN` after every number. All `NaN`s are equal, as are
    /// `-0.0` and `0.0`.
    ///
    /// # Errors
    ///
    /// Returns `OxiqueryError::TypeMismatch` when the two types have no natural ordering.
    pub fn compare(&self, other: &Self) -> Result<Ordering, OxiqueryError> {
        match (self, other) {
            (Self::Null, Self::Null) => Ok(Ordering::Equal),
            (Self::Null, _) => Ok(Ordering::Less),
            (_, Self::Null) => Ok(Ordering::Greater),
            _ => Ok(self
                .partial_compare(other)?
                .unwrap_or_else(|| self.is_nan().cmp(&other.is_nan()))),
        }
    }

    /// Equality used by join keys: `Null` and `NaN` never match, incompatible types are an error.
    ///
    /// # Errors
    ///
    /// Returns `OxiqueryError::TypeMismatch` when the two types cannot be compared.
    pub fn join_eq(&self, other: &Self) -> Result<bool, OxiqueryError> {
        Ok(self.partial_compare(other)? == Some(Ordering::Equal))
    }

    /// Best-effort parse of a command-line literal.
    ///
    /// `null`, `true`/`false`, integers and floats are recognised; anything
    /// else becomes text. Surrounding single or double quotes force text.
    #[must_use]
    pub fn parse_literal(input: &str) -> Self {
        let trimmed = input.trim();
        for quote in ['\'', '"'] {
            if let Some(inner) = trimmed.strip_prefix(quote).and_then(|s| s.strip_suffix(quote)) {
                return Self::Text(inner.to_string());
            }
        }
        if trimmed.eq_ignore_ascii_case("null") {
            return Self::Null;
        }
        if let Ok(b) = trimmed.parse::<bool>() {
            return Self::Boolean(b);
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return Self::Integer(i);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            return Self::Float(f);
        }
        Self::Text(trimmed.to_string())
    }
}

/// Exact comparison of an integer with a float; `None` when `float` is `NaN`.
///
/// Every finite float in `[-2^63, 2^63)` has an integer part representable
/// as `i64`, so the comparison never rounds the integer.
#[allow(clippy::cast_possible_truncation)]
fn compare_integer_float(integer: i64, float: f64) -> Option<Ordering> {
    const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

    if float.is_nan() {
        return None;
    }
    if float >= TWO_POW_63 {
        return Some(Ordering::Less);
    }
    if float < -TWO_POW_63 {
        return Some(Ordering::Greater);
    }

    let whole = float.trunc();
    let fraction = float - whole;
    let by_fraction = if fraction > 0.0 {
        Ordering::Less
    } else if fraction < 0.0 {
        Ordering::Greater
    } else {
        Ordering::Equal
    };
    Some(integer.cmp(&(whole as i64)).then(by_fraction))
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
            Self::Text(s) => write!(f, "'{}'", s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}
