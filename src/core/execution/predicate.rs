use crate::core::common::types::Value;
use crate::core::common::OxiqueryError;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// The comparison operators a filter predicate may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonKind {
    LessThan,
    GreaterThan,
    LessOrEqual,
    GreaterOrEqual,
    Equal,
}

impl ComparisonKind {
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::LessThan => "<",
            Self::GreaterThan => ">",
            Self::LessOrEqual => "<=",
            Self::GreaterOrEqual => ">=",
            Self::Equal => "=",
        }
    }

    #[must_use]
    pub const fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Self::LessThan => matches!(ordering, Ordering::Less),
            Self::GreaterThan => matches!(ordering, Ordering::Greater),
            Self::LessOrEqual => !matches!(ordering, Ordering::Greater),
            Self::GreaterOrEqual => !matches!(ordering, Ordering::Less),
            Self::Equal => matches!(ordering, Ordering::Equal),
        }
    }
}

impl FromStr for ComparisonKind {
    type Err = OxiqueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "<" => Ok(Self::LessThan),
            ">" => Ok(Self::GreaterThan),
            "<=" => Ok(Self::LessOrEqual),
            ">=" => Ok(Self::GreaterOrEqual),
            "=" => Ok(Self::Equal),
            other => Err(OxiqueryError::InvalidOperator(other.to_string())),
        }
    }
}

impl fmt::Display for ComparisonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A comparison of a field against a literal operand: `field <op> operand`.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    kind: ComparisonKind,
    operand: Value,
}

impl Predicate {
    /// Builds a predicate from an operator symbol.
    ///
    /// # Errors
    ///
    /// Returns `OxiqueryError::InvalidOperator` for any symbol other than
    /// `<`, `>`, `<=`, `>=` or `=`.
    pub fn new(symbol: &str, operand: impl Into<Value>) -> Result<Self, OxiqueryError> {
        Ok(Self::from_kind(symbol.parse()?, operand))
    }

    pub fn from_kind(kind: ComparisonKind, operand: impl Into<Value>) -> Self {
        Self { kind, operand: operand.into() }
    }

    #[must_use]
    pub const fn kind(&self) -> ComparisonKind {
        self.kind
    }

    #[must_use]
    pub const fn operand(&self) -> &Value {
        &self.operand
    }

    /// Tests `field` against the operand. A `Null` or `NaN` on either side
    /// never matches, and `-0.0` equals `0.0`.
    ///
    /// # Errors
    ///
    /// Returns `OxiqueryError::TypeMismatch` if the field and operand types
    /// have no natural ordering.
    pub fn evaluate(&self, field: &Value) -> Result<bool, OxiqueryError> {
        let ordering = field.partial_compare(&self.operand)?;
        Ok(ordering.is_some_and(|ordering| self.kind.accepts(ordering)))
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.operand)
    }
}
