use super::types::DataType;
use std::fmt;

#[derive(Debug)]
pub enum OxiqueryError {
    Io(std::io::Error),
    Json(serde_json::Error),
    InvalidOperator(String),
    ColumnOutOfBounds { index: usize, arity: usize },
    TypeMismatch { left: DataType, right: DataType },
    ResourceLimit { operator: &'static str, limit: usize },
    Configuration(String),
    Dataset(String),
}

impl fmt::Display for OxiqueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO Error: {}", e),
            Self::Json(e) => write!(f, "JSON Error: {}", e),
            Self::InvalidOperator(op) => write!(
                f,
                "Invalid comparison operator '{}': expected one of <, >, <=, >=, =",
                op
            ),
            Self::ColumnOutOfBounds { index, arity } => {
                write!(f, "Column index {} out of bounds for row of arity {}", index, arity)
            }
            Self::TypeMismatch { left, right } => {
                write!(f, "Type mismatch: cannot compare {} with {}", left, right)
            }
            Self::ResourceLimit { operator, limit } => {
                write!(f, "{} exceeded the materialization limit of {} rows", operator, limit)
            }
            Self::Configuration(s) => write!(f, "Configuration error: {}", s),
            Self::Dataset(s) => write!(f, "Dataset error: {}", s),
        }
    }
}

impl std::error::Error for OxiqueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for OxiqueryError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for OxiqueryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}
