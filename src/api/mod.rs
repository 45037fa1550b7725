//! Public API module for oxiquery
//!
//! Datasets supply the relations leaf operators read; [`QueryBuilder`]
//! assembles operator trees over them.

pub mod builder;
pub mod dataset;

pub use builder::QueryBuilder;
pub use dataset::Dataset;

#[cfg(test)]
mod tests;
