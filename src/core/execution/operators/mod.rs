// Physical operators of the pull-based engine.

pub mod source;
pub use source::Source;

pub mod seq_scan;
pub use seq_scan::SeqScan;

pub mod sort;
pub use sort::Sort;

pub mod filter;
pub use filter::PredicateFilter;

pub mod nested_loop_join;
pub use nested_loop_join::NestedLoopJoin;
