pub mod data_type;
pub mod row;
pub mod value;

pub use data_type::DataType;
pub use row::{Row, RowSet};
pub use value::Value;
