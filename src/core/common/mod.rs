pub mod error;
pub use error::OxiqueryError;
pub mod types;
