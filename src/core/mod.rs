pub mod common;
pub mod config;
pub mod execution;
pub use self::config::Config;
