pub mod config;
pub mod data;
pub mod engines;
pub mod error;
pub mod persistence;
pub mod types;
pub mod utils;

pub use error::{EvotradeError, Result};
pub use types::Sample;
