//! Models Module - Data Structures & Configuration
//!
//! Input snapshot records, findings, results, errors and binary configuration.

pub mod config;
pub mod errors;
pub mod types;

pub use config::*;
pub use errors::*;
pub use types::*;
