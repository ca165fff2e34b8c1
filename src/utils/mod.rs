//! Utils Module - Scanners, Tables & Shared Utilities
//!
//! Signature tables, bytecode scanning, ABI keyword matching and batch telemetry.

pub mod abi;
pub mod bytecode;
pub mod constants;
pub mod telemetry;

pub use abi::*;
pub use bytecode::*;
pub use constants::*;
pub use telemetry::*;
