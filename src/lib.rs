//! Contract Risk Library
//!
//! Deterministic risk classifier for deployed EVM contracts. Given one snapshot
//! (bytecode, ABI, explorer metadata) it produces per-indicator findings, a
//! 0-100 safety score and a Low/Medium/High label:
//! - Verified source
//! - Proxy / upgradeability
//! - Owner privileges
//! - Dangerous functions
//!
//! Pure and synchronous: no network, no clock, no shared state.

pub mod core;
pub mod models;
pub mod utils;

pub use crate::core::analyzer::{analyze, ContractAnalyzer, EvaluationInput};
pub use crate::core::risk_score::RiskScoreBuilder;
pub use models::config::{OutputFormat, ReportConfig};
pub use models::errors::{AppError, AppResult, ErrorCode};
pub use models::types::{
    AbiEntry, AnalysisResult, Bytecode, ContractSnapshot, ExplorerInfo, Finding, IndicatorKey,
    IndicatorMeta, RiskLabel, RiskReport, Status, TokenMarketInfo,
};
pub use utils::constants::{INDICATORS, TABLE_VERSION};
pub use utils::telemetry::{ScanStats, ScanTelemetry};
