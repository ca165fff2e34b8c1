//! Core Module - Indicator evaluators & scoring
//!
//! Each indicator module collects its signals, classifies them with an ordered
//! rule ladder and emits one `Finding`. The analyzer runs them all and the
//! risk score builder reduces the findings to a score and a label.

pub mod analyzer;
pub mod dangerous_functions;
pub mod market;
pub mod owner_privileges;
pub mod proxy;
pub mod risk_score;
pub mod verified_source;

pub use analyzer::*;
pub use dangerous_functions::{DangerSignals, DangerVerdict};
pub use owner_privileges::{OwnerSignals, OwnerVerdict};
pub use proxy::{ProxySignals, ProxyVerdict};
pub use risk_score::*;
pub use verified_source::VerifiedVerdict;
