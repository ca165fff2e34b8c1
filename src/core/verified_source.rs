//! Verified source indicator
//!
//! Either an explorer verification flag or a usable ABI is enough to pass.

use serde_json::json;

use crate::core::analyzer::EvaluationInput;
use crate::models::types::{Finding, IndicatorKey, Status};
use crate::utils::constants::{VERIFIED_FAIL_PENALTY, VERIFIED_INCONCLUSIVE_PENALTY};

const KEY: IndicatorKey = IndicatorKey::VerifiedSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifiedVerdict {
    /// Explorer flag and/or non-empty ABI
    Verified { by_explorer: bool, by_abi: bool },
    /// No explorer metadata at all
    Inconclusive,
    /// Explorer says unverified and no ABI is available
    Unverified,
}

impl VerifiedVerdict {
    pub fn status(&self) -> Status {
        match self {
            Self::Verified { .. } => Status::Pass,
            Self::Inconclusive => Status::Warn,
            Self::Unverified => Status::Fail,
        }
    }

    pub fn penalty(&self) -> u8 {
        match self {
            Self::Verified { .. } => 0,
            Self::Inconclusive => VERIFIED_INCONCLUSIVE_PENALTY,
            Self::Unverified => VERIFIED_FAIL_PENALTY,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            Self::Verified {
                by_explorer: true, ..
            } => "Source code is verified on the block explorer",
            Self::Verified { .. } => "Contract ABI is published",
            Self::Inconclusive => "Verification status inconclusive: explorer metadata unavailable",
            Self::Unverified => "Source code is not verified and no ABI is available",
        }
    }
}

pub fn classify(input: &EvaluationInput<'_>) -> VerifiedVerdict {
    let by_explorer = input.explorer.is_some_and(|info| info.is_verified);
    let by_abi = input.has_abi();

    if by_explorer || by_abi {
        return VerifiedVerdict::Verified {
            by_explorer,
            by_abi,
        };
    }

    if input.explorer.is_none() {
        return VerifiedVerdict::Inconclusive;
    }

    VerifiedVerdict::Unverified
}

pub fn evaluate(input: &EvaluationInput<'_>) -> Finding {
    let verdict = classify(input);

    let evidence = json!({
        "explorerAvailable": input.explorer.is_some(),
        "isVerified": input.explorer.map(|info| info.is_verified),
        "contractName": input.explorer.and_then(|info| info.contract_name.clone()),
        "abiEntries": input.abi.map(|abi| abi.len()),
        "abiFunctions": input.function_names().len(),
    });

    Finding::new(KEY, verdict.status(), verdict.reason(), verdict.penalty()).with_evidence(evidence)
}
