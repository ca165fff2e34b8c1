//! Core analyzer module
//! Runs every indicator over one snapshot and reduces the findings to a score

use tracing::{debug, info};

use crate::core::risk_score::RiskScoreBuilder;
use crate::core::{dangerous_functions, market, owner_privileges, proxy, verified_source};
use crate::models::types::{
    AbiEntry, AnalysisResult, Bytecode, ContractSnapshot, ExplorerInfo, Finding,
};
use crate::utils::abi::function_names;

/// Borrowed view of a snapshot, shared by all evaluators
#[derive(Debug, Clone, Copy, Default)]
pub struct EvaluationInput<'a> {
    pub bytecode: Option<&'a Bytecode>,
    pub abi: Option<&'a [AbiEntry]>,
    pub explorer: Option<&'a ExplorerInfo>,
}

impl<'a> EvaluationInput<'a> {
    pub fn new(
        bytecode: Option<&'a Bytecode>,
        abi: Option<&'a [AbiEntry]>,
        explorer: Option<&'a ExplorerInfo>,
    ) -> Self {
        Self {
            bytecode,
            abi,
            explorer,
        }
    }

    pub fn from_snapshot(snapshot: &'a ContractSnapshot) -> Self {
        Self::new(
            snapshot.bytecode.as_ref(),
            snapshot.abi.as_deref(),
            snapshot.explorer_info.as_ref(),
        )
    }

    #[inline]
    pub fn has_bytecode(&self) -> bool {
        self.bytecode.is_some()
    }

    /// An ABI counts as present only when it parsed to a non-empty list
    #[inline]
    pub fn has_abi(&self) -> bool {
        self.abi.is_some_and(|abi| !abi.is_empty())
    }

    /// Lowercased function names from the ABI
    pub fn function_names(&self) -> Vec<String> {
        function_names(self.abi)
    }
}

/// Stateless entry point: every call recomputes from the snapshot
pub struct ContractAnalyzer;

impl ContractAnalyzer {
    /// Analyse one snapshot
    pub fn analyze(snapshot: &ContractSnapshot) -> AnalysisResult {
        let input = EvaluationInput::from_snapshot(snapshot);
        debug!(
            "Analyzing snapshot | bytecode: {} bytes | abi functions: {} | explorer: {}",
            input.bytecode.map_or(0, Bytecode::len_bytes),
            input.function_names().len(),
            input.explorer.is_some()
        );

        let mut builder = RiskScoreBuilder::new();
        for finding in Self::evaluate_scoring(&input) {
            builder = builder.with_finding(finding);
        }

        // Token mode only
        if let Some(market_info) = snapshot.market.as_ref() {
            builder = builder
                .with_finding(market::evaluate_liquidity(Some(market_info)))
                .with_finding(market::evaluate_holders(Some(market_info)));
        }

        let result = builder.build();

        info!(
            "{} Analysis complete | Score: {} | Label: {}",
            result.label.emoji(),
            result.score,
            result.label.as_str()
        );

        result
    }

    /// The four scoring findings, in fixed indicator order
    pub fn evaluate_scoring(input: &EvaluationInput<'_>) -> [Finding; 4] {
        let findings = [
            verified_source::evaluate(input),
            proxy::evaluate(input),
            owner_privileges::evaluate(input),
            dangerous_functions::evaluate(input),
        ];

        for finding in &findings {
            debug!(
                "{} {} penalty={} | {}",
                finding.status.as_str(),
                finding.key,
                finding.penalty,
                finding.reason
            );
        }

        findings
    }
}

/// Analyse raw inputs without building a snapshot first
pub fn analyze(
    bytecode: Option<&str>,
    abi: Option<&[AbiEntry]>,
    explorer: Option<&ExplorerInfo>,
) -> AnalysisResult {
    let snapshot = ContractSnapshot::new(
        bytecode,
        abi.map(<[AbiEntry]>::to_vec),
        explorer.cloned(),
    );
    ContractAnalyzer::analyze(&snapshot)
}
