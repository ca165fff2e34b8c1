//! Risk Scoring Module
//! Reduces per-indicator findings to a 0-100 safety score and a label
//!
//! score = clamp(100 - sum of scoring penalties, 0, 100)
//! - 80-100: Low risk
//! - 50-79: Medium risk
//! - 0-49: High risk
//!
//! Informational indicators are carried through to the result but never
//! contribute to the sum.

use std::collections::BTreeMap;

use crate::models::types::{AnalysisResult, Finding, IndicatorKey, RiskLabel};
use crate::utils::constants::BASELINE_SCORE;

/// Sum of penalties over scoring indicators only
pub fn total_penalty(findings: &BTreeMap<IndicatorKey, Finding>) -> i32 {
    findings
        .values()
        .filter(|f| f.key.is_scoring())
        .map(|f| f.penalty as i32)
        .sum()
}

/// Baseline minus penalties, clamped into 0..=100
pub fn score_from_penalty(penalty: i32) -> u8 {
    (BASELINE_SCORE - penalty).clamp(0, 100) as u8
}

/// Builder for creating an analysis result from indicator findings
pub struct RiskScoreBuilder {
    findings: BTreeMap<IndicatorKey, Finding>,
}

impl RiskScoreBuilder {
    pub fn new() -> Self {
        Self {
            findings: BTreeMap::new(),
        }
    }

    /// Add one finding; a later finding for the same key replaces the earlier one
    pub fn with_finding(mut self, finding: Finding) -> Self {
        self.findings.insert(finding.key, finding);
        self
    }

    /// Build final result
    pub fn build(self) -> AnalysisResult {
        let score = score_from_penalty(total_penalty(&self.findings));

        AnalysisResult {
            findings: self.findings,
            score,
            label: RiskLabel::from_score(score),
        }
    }
}

impl Default for RiskScoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}
