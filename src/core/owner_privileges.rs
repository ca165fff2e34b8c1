//! Owner privileges indicator

use serde_json::json;

use crate::core::analyzer::EvaluationInput;
use crate::models::types::{Finding, IndicatorKey, Status};
use crate::utils::abi::{match_keywords, KeywordMatch, MatchMode};
use crate::utils::bytecode::{detect_selectors, marker_evidence};
use crate::utils::constants::{
    keyword_description, RiskTier, SignatureEntry, OWNER_HIGH_RISK_KEYWORDS,
    OWNER_HIGH_RISK_PENALTY, OWNER_INCONCLUSIVE_PENALTY, OWNER_KEYWORDS,
    OWNER_MEDIUM_RISK_PENALTY, OWNER_SELECTORS,
};

const KEY: IndicatorKey = IndicatorKey::OwnerPrivileges;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OwnerSignals {
    /// ABI names matched in "contains" mode
    pub keywords: Vec<KeywordMatch>,
    pub selectors: Vec<&'static SignatureEntry>,
    pub has_abi: bool,
    pub has_bytecode: bool,
}

impl OwnerSignals {
    pub fn collect(input: &EvaluationInput<'_>) -> Self {
        Self {
            keywords: match_keywords(&input.function_names(), OWNER_KEYWORDS, MatchMode::Contains),
            selectors: detect_selectors(input.bytecode, OWNER_SELECTORS),
            has_abi: input.has_abi(),
            has_bytecode: input.has_bytecode(),
        }
    }

    /// Blacklist controls, from either source
    pub fn high_risk_count(&self) -> usize {
        let from_abi = self
            .keywords
            .iter()
            .filter(|m| OWNER_HIGH_RISK_KEYWORDS.contains(&m.keyword))
            .count();
        let from_code = self
            .selectors
            .iter()
            .filter(|e| e.tier == RiskTier::High)
            .count();
        from_abi + from_code
    }

    pub fn total_count(&self) -> usize {
        self.keywords.len() + self.selectors.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerVerdict {
    HighRisk,
    MediumRisk,
    /// Neither ABI nor bytecode to inspect
    Inconclusive,
    Clean,
}

impl OwnerVerdict {
    pub fn status(&self) -> Status {
        match self {
            Self::Clean => Status::Pass,
            _ => Status::Warn,
        }
    }

    pub fn penalty(&self) -> u8 {
        match self {
            Self::HighRisk => OWNER_HIGH_RISK_PENALTY.min(KEY.max_penalty()),
            Self::MediumRisk => OWNER_MEDIUM_RISK_PENALTY,
            Self::Inconclusive => OWNER_INCONCLUSIVE_PENALTY,
            Self::Clean => 0,
        }
    }
}

pub fn classify(signals: &OwnerSignals) -> OwnerVerdict {
    if signals.high_risk_count() > 0 {
        return OwnerVerdict::HighRisk;
    }

    if signals.total_count() > 0 {
        return OwnerVerdict::MediumRisk;
    }

    if !signals.has_abi && !signals.has_bytecode {
        return OwnerVerdict::Inconclusive;
    }

    OwnerVerdict::Clean
}

fn reason(verdict: OwnerVerdict, signals: &OwnerSignals) -> String {
    match verdict {
        OwnerVerdict::HighRisk => format!(
            "Owner can blacklist addresses ({} high-risk control{} detected)",
            signals.high_risk_count(),
            if signals.high_risk_count() == 1 { "" } else { "s" }
        ),
        OwnerVerdict::MediumRisk => format!(
            "Owner-only controls detected: {}",
            detected_names(signals).join(", ")
        ),
        OwnerVerdict::Inconclusive => {
            "Owner privileges inconclusive: no ABI or bytecode available".to_string()
        }
        OwnerVerdict::Clean => "No privileged owner controls detected".to_string(),
    }
}

/// ABI function names followed by selector signatures, without duplicates
fn detected_names(signals: &OwnerSignals) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let candidates = signals
        .keywords
        .iter()
        .map(|m| m.function.clone())
        .chain(signals.selectors.iter().map(|e| e.name.to_string()));

    for name in candidates {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

pub fn evaluate(input: &EvaluationInput<'_>) -> Finding {
    let signals = OwnerSignals::collect(input);
    let verdict = classify(&signals);

    let keywords: Vec<serde_json::Value> = signals
        .keywords
        .iter()
        .map(|m| {
            json!({
                "function": m.function,
                "keyword": m.keyword,
                "highRisk": OWNER_HIGH_RISK_KEYWORDS.contains(&m.keyword),
                "description": keyword_description(m.keyword),
            })
        })
        .collect();

    let evidence = json!({
        "abiMatches": keywords,
        "selectors": signals.selectors.iter().map(|e| marker_evidence(e)).collect::<Vec<_>>(),
        "highRiskCount": signals.high_risk_count(),
        "abiAvailable": signals.has_abi,
        "bytecodeAvailable": signals.has_bytecode,
    });

    Finding::new(KEY, verdict.status(), reason(verdict, &signals), verdict.penalty())
        .with_evidence(evidence)
}
