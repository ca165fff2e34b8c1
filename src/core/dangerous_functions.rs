//! Dangerous functions indicator
//!
//! Evidence streams: ABI name prefixes, dangerous selectors (High/Medium) and
//! dangerous opcodes (always High). Keywords never count as High on their own;
//! they only matter when code-level evidence is missing.

use serde_json::json;
use std::collections::BTreeSet;

use crate::core::analyzer::EvaluationInput;
use crate::models::types::{Finding, IndicatorKey, Status};
use crate::utils::abi::{match_keywords, KeywordMatch, MatchMode};
use crate::utils::bytecode::{detect_opcodes, detect_selectors, marker_evidence};
use crate::utils::constants::{
    keyword_description, Marker, RiskTier, SignatureEntry, DANGEROUS_KEYWORDS,
    DANGEROUS_OPCODES, DANGEROUS_SELECTORS, DANGER_INCONCLUSIVE_PENALTY,
    DANGER_MANY_MEDIUM_COUNT, DANGER_MANY_MEDIUM_PENALTY, DANGER_MULTIPLE_HIGH_PENALTY,
    DANGER_SINGLE_HIGH_PENALTY, DANGER_SOME_MEDIUM_PENALTY,
};

const KEY: IndicatorKey = IndicatorKey::DangerousFunctions;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DangerSignals {
    /// ABI names matched in "starts-with" mode
    pub keywords: Vec<KeywordMatch>,
    pub selectors: Vec<&'static SignatureEntry>,
    pub opcodes: Vec<&'static SignatureEntry>,
    pub has_abi: bool,
    pub has_bytecode: bool,
}

impl DangerSignals {
    pub fn collect(input: &EvaluationInput<'_>) -> Self {
        Self {
            keywords: match_keywords(
                &input.function_names(),
                DANGEROUS_KEYWORDS,
                MatchMode::StartsWith,
            ),
            selectors: detect_selectors(input.bytecode, DANGEROUS_SELECTORS),
            opcodes: detect_opcodes(input.bytecode, DANGEROUS_OPCODES),
            has_abi: input.has_abi(),
            has_bytecode: input.has_bytecode(),
        }
    }

    fn code_signals(&self) -> impl Iterator<Item = &&'static SignatureEntry> {
        self.selectors.iter().chain(self.opcodes.iter())
    }

    fn distinct_with_tier(&self, tier: RiskTier) -> usize {
        self.code_signals()
            .filter(|e| e.tier == tier)
            .map(|e| e.marker)
            .collect::<BTreeSet<Marker>>()
            .len()
    }

    /// Distinct High-tier selectors and opcodes
    pub fn high_count(&self) -> usize {
        self.distinct_with_tier(RiskTier::High)
    }

    /// Distinct Medium-tier selectors
    pub fn medium_count(&self) -> usize {
        self.distinct_with_tier(RiskTier::Medium)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DangerVerdict {
    /// Neither ABI nor bytecode to inspect
    Inconclusive,
    MultipleHigh,
    SingleHigh,
    ManyMedium,
    SomeMedium,
    /// ABI names only, no selector/opcode corroboration
    KeywordOnly,
    Clean,
}

impl DangerVerdict {
    pub fn status(&self) -> Status {
        match self {
            Self::MultipleHigh => Status::Fail,
            Self::Clean => Status::Pass,
            _ => Status::Warn,
        }
    }

    pub fn penalty(&self) -> u8 {
        match self {
            Self::Inconclusive => DANGER_INCONCLUSIVE_PENALTY,
            Self::MultipleHigh => DANGER_MULTIPLE_HIGH_PENALTY,
            Self::SingleHigh => DANGER_SINGLE_HIGH_PENALTY,
            Self::ManyMedium => DANGER_MANY_MEDIUM_PENALTY,
            Self::SomeMedium | Self::KeywordOnly => DANGER_SOME_MEDIUM_PENALTY,
            Self::Clean => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inconclusive => "inconclusive",
            Self::MultipleHigh => "multipleHigh",
            Self::SingleHigh => "singleHigh",
            Self::ManyMedium => "manyMedium",
            Self::SomeMedium => "someMedium",
            Self::KeywordOnly => "keywordOnly",
            Self::Clean => "clean",
        }
    }
}

/// Ordered ladder, first matching rule wins
pub fn classify(signals: &DangerSignals) -> DangerVerdict {
    if !signals.has_abi && !signals.has_bytecode {
        return DangerVerdict::Inconclusive;
    }

    let high = signals.high_count();
    if high >= 2 {
        return DangerVerdict::MultipleHigh;
    }
    if high == 1 {
        return DangerVerdict::SingleHigh;
    }

    let medium = signals.medium_count();
    if medium >= DANGER_MANY_MEDIUM_COUNT {
        return DangerVerdict::ManyMedium;
    }
    if medium > 0 {
        return DangerVerdict::SomeMedium;
    }

    if !signals.keywords.is_empty() {
        return DangerVerdict::KeywordOnly;
    }

    DangerVerdict::Clean
}

fn reason(verdict: DangerVerdict, signals: &DangerSignals) -> String {
    let names = |tier: RiskTier| -> String {
        signals
            .code_signals()
            .filter(|e| e.tier == tier)
            .map(|e| e.name)
            .collect::<Vec<_>>()
            .join(", ")
    };

    match verdict {
        DangerVerdict::Inconclusive => {
            "Dangerous functions inconclusive: no ABI or bytecode available".to_string()
        }
        DangerVerdict::MultipleHigh => {
            format!("Multiple high-risk capabilities: {}", names(RiskTier::High))
        }
        DangerVerdict::SingleHigh => format!("High-risk capability: {}", names(RiskTier::High)),
        DangerVerdict::ManyMedium => {
            format!("Several sensitive functions: {}", names(RiskTier::Medium))
        }
        DangerVerdict::SomeMedium => format!("Sensitive functions: {}", names(RiskTier::Medium)),
        DangerVerdict::KeywordOnly => format!(
            "Risky function names in ABI: {}",
            signals
                .keywords
                .iter()
                .map(|m| m.function.as_str())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect::<Vec<_>>()
                .join(", ")
        ),
        DangerVerdict::Clean => "No dangerous functions detected".to_string(),
    }
}

pub fn evaluate(input: &EvaluationInput<'_>) -> Finding {
    let signals = DangerSignals::collect(input);
    let verdict = classify(&signals);

    let keywords: Vec<serde_json::Value> = signals
        .keywords
        .iter()
        .map(|m| {
            json!({
                "function": m.function,
                "keyword": m.keyword,
                "description": keyword_description(m.keyword),
            })
        })
        .collect();

    let evidence = json!({
        "rule": verdict.as_str(),
        "abiMatches": keywords,
        "selectors": signals.selectors.iter().map(|e| marker_evidence(e)).collect::<Vec<_>>(),
        "opcodes": signals.opcodes.iter().map(|e| marker_evidence(e)).collect::<Vec<_>>(),
        "highCount": signals.high_count(),
        "mediumCount": signals.medium_count(),
    });

    Finding::new(KEY, verdict.status(), reason(verdict, &signals), verdict.penalty())
        .with_evidence(evidence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::types::{AbiEntry, Bytecode};

    fn run(bytecode: Option<&str>, abi: Option<&[AbiEntry]>) -> Finding {
        let code = bytecode.and_then(Bytecode::new);
        evaluate(&EvaluationInput::new(code.as_ref(), abi, None))
    }

    fn by_name(table: &'static [SignatureEntry], name: &str) -> &'static SignatureEntry {
        table.iter().find(|e| e.name == name).unwrap()
    }

    fn signals(
        selectors: Vec<&'static SignatureEntry>,
        opcodes: Vec<&'static SignatureEntry>,
        keywords: &[&'static str],
    ) -> DangerSignals {
        DangerSignals {
            keywords: keywords
                .iter()
                .map(|k| KeywordMatch {
                    function: k.to_string(),
                    keyword: *k,
                })
                .collect(),
            selectors,
            opcodes,
            has_abi: !keywords.is_empty(),
            has_bytecode: true,
        }
    }

    #[test]
    fn test_nothing_to_inspect() {
        let finding = run(None, None);
        assert_eq!(finding.status, Status::Warn);
        assert_eq!(finding.penalty, 12);
        assert_eq!(finding.evidence["rule"], "inconclusive");
    }

    #[test]
    fn test_mint_and_delegatecall_fail() {
        // mint(address,uint256) selector followed by a DELEGATECALL byte
        let finding = run(Some("0x6340c10f19145af4"), None);
        assert_eq!(finding.status, Status::Fail);
        assert_eq!(finding.penalty, 30);
        assert_eq!(finding.evidence["highCount"], 2);
        assert_eq!(finding.evidence["opcodes"][0]["name"], "DELEGATECALL");
    }

    #[test]
    fn test_single_high() {
        let finding = run(Some("0x63db2e21bc14"), None);
        assert_eq!(finding.status, Status::Warn);
        assert_eq!(finding.penalty, 18);
        assert!(finding.reason.contains("emergencyWithdraw()"));
    }

    #[test]
    fn test_many_medium() {
        let s = signals(
            vec![
                by_name(DANGEROUS_SELECTORS, "burn(uint256)"),
                by_name(DANGEROUS_SELECTORS, "withdraw()"),
                by_name(DANGEROUS_SELECTORS, "openTrading()"),
            ],
            Vec::new(),
            &[],
        );
        assert_eq!(classify(&s), DangerVerdict::ManyMedium);
        assert_eq!(classify(&s).penalty(), 12);
    }

    #[test]
    fn test_some_medium() {
        let finding = run(Some("0x6342966c6814"), None);
        assert_eq!(finding.status, Status::Warn);
        assert_eq!(finding.penalty, 8);
        assert_eq!(finding.evidence["mediumCount"], 1);
    }

    #[test]
    fn test_keyword_only() {
        let abi = vec![AbiEntry::function("rugPull"), AbiEntry::function("balanceOf")];
        let finding = run(None, Some(&abi));
        assert_eq!(finding.status, Status::Warn);
        assert_eq!(finding.penalty, 8);
        assert_eq!(finding.evidence["rule"], "keywordOnly");
        assert_eq!(
            finding.evidence["abiMatches"][0]["description"],
            "Function name suggests a rug pull"
        );
    }

    #[test]
    fn test_keywords_do_not_escalate_high() {
        let s = signals(
            vec![by_name(DANGEROUS_SELECTORS, "mint(address,uint256)")],
            Vec::new(),
            &["mint", "burn", "withdraw"],
        );
        assert_eq!(classify(&s), DangerVerdict::SingleHigh);
    }

    #[test]
    fn test_duplicate_markers_count_once() {
        let mint = by_name(DANGEROUS_SELECTORS, "mint(address,uint256)");
        let s = signals(vec![mint, mint], Vec::new(), &[]);
        assert_eq!(s.high_count(), 1);
        assert_eq!(classify(&s), DangerVerdict::SingleHigh);
    }

    #[test]
    fn test_clean() {
        let abi = vec![AbiEntry::function("transfer")];
        let finding = run(Some("0x6080604052"), Some(&abi));
        assert_eq!(finding.status, Status::Pass);
        assert_eq!(finding.penalty, 0);
    }

    #[test]
    fn test_evidence_lists_everything_regardless_of_rule() {
        let abi = vec![AbiEntry::function("burnTokens")];
        let finding = run(Some("0x6340c10f1942966c68"), Some(&abi));
        assert_eq!(finding.penalty, 18);
        assert_eq!(finding.evidence["selectors"].as_array().unwrap().len(), 2);
        assert_eq!(finding.evidence["abiMatches"].as_array().unwrap().len(), 1);
    }
}
