//! Type definitions for the contract risk classifier
//! Input snapshot records, indicator verdicts and the aggregated result

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::models::errors::AppResult;
use crate::utils::abi::parse_abi;
use crate::utils::constants::{
    indicator_meta, FALLBACK_GOOD_SIGN, FALLBACK_KEY_FINDING, LABEL_LOW_MIN_SCORE,
    LABEL_MEDIUM_MIN_SCORE,
};

// ============================================
// INPUT RECORDS
// ============================================

/// Deployed bytecode, normalised to lowercase hex without the `0x` prefix.
///
/// Only ever addressed through substring checks; never disassembled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Bytecode(String);

impl Bytecode {
    /// Normalise raw hex. Returns `None` for empty code (`""`, `"0x"`), which is
    /// what RPC nodes report for externally owned accounts.
    pub fn new(raw: impl AsRef<str>) -> Option<Self> {
        let trimmed = raw.as_ref().trim();
        let body = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if body.is_empty() {
            return None;
        }

        Some(Self(body.to_ascii_lowercase()))
    }

    /// Lowercase hex body
    #[inline]
    pub fn as_hex(&self) -> &str {
        &self.0
    }

    /// Approximate size in bytes (two hex digits per byte)
    #[inline]
    pub fn len_bytes(&self) -> usize {
        self.0.len() / 2
    }

    /// Substring check against a lowercase hex needle
    #[inline]
    pub fn contains_hex(&self, needle: &str) -> bool {
        self.0.contains(needle)
    }
}

/// Kind of an ABI entry. Only functions matter to the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbiEntryKind {
    #[default]
    Function,
    #[serde(other)]
    Other,
}

/// ABI input/output parameter
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AbiParam {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

/// One entry of a contract ABI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbiEntry {
    #[serde(rename = "type", default)]
    pub kind: AbiEntryKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub state_mutability: Option<String>,
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
    #[serde(default)]
    pub outputs: Vec<AbiParam>,
}

impl AbiEntry {
    /// Shorthand for a named function entry without parameters
    pub fn function(name: impl Into<String>) -> Self {
        Self {
            kind: AbiEntryKind::Function,
            name: Some(name.into()),
            state_mutability: Some("nonpayable".to_string()),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }
}

/// Explorer-reported contract metadata.
///
/// `Option<ExplorerInfo>` = `None` means "metadata unavailable", not "false".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplorerInfo {
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub proxy: bool,
    #[serde(default)]
    pub implementation: Option<String>,
    #[serde(default)]
    pub proxy_admin: Option<String>,
    #[serde(default)]
    pub contract_creator: Option<String>,
    #[serde(default)]
    pub contract_name: Option<String>,
    #[serde(default)]
    pub source_code: Option<String>,
}

impl ExplorerInfo {
    /// Proxy admin, if reported and non-zero
    pub fn admin_address(&self) -> Option<Address> {
        known_address(self.proxy_admin.as_deref())
    }

    /// Implementation address, if reported and non-zero
    pub fn implementation_address(&self) -> Option<Address> {
        known_address(self.implementation.as_deref())
    }
}

/// Parse an explorer address field, dropping blanks, garbage and the zero address
fn known_address(raw: Option<&str>) -> Option<Address> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }

    match crate::utils::parse_address(raw) {
        Ok(addr) if !addr.is_zero() => Some(addr),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!("Ignoring explorer address: {}", e);
            None
        }
    }
}

/// Token-mode market data (informational indicators only)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMarketInfo {
    #[serde(default)]
    pub liquidity_usd: Option<f64>,
    #[serde(default)]
    pub holder_count: Option<u64>,
    #[serde(default)]
    pub top10_holder_percent: Option<f64>,
}

/// A single consistent input snapshot for one (chain, address) pair
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContractSnapshot {
    pub bytecode: Option<Bytecode>,
    pub abi: Option<Vec<AbiEntry>>,
    pub explorer_info: Option<ExplorerInfo>,
    pub market: Option<TokenMarketInfo>,
}

/// Wire form of a snapshot, before normalisation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSnapshot {
    #[serde(default)]
    bytecode: Option<String>,
    #[serde(default)]
    abi: Option<serde_json::Value>,
    #[serde(default)]
    explorer_info: Option<ExplorerInfo>,
    #[serde(default)]
    market: Option<TokenMarketInfo>,
}

impl ContractSnapshot {
    pub fn new(
        bytecode: Option<&str>,
        abi: Option<Vec<AbiEntry>>,
        explorer_info: Option<ExplorerInfo>,
    ) -> Self {
        Self {
            bytecode: bytecode.and_then(Bytecode::new),
            abi,
            explorer_info,
            market: None,
        }
    }

    /// Attach token-mode market data
    pub fn with_market(mut self, market: TokenMarketInfo) -> Self {
        self.market = Some(market);
        self
    }

    /// Parse a snapshot document.
    ///
    /// The ABI may be a JSON array or a JSON-encoded string (as explorers return it);
    /// an unparsable ABI becomes `None` instead of an error.
    pub fn from_json(json: &str) -> AppResult<Self> {
        let raw: RawSnapshot = serde_json::from_str(json)?;

        Ok(Self {
            bytecode: raw.bytecode.as_deref().and_then(Bytecode::new),
            abi: raw.abi.as_ref().and_then(parse_abi),
            explorer_info: raw.explorer_info,
            market: raw.market,
        })
    }
}

// ============================================
// INDICATORS
// ============================================

/// Named risk dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IndicatorKey {
    VerifiedSource,
    Proxy,
    OwnerPrivileges,
    DangerousFunctions,
    /// Informational only, never scored
    Liquidity,
    /// Informational only, never scored
    HolderDistribution,
}

impl IndicatorKey {
    /// Indicators whose penalties make up the score
    pub const SCORING: [IndicatorKey; 4] = [
        IndicatorKey::VerifiedSource,
        IndicatorKey::Proxy,
        IndicatorKey::OwnerPrivileges,
        IndicatorKey::DangerousFunctions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorKey::VerifiedSource => "verifiedSource",
            IndicatorKey::Proxy => "proxy",
            IndicatorKey::OwnerPrivileges => "ownerPrivileges",
            IndicatorKey::DangerousFunctions => "dangerousFunctions",
            IndicatorKey::Liquidity => "liquidity",
            IndicatorKey::HolderDistribution => "holderDistribution",
        }
    }

    #[inline]
    pub fn is_scoring(&self) -> bool {
        Self::SCORING.contains(self)
    }

    /// Static metadata for this indicator
    #[inline]
    pub fn meta(&self) -> &'static IndicatorMeta {
        indicator_meta(*self)
    }

    #[inline]
    pub fn max_penalty(&self) -> u8 {
        self.meta().max_penalty
    }
}

impl fmt::Display for IndicatorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static, versioned description of one indicator
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorMeta {
    pub key: IndicatorKey,
    pub title: &'static str,
    pub category: &'static str,
    pub explanation: &'static str,
    pub good_message: &'static str,
    pub max_penalty: u8,
}

/// Verdict of one indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Pass,
    Warn,
    Fail,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pass => "PASS",
            Status::Warn => "WARN",
            Status::Fail => "FAIL",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Status::Pass => "✅",
            Status::Warn => "🟠",
            Status::Fail => "🔴",
        }
    }
}

/// Per-indicator verdict record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub key: IndicatorKey,
    pub status: Status,
    pub reason: String,
    /// Always within `[0, key.max_penalty()]`
    pub penalty: u8,
    pub evidence: serde_json::Value,
}

impl Finding {
    /// Build a finding; the penalty is capped at the indicator's maximum
    pub fn new(key: IndicatorKey, status: Status, reason: impl Into<String>, penalty: u8) -> Self {
        Self {
            key,
            status,
            reason: reason.into(),
            penalty: penalty.min(key.max_penalty()),
            evidence: serde_json::Value::Object(serde_json::Map::new()),
        }
    }

    pub fn pass(key: IndicatorKey, reason: impl Into<String>) -> Self {
        Self::new(key, Status::Pass, reason, 0)
    }

    pub fn warn(key: IndicatorKey, reason: impl Into<String>, penalty: u8) -> Self {
        Self::new(key, Status::Warn, reason, penalty)
    }

    pub fn fail(key: IndicatorKey, reason: impl Into<String>, penalty: u8) -> Self {
        Self::new(key, Status::Fail, reason, penalty)
    }

    pub fn with_evidence(mut self, evidence: serde_json::Value) -> Self {
        self.evidence = evidence;
        self
    }

    #[inline]
    pub fn is_pass(&self) -> bool {
        self.status == Status::Pass
    }
}

// ============================================
// RESULT
// ============================================

/// Overall risk label, derived from the score only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLabel {
    Low,
    Medium,
    High,
}

impl RiskLabel {
    /// Fixed thresholds: >= 80 Low, >= 50 Medium, otherwise High
    pub fn from_score(score: u8) -> Self {
        if score >= LABEL_LOW_MIN_SCORE {
            RiskLabel::Low
        } else if score >= LABEL_MEDIUM_MIN_SCORE {
            RiskLabel::Medium
        } else {
            RiskLabel::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLabel::Low => "Low",
            RiskLabel::Medium => "Medium",
            RiskLabel::High => "High",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            RiskLabel::Low => "✅",
            RiskLabel::Medium => "🟠",
            RiskLabel::High => "🔴",
        }
    }
}

/// Result of one contract analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub findings: BTreeMap<IndicatorKey, Finding>,
    /// 0-100, higher is safer
    pub score: u8,
    pub label: RiskLabel,
}

impl AnalysisResult {
    pub fn finding(&self, key: IndicatorKey) -> Option<&Finding> {
        self.findings.get(&key)
    }

    /// Reasons of every non-passing finding
    pub fn key_findings(&self) -> Vec<String> {
        let items: Vec<String> = self
            .findings
            .values()
            .filter(|f| !f.is_pass())
            .map(|f| f.reason.clone())
            .collect();

        if items.is_empty() {
            vec![FALLBACK_KEY_FINDING.to_string()]
        } else {
            items
        }
    }

    /// Static good messages of every passing finding
    pub fn good_signs(&self) -> Vec<String> {
        let items: Vec<String> = self
            .findings
            .values()
            .filter(|f| f.is_pass())
            .map(|f| f.key.meta().good_message.to_string())
            .collect();

        if items.is_empty() {
            vec![FALLBACK_GOOD_SIGN.to_string()]
        } else {
            items
        }
    }

    /// Result plus derived lists, as exposed to collaborators
    pub fn to_report(&self) -> RiskReport {
        RiskReport {
            result: self.clone(),
            key_findings: self.key_findings(),
            good_signs: self.good_signs(),
        }
    }

    /// Text report for terminals
    pub fn summary(&self) -> String {
        let mut out = format!(
            "{} Risk: {} | Score: {}/100",
            self.label.emoji(),
            self.label.as_str(),
            self.score
        );

        for finding in self.findings.values() {
            let penalty = if finding.key.is_scoring() {
                format!("-{}", finding.penalty)
            } else {
                "info".to_string()
            };
            out.push_str(&format!(
                "\n   {} {:<20} {:>5}  {}",
                finding.status.emoji(),
                finding.key.meta().title,
                penalty,
                finding.reason
            ));
        }

        out
    }
}

/// Serialisable output contract: findings, score, label and derived lists
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskReport {
    #[serde(flatten)]
    pub result: AnalysisResult,
    pub key_findings: Vec<String>,
    pub good_signs: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytecode_normalisation() {
        let code = Bytecode::new("0x6080ABCD").unwrap();
        assert_eq!(code.as_hex(), "6080abcd");
        assert_eq!(code.len_bytes(), 4);

        assert!(Bytecode::new("0x").is_none());
        assert!(Bytecode::new("  ").is_none());
    }

    #[test]
    fn test_label_thresholds() {
        assert_eq!(RiskLabel::from_score(100), RiskLabel::Low);
        assert_eq!(RiskLabel::from_score(80), RiskLabel::Low);
        assert_eq!(RiskLabel::from_score(79), RiskLabel::Medium);
        assert_eq!(RiskLabel::from_score(50), RiskLabel::Medium);
        assert_eq!(RiskLabel::from_score(49), RiskLabel::High);
        assert_eq!(RiskLabel::from_score(0), RiskLabel::High);
    }

    #[test]
    fn test_finding_penalty_capped() {
        let f = Finding::fail(IndicatorKey::Proxy, "over", 99);
        assert_eq!(f.penalty, 15);

        let info = Finding::warn(IndicatorKey::Liquidity, "thin pool", 10);
        assert_eq!(info.penalty, 0);
    }

    #[test]
    fn test_explorer_addresses() {
        let info = ExplorerInfo {
            proxy_admin: Some("0x0000000000000000000000000000000000000000".to_string()),
            implementation: Some("0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string()),
            ..Default::default()
        };
        assert!(info.admin_address().is_none(), "zero admin is unknown");
        assert!(info.implementation_address().is_some());

        let garbage = ExplorerInfo {
            proxy_admin: Some("not-an-address".to_string()),
            ..Default::default()
        };
        assert!(garbage.admin_address().is_none());
    }

    #[test]
    fn test_snapshot_from_json_with_string_abi() {
        let json = r#"{
            "bytecode": "0x6080",
            "abi": "[{\"type\":\"function\",\"name\":\"mint\",\"inputs\":[],\"outputs\":[]}]",
            "explorerInfo": { "isVerified": true, "proxy": false }
        }"#;

        let snapshot = ContractSnapshot::from_json(json).unwrap();
        assert_eq!(snapshot.bytecode.unwrap().as_hex(), "6080");
        assert_eq!(snapshot.abi.unwrap().len(), 1);
        assert!(snapshot.explorer_info.unwrap().is_verified);
    }

    #[test]
    fn test_snapshot_malformed_abi_becomes_none() {
        let json = r#"{ "abi": "Contract source code not verified" }"#;
        let snapshot = ContractSnapshot::from_json(json).unwrap();
        assert!(snapshot.abi.is_none());
        assert!(snapshot.bytecode.is_none());
        assert!(snapshot.explorer_info.is_none());
    }

    #[test]
    fn test_snapshot_not_json_is_error() {
        let err = ContractSnapshot::from_json("definitely not json").unwrap_err();
        assert_eq!(err.code_str(), "SNAPSHOT_PARSE");
    }

    #[test]
    fn test_abi_entry_kinds() {
        let abi: Vec<AbiEntry> = serde_json::from_str(
            r#"[{"type":"event","name":"Transfer"},{"name":"owner"},{"type":"constructor"}]"#,
        )
        .unwrap();
        assert_eq!(abi[0].kind, AbiEntryKind::Other);
        assert_eq!(abi[1].kind, AbiEntryKind::Function);
        assert_eq!(abi[2].kind, AbiEntryKind::Other);
    }
}
