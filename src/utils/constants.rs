//! Constants Module - Single Source of Truth
//!
//! Every detection table, keyword vocabulary, penalty and threshold used by the
//! classifier lives here. The tables are versioned: changing an entry changes the
//! output contract and must bump `TABLE_VERSION`.

use alloy_primitives::Address;
use serde::Serialize;
use std::str::FromStr;

use crate::models::errors::{AppError, AppResult};
use crate::models::types::{IndicatorKey, IndicatorMeta};

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// Application name
pub const APP_NAME: &str = "contract-risk";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version of the signature and indicator tables below
pub const TABLE_VERSION: &str = "2024.1";

// ============================================
// SIGNATURE TYPES
// ============================================

/// Risk tier of a known selector or opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum RiskTier {
    High,
    Medium,
}

/// Byte pattern searched for in bytecode
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Marker {
    /// First 4 bytes of keccak256(signature)
    Selector([u8; 4]),
    /// Single EVM instruction byte
    Opcode(u8),
}

impl Marker {
    /// Lowercase hex form used for substring matching
    pub fn to_hex(&self) -> String {
        match self {
            Marker::Selector(bytes) => hex::encode(bytes),
            Marker::Opcode(byte) => hex::encode([*byte]),
        }
    }
}

/// Known selector/opcode with its human-readable meaning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureEntry {
    pub marker: Marker,
    /// Canonical signature for selectors, mnemonic for opcodes
    pub name: &'static str,
    pub tier: RiskTier,
    pub description: &'static str,
}

const fn selector(
    bytes: [u8; 4],
    name: &'static str,
    tier: RiskTier,
    description: &'static str,
) -> SignatureEntry {
    SignatureEntry {
        marker: Marker::Selector(bytes),
        name,
        tier,
        description,
    }
}

const fn opcode(byte: u8, name: &'static str, description: &'static str) -> SignatureEntry {
    SignatureEntry {
        marker: Marker::Opcode(byte),
        name,
        tier: RiskTier::High,
        description,
    }
}

// ============================================
// PROXY SIGNATURES
// ============================================

pub const SEL_UPGRADE_TO: [u8; 4] = [0x36, 0x59, 0xcf, 0xe6];
pub const SEL_UPGRADE_TO_AND_CALL: [u8; 4] = [0x4f, 0x1e, 0xf2, 0x86];

/// Selectors typical of proxies (transparent, UUPS, beacon-style admin surfaces)
pub const PROXY_SELECTORS: &[SignatureEntry] = &[
    selector(
        SEL_UPGRADE_TO,
        "upgradeTo(address)",
        RiskTier::High,
        "Implementation can be replaced",
    ),
    selector(
        SEL_UPGRADE_TO_AND_CALL,
        "upgradeToAndCall(address,bytes)",
        RiskTier::High,
        "Implementation can be replaced and initialised in one call",
    ),
    selector(
        [0x5c, 0x60, 0xda, 0x1b],
        "implementation()",
        RiskTier::Medium,
        "Exposes the current implementation address",
    ),
    selector(
        [0xf8, 0x51, 0xa4, 0x40],
        "admin()",
        RiskTier::Medium,
        "Exposes the proxy admin address",
    ),
    selector(
        [0x8f, 0x28, 0x39, 0x70],
        "changeAdmin(address)",
        RiskTier::Medium,
        "Proxy admin can be handed over",
    ),
    selector(
        [0x52, 0xd1, 0x90, 0x2d],
        "proxiableUUID()",
        RiskTier::Medium,
        "UUPS-compatible implementation",
    ),
];

/// Proxy selectors that can actually swap the implementation
pub const UPGRADE_SELECTORS: [Marker; 2] = [
    Marker::Selector(SEL_UPGRADE_TO),
    Marker::Selector(SEL_UPGRADE_TO_AND_CALL),
];

/// Leading 16 bytes of bytes32(uint256(keccak256("eip1967.proxy.implementation")) - 1)
pub const EIP1967_IMPLEMENTATION_SLOT_PREFIX: &str = "360894a13ba1a3210667c828492db98d";

// ============================================
// OWNER PRIVILEGE SIGNATURES
// ============================================

/// Privileged owner controls. Blacklisting is the high-risk subset.
pub const OWNER_SELECTORS: &[SignatureEntry] = &[
    selector(
        [0xf2, 0xfd, 0xe3, 0x8b],
        "transferOwnership(address)",
        RiskTier::Medium,
        "Ownership can be transferred",
    ),
    selector(
        [0x71, 0x50, 0x18, 0xa6],
        "renounceOwnership()",
        RiskTier::Medium,
        "Ownable contract (ownership can be renounced)",
    ),
    selector(
        [0x8d, 0xa5, 0xcb, 0x5b],
        "owner()",
        RiskTier::Medium,
        "Contract has an owner role",
    ),
    selector(
        [0x84, 0x56, 0xcb, 0x59],
        "pause()",
        RiskTier::Medium,
        "Owner can pause transfers",
    ),
    selector(
        [0x3f, 0x4b, 0xa8, 0x3a],
        "unpause()",
        RiskTier::Medium,
        "Owner can resume transfers",
    ),
    selector(
        [0x44, 0x33, 0x7e, 0xa1],
        "addToBlacklist(address)",
        RiskTier::High,
        "Owner can blacklist addresses",
    ),
    selector(
        [0xf9, 0xf9, 0x2b, 0xe4],
        "blacklist(address)",
        RiskTier::High,
        "Owner can blacklist addresses",
    ),
    selector(
        [0x1a, 0x89, 0x52, 0x66],
        "unBlacklist(address)",
        RiskTier::High,
        "Owner manages a blacklist",
    ),
    selector(
        [0x69, 0xfe, 0x0e, 0x2d],
        "setFee(uint256)",
        RiskTier::Medium,
        "Owner can change fees",
    ),
    selector(
        [0xec, 0x28, 0x43, 0x8a],
        "setMaxTxAmount(uint256)",
        RiskTier::Medium,
        "Owner can cap transaction size",
    ),
    selector(
        [0xc4, 0x08, 0x1a, 0x4c],
        "setTaxFee(uint256)",
        RiskTier::Medium,
        "Owner can change transfer tax",
    ),
    selector(
        [0xea, 0x16, 0x44, 0xd5],
        "setMaxWalletSize(uint256)",
        RiskTier::Medium,
        "Owner can cap wallet balances",
    ),
];

// ============================================
// DANGEROUS FUNCTION SIGNATURES
// ============================================

pub const DANGEROUS_SELECTORS: &[SignatureEntry] = &[
    selector(
        [0x40, 0xc1, 0x0f, 0x19],
        "mint(address,uint256)",
        RiskTier::High,
        "Privileged minting to arbitrary addresses",
    ),
    selector(
        [0xa0, 0x71, 0x2d, 0x68],
        "mint(uint256)",
        RiskTier::High,
        "Supply can be inflated",
    ),
    selector(
        [0xdb, 0x2e, 0x21, 0xbc],
        "emergencyWithdraw()",
        RiskTier::High,
        "Funds can be pulled out in one call",
    ),
    selector(
        [0x41, 0xc0, 0xe1, 0xb5],
        "kill()",
        RiskTier::High,
        "Contract can be destroyed",
    ),
    selector(
        [0x83, 0x19, 0x7e, 0xf0],
        "destroy()",
        RiskTier::High,
        "Contract can be destroyed",
    ),
    selector(
        [0x42, 0x96, 0x6c, 0x68],
        "burn(uint256)",
        RiskTier::Medium,
        "Tokens can be burned",
    ),
    selector(
        [0x79, 0xcc, 0x67, 0x90],
        "burnFrom(address,uint256)",
        RiskTier::Medium,
        "Tokens can be burned from other holders with allowance",
    ),
    selector(
        [0x3c, 0xcf, 0xd6, 0x0b],
        "withdraw()",
        RiskTier::Medium,
        "Contract balance can be withdrawn",
    ),
    selector(
        [0x2e, 0x1a, 0x7d, 0x4d],
        "withdraw(uint256)",
        RiskTier::Medium,
        "Contract balance can be withdrawn",
    ),
    selector(
        [0xc9, 0x56, 0x7b, 0xf9],
        "openTrading()",
        RiskTier::Medium,
        "Trading is gated behind an owner switch",
    ),
    selector(
        [0xc4, 0x9b, 0x9a, 0x80],
        "setSwapAndLiquifyEnabled(bool)",
        RiskTier::Medium,
        "Owner controls automatic swap-and-liquify",
    ),
];

/// Opcode markers. Least precise signal: these bytes also occur as push data.
pub const DANGEROUS_OPCODES: &[SignatureEntry] = &[
    opcode(
        0xff,
        "SELFDESTRUCT",
        "Contract can self-destruct and forward its balance",
    ),
    opcode(
        0xf4,
        "DELEGATECALL",
        "Executes foreign code in this contract's storage context",
    ),
    opcode(
        0xf2,
        "CALLCODE",
        "Deprecated foreign-code call in this contract's context",
    ),
];

// ============================================
// ABI KEYWORD VOCABULARIES
// ============================================

/// Matched with "contains" against lowercased ABI function names
pub const OWNER_KEYWORDS: &[&str] = &[
    "settax", "setfee", "setmax", "setlimit", "pause", "unpause", "blacklist", "whitelist",
];

/// Owner keywords that count as high-risk signals
pub const OWNER_HIGH_RISK_KEYWORDS: &[&str] = &["blacklist"];

/// Matched with "starts-with" against lowercased ABI function names
pub const DANGEROUS_KEYWORDS: &[&str] = &[
    "mint",
    "burn",
    "withdraw",
    "emergencywithdraw",
    "rug",
    "swapandliquify",
    "delegatecall",
];

/// Human-readable meaning of an ABI keyword hit
pub fn keyword_description(keyword: &str) -> &'static str {
    match keyword {
        "settax" => "Owner can change transfer taxes",
        "setfee" => "Owner can change fees",
        "setmax" => "Owner can change maximum amounts",
        "setlimit" => "Owner can change trading limits",
        "pause" | "unpause" => "Owner can pause transfers",
        "blacklist" => "Owner can blacklist addresses",
        "whitelist" => "Owner controls a whitelist",
        "mint" => "Tokens can be minted",
        "burn" => "Tokens can be burned",
        "withdraw" => "Funds can be withdrawn",
        "emergencywithdraw" => "Funds can be pulled out in an emergency path",
        "rug" => "Function name suggests a rug pull",
        "swapandliquify" => "Automatic swap-and-liquify logic",
        "delegatecall" => "Explicit delegatecall entry point",
        _ => "Matches a risky function name",
    }
}

// ============================================
// PENALTIES & THRESHOLDS
// ============================================

pub const BASELINE_SCORE: i32 = 100;

/// score >= this is labelled Low risk
pub const LABEL_LOW_MIN_SCORE: u8 = 80;
/// score >= this (and below Low) is labelled Medium risk
pub const LABEL_MEDIUM_MIN_SCORE: u8 = 50;

pub const VERIFIED_INCONCLUSIVE_PENALTY: u8 = 10;
pub const VERIFIED_FAIL_PENALTY: u8 = 30;

pub const PROXY_UPGRADEABLE_WITH_ADMIN_PENALTY: u8 = 15;
pub const PROXY_UPGRADEABLE_PENALTY: u8 = 12;
pub const PROXY_PASSIVE_WITH_ADMIN_PENALTY: u8 = 12;
pub const PROXY_PASSIVE_PENALTY: u8 = 5;

pub const OWNER_HIGH_RISK_PENALTY: u8 = 18;
pub const OWNER_MEDIUM_RISK_PENALTY: u8 = 8;
pub const OWNER_INCONCLUSIVE_PENALTY: u8 = 10;

pub const DANGER_MULTIPLE_HIGH_PENALTY: u8 = 30;
pub const DANGER_SINGLE_HIGH_PENALTY: u8 = 18;
pub const DANGER_MANY_MEDIUM_PENALTY: u8 = 12;
pub const DANGER_SOME_MEDIUM_PENALTY: u8 = 8;
pub const DANGER_INCONCLUSIVE_PENALTY: u8 = 12;

/// Medium signals needed for the "many medium" rung
pub const DANGER_MANY_MEDIUM_COUNT: usize = 3;

/// Token-mode informational thresholds
pub const LIQUIDITY_LOW_USD: f64 = 1_000.0;
pub const LIQUIDITY_HIGH_USD: f64 = 100_000.0;
pub const HOLDERS_MIN_COUNT: u64 = 50;
pub const HOLDERS_TOP10_MAX_PERCENT: f64 = 50.0;

pub const FALLBACK_KEY_FINDING: &str = "No critical issues detected";
pub const FALLBACK_GOOD_SIGN: &str = "Insufficient data to confirm positive signals";

// ============================================
// CONVERSION UTILITIES
// ============================================

/// Parse a 20-byte hex address (checksum not enforced)
pub fn parse_address(raw: &str) -> AppResult<Address> {
    Address::from_str(raw.trim()).map_err(|_| AppError::invalid_address(raw))
}

// ============================================
// INDICATOR TABLE
// ============================================

pub static INDICATORS: [IndicatorMeta; 6] = [
    IndicatorMeta {
        key: IndicatorKey::VerifiedSource,
        title: "Verified source",
        category: "Transparency",
        explanation: "Verified source code lets anyone audit what the contract actually does.",
        good_message: "Source code is verified",
        max_penalty: 30,
    },
    IndicatorMeta {
        key: IndicatorKey::Proxy,
        title: "Proxy / upgradeability",
        category: "Upgradeability",
        explanation: "Upgradeable proxies let an admin replace the logic after deployment.",
        good_message: "Not an upgradeable proxy",
        max_penalty: 15,
    },
    IndicatorMeta {
        key: IndicatorKey::OwnerPrivileges,
        title: "Owner privileges",
        category: "Centralization",
        explanation: "Owner-only switches such as fees, limits, pausing or blacklists can restrict holders.",
        good_message: "No privileged owner controls detected",
        max_penalty: 20,
    },
    IndicatorMeta {
        key: IndicatorKey::DangerousFunctions,
        title: "Dangerous functions",
        category: "Code risk",
        explanation: "Minting, withdrawals, self-destruct and delegatecall can move or inflate value.",
        good_message: "No dangerous functions detected",
        max_penalty: 30,
    },
    IndicatorMeta {
        key: IndicatorKey::Liquidity,
        title: "Liquidity",
        category: "Market",
        explanation: "Thin liquidity makes exits expensive and pools easy to drain. Informational only.",
        good_message: "Liquidity is deep",
        max_penalty: 0,
    },
    IndicatorMeta {
        key: IndicatorKey::HolderDistribution,
        title: "Holder distribution",
        category: "Market",
        explanation: "Concentrated holdings let a few wallets move the price. Informational only.",
        good_message: "Holdings are well distributed",
        max_penalty: 0,
    },
];

/// Metadata for an indicator key
pub fn indicator_meta(key: IndicatorKey) -> &'static IndicatorMeta {
    match key {
        IndicatorKey::VerifiedSource => &INDICATORS[0],
        IndicatorKey::Proxy => &INDICATORS[1],
        IndicatorKey::OwnerPrivileges => &INDICATORS[2],
        IndicatorKey::DangerousFunctions => &INDICATORS[3],
        IndicatorKey::Liquidity => &INDICATORS[4],
        IndicatorKey::HolderDistribution => &INDICATORS[5],
    }
}
