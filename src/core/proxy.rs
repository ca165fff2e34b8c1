//! Proxy / upgradeability indicator
//!
//! Three independent signals mark a proxy: the explorer flag, proxy selectors in
//! the bytecode, and the EIP-1967 implementation slot constant. Severity then
//! depends on whether the code can upgrade itself and whether an admin is known.

use alloy_primitives::Address;
use serde_json::json;

use crate::core::analyzer::EvaluationInput;
use crate::models::types::{Finding, IndicatorKey, Status};
use crate::utils::bytecode::{detect_eip1967_slot, detect_selectors, marker_evidence};
use crate::utils::constants::{
    SignatureEntry, PROXY_PASSIVE_PENALTY, PROXY_PASSIVE_WITH_ADMIN_PENALTY, PROXY_SELECTORS,
    PROXY_UPGRADEABLE_PENALTY, PROXY_UPGRADEABLE_WITH_ADMIN_PENALTY, UPGRADE_SELECTORS,
};

const KEY: IndicatorKey = IndicatorKey::Proxy;

/// Everything the proxy rules look at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxySignals {
    pub explorer_flag: bool,
    pub selectors: Vec<&'static SignatureEntry>,
    pub eip1967_slot: bool,
    pub admin: Option<Address>,
    pub implementation: Option<Address>,
}

impl ProxySignals {
    pub fn collect(input: &EvaluationInput<'_>) -> Self {
        Self {
            explorer_flag: input.explorer.is_some_and(|info| info.proxy),
            selectors: detect_selectors(input.bytecode, PROXY_SELECTORS),
            eip1967_slot: detect_eip1967_slot(input.bytecode),
            admin: input.explorer.and_then(|info| info.admin_address()),
            implementation: input.explorer.and_then(|info| info.implementation_address()),
        }
    }

    pub fn is_proxy(&self) -> bool {
        self.explorer_flag || !self.selectors.is_empty() || self.eip1967_slot
    }

    /// An upgrade-capable selector was found
    pub fn is_upgradeable(&self) -> bool {
        self.selectors
            .iter()
            .any(|entry| UPGRADE_SELECTORS.contains(&entry.marker))
    }

    /// Names of the signals that fired
    pub fn fired(&self) -> Vec<&'static str> {
        let mut fired = Vec::new();
        if self.explorer_flag {
            fired.push("explorerFlag");
        }
        if !self.selectors.is_empty() {
            fired.push("proxySelectors");
        }
        if self.eip1967_slot {
            fired.push("eip1967Slot");
        }
        fired
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyVerdict {
    NotProxy,
    /// Upgrade function plus a live admin
    UpgradeableWithAdmin,
    /// Upgrade function, admin unknown
    Upgradeable,
    /// Proxy without upgrade function, admin known
    PassiveWithAdmin,
    /// Proxy without upgrade function or known admin
    Passive,
}

impl ProxyVerdict {
    pub fn status(&self) -> Status {
        match self {
            Self::NotProxy => Status::Pass,
            _ => Status::Warn,
        }
    }

    pub fn penalty(&self) -> u8 {
        match self {
            Self::NotProxy => 0,
            Self::UpgradeableWithAdmin => PROXY_UPGRADEABLE_WITH_ADMIN_PENALTY,
            Self::Upgradeable => PROXY_UPGRADEABLE_PENALTY,
            Self::PassiveWithAdmin => PROXY_PASSIVE_WITH_ADMIN_PENALTY,
            Self::Passive => PROXY_PASSIVE_PENALTY,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            Self::NotProxy => "No proxy pattern detected",
            Self::UpgradeableWithAdmin => {
                "Upgradeable proxy with an active admin: contract logic can be replaced"
            }
            Self::Upgradeable => "Upgradeable proxy: upgrade functions present, admin unknown",
            Self::PassiveWithAdmin => "Proxy contract controlled by a known admin",
            Self::Passive => "Proxy pattern detected without an upgrade function",
        }
    }
}

/// First matching rule wins
pub fn classify(signals: &ProxySignals) -> ProxyVerdict {
    if !signals.is_proxy() {
        return ProxyVerdict::NotProxy;
    }

    if signals.is_upgradeable() && signals.admin.is_some() {
        return ProxyVerdict::UpgradeableWithAdmin;
    }

    if signals.is_upgradeable() {
        return ProxyVerdict::Upgradeable;
    }

    if signals.admin.is_some() {
        return ProxyVerdict::PassiveWithAdmin;
    }

    ProxyVerdict::Passive
}

pub fn evaluate(input: &EvaluationInput<'_>) -> Finding {
    let signals = ProxySignals::collect(input);
    let verdict = classify(&signals);

    let evidence = json!({
        "signals": signals.fired(),
        "explorerFlag": signals.explorer_flag,
        "eip1967Slot": signals.eip1967_slot,
        "upgradeable": signals.is_upgradeable(),
        "selectors": signals.selectors.iter().map(|e| marker_evidence(e)).collect::<Vec<_>>(),
        "implementation": signals.implementation.map(|a| a.to_string()),
        "proxyAdmin": signals.admin.map(|a| a.to_string()),
    });

    Finding::new(KEY, verdict.status(), verdict.reason(), verdict.penalty()).with_evidence(evidence)
}
