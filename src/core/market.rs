//! Token-mode market indicators
//!
//! Liquidity and holder distribution are informational: they surface in the
//! report lists but carry no penalty.

use serde_json::json;

use crate::models::types::{Finding, IndicatorKey, TokenMarketInfo};
use crate::utils::constants::{
    HOLDERS_MIN_COUNT, HOLDERS_TOP10_MAX_PERCENT, LIQUIDITY_HIGH_USD, LIQUIDITY_LOW_USD,
};

pub fn evaluate_liquidity(market: Option<&TokenMarketInfo>) -> Finding {
    let key = IndicatorKey::Liquidity;
    let Some(liquidity) = market.and_then(|m| m.liquidity_usd) else {
        return Finding::warn(key, "Liquidity inconclusive: no pool data available", 0)
            .with_evidence(json!({ "liquidityUsd": null }));
    };

    let finding = if liquidity < LIQUIDITY_LOW_USD {
        Finding::warn(key, format!("Very low liquidity: ${:.0}", liquidity), 0)
    } else if liquidity > LIQUIDITY_HIGH_USD {
        Finding::pass(key, format!("Deep liquidity: ${:.0}", liquidity))
    } else {
        Finding::warn(key, format!("Moderate liquidity: ${:.0}", liquidity), 0)
    };

    finding.with_evidence(json!({
        "liquidityUsd": liquidity,
        "lowThresholdUsd": LIQUIDITY_LOW_USD,
        "highThresholdUsd": LIQUIDITY_HIGH_USD,
    }))
}

pub fn evaluate_holders(market: Option<&TokenMarketInfo>) -> Finding {
    let key = IndicatorKey::HolderDistribution;
    let holders = market.and_then(|m| m.holder_count);
    let top10 = market.and_then(|m| m.top10_holder_percent);

    let evidence = json!({
        "holderCount": holders,
        "top10HolderPercent": top10,
    });

    if holders.is_none() && top10.is_none() {
        return Finding::warn(key, "Holder distribution inconclusive: no holder data", 0)
            .with_evidence(evidence);
    }

    if let Some(share) = top10.filter(|share| *share > HOLDERS_TOP10_MAX_PERCENT) {
        return Finding::warn(
            key,
            format!("Top 10 holders own {:.1}% of supply", share),
            0,
        )
        .with_evidence(evidence);
    }

    if let Some(count) = holders.filter(|count| *count < HOLDERS_MIN_COUNT) {
        return Finding::warn(key, format!("Only {} holders", count), 0).with_evidence(evidence);
    }

    Finding::pass(key, "Holdings are spread across many wallets").with_evidence(evidence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::types::Status;

    fn market(liquidity: Option<f64>, holders: Option<u64>, top10: Option<f64>) -> TokenMarketInfo {
        TokenMarketInfo {
            liquidity_usd: liquidity,
            holder_count: holders,
            top10_holder_percent: top10,
        }
    }

    #[test]
    fn test_liquidity_bands() {
        let low = evaluate_liquidity(Some(&market(Some(500.0), None, None)));
        assert_eq!(low.status, Status::Warn);
        assert!(low.reason.contains("Very low"));

        let mid = evaluate_liquidity(Some(&market(Some(50_000.0), None, None)));
        assert_eq!(mid.status, Status::Warn);
        assert!(mid.reason.contains("Moderate"));

        let deep = evaluate_liquidity(Some(&market(Some(250_000.0), None, None)));
        assert_eq!(deep.status, Status::Pass);
    }

    #[test]
    fn test_liquidity_missing() {
        let finding = evaluate_liquidity(None);
        assert_eq!(finding.status, Status::Warn);
        assert!(finding.reason.contains("inconclusive"));
    }

    #[test]
    fn test_holders() {
        assert_eq!(evaluate_holders(None).status, Status::Warn);

        let concentrated = evaluate_holders(Some(&market(None, Some(5_000), Some(72.5))));
        assert_eq!(concentrated.status, Status::Warn);
        assert!(concentrated.reason.contains("72.5%"));

        let few = evaluate_holders(Some(&market(None, Some(12), Some(20.0))));
        assert_eq!(few.reason, "Only 12 holders");

        let spread = evaluate_holders(Some(&market(None, Some(5_000), Some(20.0))));
        assert_eq!(spread.status, Status::Pass);
    }

    #[test]
    fn test_never_penalised() {
        let m = market(Some(1.0), Some(1), Some(100.0));
        assert_eq!(evaluate_liquidity(Some(&m)).penalty, 0);
        assert_eq!(evaluate_holders(Some(&m)).penalty, 0);
    }
}
