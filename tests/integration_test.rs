//! Integration tests for the contract risk classifier

use contract_risk::{
    analyze, AbiEntry, ContractAnalyzer, ContractSnapshot, ExplorerInfo, IndicatorKey, RiskLabel,
    ScanTelemetry, Status, TokenMarketInfo, INDICATORS,
};

const ADMIN: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

fn verified() -> ExplorerInfo {
    ExplorerInfo {
        is_verified: true,
        ..Default::default()
    }
}

#[test]
fn test_penalties_within_bounds() {
    let abi = vec![
        AbiEntry::function("mint"),
        AbiEntry::function("addToBlacklist"),
        AbiEntry::function("setTaxFee"),
        AbiEntry::function("rugPull"),
    ];
    let explorer = ExplorerInfo {
        proxy: true,
        proxy_admin: Some(ADMIN.to_string()),
        ..Default::default()
    };
    let bytecode = "0x633659cfe66340c10f1963db2e21bc6344337ea163f9f92be4fff4f2";

    for result in [
        analyze(None, None, None),
        analyze(Some(bytecode), Some(&abi), Some(&explorer)),
        analyze(Some(bytecode), None, Some(&ExplorerInfo::default())),
    ] {
        assert_eq!(result.findings.len(), 4);
        for finding in result.findings.values() {
            assert!(
                finding.penalty <= finding.key.max_penalty(),
                "{} exceeded its cap",
                finding.key
            );
        }
        assert!(result.score <= 100);
    }
}

#[test]
fn test_score_is_baseline_minus_penalties() {
    let abi = vec![AbiEntry::function("setTaxFee")];
    let result = analyze(
        Some("0x6080604052633659cfe6146340c10f19f4"),
        Some(&abi),
        Some(&ExplorerInfo {
            is_verified: true,
            proxy: true,
            proxy_admin: Some(ADMIN.to_string()),
            ..Default::default()
        }),
    );

    // 0 (verified) + 15 (upgradeable proxy with admin) + 8 (setTaxFee) + 30 (mint + DELEGATECALL)
    let penalties: u32 = result.findings.values().map(|f| f.penalty as u32).sum();
    assert_eq!(penalties, 53);
    assert_eq!(result.score, 47);
    assert_eq!(result.label, RiskLabel::High);
}

#[test]
fn test_label_matches_thresholds() {
    let results = [
        analyze(None, None, None),
        analyze(
            Some("0x6080604052"),
            Some(&[AbiEntry::function("transfer")]),
            Some(&verified()),
        ),
        analyze(Some("0x6340c10f19f4"), None, Some(&ExplorerInfo::default())),
    ];

    for result in results {
        let expected = match result.score {
            80..=100 => RiskLabel::Low,
            50..=79 => RiskLabel::Medium,
            _ => RiskLabel::High,
        };
        assert_eq!(result.label, expected, "score {}", result.score);
    }
}

#[test]
fn test_blacklist_selector_only() {
    let result = analyze(Some("0x60806040526344337ea1"), None, None);
    let owner = result.finding(IndicatorKey::OwnerPrivileges).unwrap();

    assert_eq!(owner.status, Status::Warn);
    assert_eq!(owner.penalty, 18);
}

#[test]
fn test_nothing_known_dangerous_inconclusive() {
    let result = analyze(None, None, None);
    let danger = result.finding(IndicatorKey::DangerousFunctions).unwrap();

    assert_eq!(danger.status, Status::Warn);
    assert_eq!(danger.penalty, 12);
}

#[test]
fn test_verified_with_empty_abi_passes() {
    let result = analyze(None, Some(&[]), Some(&verified()));
    let source = result.finding(IndicatorKey::VerifiedSource).unwrap();

    assert_eq!(source.status, Status::Pass);
    assert_eq!(source.penalty, 0);
}

#[test]
fn test_upgradeable_proxy_with_admin() {
    let explorer = ExplorerInfo {
        proxy_admin: Some(ADMIN.to_string()),
        ..Default::default()
    };
    let result = analyze(Some("0x633659cfe6"), None, Some(&explorer));
    let proxy = result.finding(IndicatorKey::Proxy).unwrap();

    assert_eq!(proxy.status, Status::Warn);
    assert_eq!(proxy.penalty, 15);
}

#[test]
fn test_two_high_dangerous_signals_fail() {
    let result = analyze(Some("0x6340c10f19f4"), None, None);
    let danger = result.finding(IndicatorKey::DangerousFunctions).unwrap();

    assert_eq!(danger.status, Status::Fail);
    assert_eq!(danger.penalty, 30);
}

#[test]
fn test_analysis_is_idempotent() {
    let abi = vec![AbiEntry::function("mint"), AbiEntry::function("pause")];
    let explorer = ExplorerInfo {
        proxy: true,
        ..Default::default()
    };

    let first = analyze(Some("0x633659cfe6ff"), Some(&abi), Some(&explorer));
    let second = analyze(Some("0x633659cfe6ff"), Some(&abi), Some(&explorer));

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first.to_report()).unwrap(),
        serde_json::to_string(&second.to_report()).unwrap()
    );
}

#[test]
fn test_report_lists_never_empty() {
    // All four indicators pass: key findings fall back
    let clean = analyze(
        Some("0x6080604052"),
        Some(&[AbiEntry::function("transfer")]),
        Some(&verified()),
    );
    assert_eq!(clean.score, 100);
    assert_eq!(clean.key_findings(), vec!["No critical issues detected".to_string()]);
    assert_eq!(clean.good_signs().len(), 4);

    // Nothing passes: good signs fall back
    let grim = analyze(
        Some("0x633659cfe66344337ea16340c10f19f4"),
        None,
        Some(&ExplorerInfo::default()),
    );
    assert!(grim.findings.values().all(|f| !f.is_pass()));
    assert_eq!(
        grim.good_signs(),
        vec!["Insufficient data to confirm positive signals".to_string()]
    );
    assert_eq!(grim.key_findings().len(), 4);
}

#[test]
fn test_report_json_shape() {
    let result = analyze(None, None, None);
    let report = serde_json::to_value(result.to_report()).unwrap();

    assert_eq!(report["score"], 68);
    assert_eq!(report["label"], "Medium");
    assert!(report["findings"]["verifiedSource"].is_object());
    assert!(report["keyFindings"].is_array());
    assert!(report["goodSigns"].is_array());
}

#[test]
fn test_snapshot_document_with_string_abi() {
    let doc = r#"{
        "bytecode": "0x6080604052636a1b2c3d",
        "abi": "[{\"type\":\"function\",\"name\":\"transfer\"},{\"type\":\"event\",\"name\":\"Transfer\"}]",
        "explorerInfo": { "isVerified": true, "contractName": "Token" }
    }"#;

    let snapshot = ContractSnapshot::from_json(doc).unwrap();
    assert_eq!(snapshot.abi.as_ref().map(Vec::len), Some(2));

    let result = ContractAnalyzer::analyze(&snapshot);
    assert_eq!(result.score, 100);
    assert_eq!(result.label, RiskLabel::Low);
}

#[test]
fn test_snapshot_document_malformed_abi_is_absent() {
    let doc = r#"{ "bytecode": "0x", "abi": "not json", "explorerInfo": null }"#;
    let snapshot = ContractSnapshot::from_json(doc).unwrap();

    assert!(snapshot.bytecode.is_none());
    assert!(snapshot.abi.is_none());
    assert_eq!(
        ContractAnalyzer::analyze(&snapshot),
        ContractAnalyzer::analyze(&ContractSnapshot::default())
    );
}

#[test]
fn test_snapshot_document_invalid() {
    let err = ContractSnapshot::from_json("{ bytecode: ").unwrap_err();
    assert_eq!(err.code_str(), "SNAPSHOT_PARSE");
}

#[test]
fn test_token_mode_informational() {
    let snapshot = ContractSnapshot::new(Some("0x6080604052"), None, Some(verified())).with_market(
        TokenMarketInfo {
            liquidity_usd: Some(250_000.0),
            holder_count: Some(4_000),
            top10_holder_percent: Some(81.0),
        },
    );
    let result = ContractAnalyzer::analyze(&snapshot);

    assert_eq!(result.findings.len(), 6);
    assert_eq!(result.finding(IndicatorKey::Liquidity).unwrap().status, Status::Pass);
    assert_eq!(
        result.finding(IndicatorKey::HolderDistribution).unwrap().status,
        Status::Warn
    );
    assert!(result.good_signs().contains(&"Liquidity is deep".to_string()));

    let without_market = ContractAnalyzer::analyze(&ContractSnapshot::new(
        Some("0x6080604052"),
        None,
        Some(verified()),
    ));
    assert_eq!(result.score, without_market.score);
}

#[test]
fn test_batch_telemetry() {
    let telemetry = ScanTelemetry::new();
    telemetry.record(&analyze(None, None, None));
    telemetry.record(&analyze(Some("0x6340c10f19f4"), None, Some(&ExplorerInfo::default())));
    telemetry.record_failure();

    let stats = telemetry.get_stats();
    assert_eq!(stats.total_analyzed, 2);
    assert_eq!(stats.total_failed, 1);
    assert_eq!(telemetry.label_count(RiskLabel::Medium), 1);
}

#[test]
fn test_indicator_table_serialises() {
    let json = serde_json::to_value(&INDICATORS).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 6);
    assert_eq!(json[0]["key"], "verifiedSource");
    assert_eq!(json[3]["maxPenalty"], 30);
}
