//! Batch telemetry for the `contract-risk` binary
//!
//! Counts verdicts across a batch run. Lives beside the classifier, never inside it:
//! evaluation does not read or write these counters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use crate::models::types::{AnalysisResult, RiskLabel, Status};

/// Aggregated statistics for reporting
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ScanStats {
    /// Snapshots analysed
    pub total_analyzed: u64,
    /// Snapshots that failed to load
    pub total_failed: u64,
    /// Analyses per label
    pub by_label: BTreeMap<String, u64>,
    /// Non-passing verdicts per indicator
    pub flagged_by_indicator: BTreeMap<String, u64>,
    /// Mean score over analysed snapshots
    pub avg_score: f64,
    pub period_start: Option<DateTime<Utc>>,
    pub period_end: Option<DateTime<Utc>>,
}

impl ScanStats {
    /// Export as JSON
    pub fn to_json(&self, pretty: bool) -> String {
        let rendered = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        rendered.unwrap_or_default()
    }

    /// Text block for terminals
    pub fn text_summary(&self) -> String {
        let label = |name: &str| self.by_label.get(name).copied().unwrap_or(0);

        let mut out = format!(
            "📊 Batch Summary\n   Analyzed: {} | Failed: {} | Avg Score: {:.1}\n   ✅ Low: {} | 🟠 Medium: {} | 🔴 High: {}",
            self.total_analyzed,
            self.total_failed,
            self.avg_score,
            label("Low"),
            label("Medium"),
            label("High"),
        );

        for (indicator, count) in &self.flagged_by_indicator {
            out.push_str(&format!("\n   {:<20} flagged {}", indicator, count));
        }

        out
    }
}

/// Thread-safe verdict counters
pub struct ScanTelemetry {
    total_analyzed: AtomicU64,
    total_failed: AtomicU64,
    total_score: AtomicU64,
    labels: RwLock<BTreeMap<String, u64>>,
    flagged: RwLock<BTreeMap<String, u64>>,
    session_start: DateTime<Utc>,
}

impl ScanTelemetry {
    pub fn new() -> Self {
        Self {
            total_analyzed: AtomicU64::new(0),
            total_failed: AtomicU64::new(0),
            total_score: AtomicU64::new(0),
            labels: RwLock::new(BTreeMap::new()),
            flagged: RwLock::new(BTreeMap::new()),
            session_start: Utc::now(),
        }
    }

    /// Record a completed analysis
    pub fn record(&self, result: &AnalysisResult) {
        self.total_analyzed.fetch_add(1, Ordering::Relaxed);
        self.total_score.fetch_add(result.score as u64, Ordering::Relaxed);

        if let Ok(mut labels) = self.labels.write() {
            *labels.entry(result.label.as_str().to_string()).or_insert(0) += 1;
        }

        if let Ok(mut flagged) = self.flagged.write() {
            for finding in result.findings.values() {
                if finding.status != Status::Pass {
                    *flagged.entry(finding.key.as_str().to_string()).or_insert(0) += 1;
                }
            }
        }
    }

    /// Record a snapshot that could not be loaded
    pub fn record_failure(&self) {
        self.total_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Count of analyses that ended with the given label
    pub fn label_count(&self, label: RiskLabel) -> u64 {
        self.labels
            .read()
            .map(|labels| labels.get(label.as_str()).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Get current statistics
    pub fn get_stats(&self) -> ScanStats {
        let total_analyzed = self.total_analyzed.load(Ordering::Relaxed);
        let total_score = self.total_score.load(Ordering::Relaxed);

        let avg_score = if total_analyzed > 0 {
            total_score as f64 / total_analyzed as f64
        } else {
            0.0
        };

        ScanStats {
            total_analyzed,
            total_failed: self.total_failed.load(Ordering::Relaxed),
            by_label: self.labels.read().map(|l| l.clone()).unwrap_or_default(),
            flagged_by_indicator: self.flagged.read().map(|f| f.clone()).unwrap_or_default(),
            avg_score,
            period_start: Some(self.session_start),
            period_end: Some(Utc::now()),
        }
    }
}

impl Default for ScanTelemetry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::types::{Finding, IndicatorKey};

    fn result(score: u8, failing: Option<IndicatorKey>) -> AnalysisResult {
        let mut findings = BTreeMap::new();
        for key in IndicatorKey::SCORING {
            let finding = if Some(key) == failing {
                Finding::fail(key, "bad", 10)
            } else {
                Finding::pass(key, "ok")
            };
            findings.insert(key, finding);
        }
        AnalysisResult {
            findings,
            score,
            label: RiskLabel::from_score(score),
        }
    }

    #[test]
    fn test_collector_basic() {
        let telemetry = ScanTelemetry::new();
        telemetry.record(&result(100, None));
        telemetry.record(&result(40, Some(IndicatorKey::DangerousFunctions)));
        telemetry.record_failure();

        let stats = telemetry.get_stats();
        assert_eq!(stats.total_analyzed, 2);
        assert_eq!(stats.total_failed, 1);
        assert_eq!(stats.avg_score, 70.0);
        assert_eq!(stats.by_label.get("Low"), Some(&1));
        assert_eq!(stats.by_label.get("High"), Some(&1));
        assert_eq!(stats.flagged_by_indicator.get("dangerousFunctions"), Some(&1));
        assert_eq!(telemetry.label_count(RiskLabel::Medium), 0);
    }

    #[test]
    fn test_empty_stats() {
        let stats = ScanTelemetry::new().get_stats();
        assert_eq!(stats.total_analyzed, 0);
        assert_eq!(stats.avg_score, 0.0);
        assert!(stats.text_summary().contains("Analyzed: 0"));
    }

    #[test]
    fn test_stats_json_export() {
        let stats = ScanStats {
            total_analyzed: 12,
            avg_score: 61.5,
            ..Default::default()
        };
        let json = stats.to_json(false);
        assert!(json.contains("\"total_analyzed\":12"));
        assert!(json.contains("avg_score"));
    }
}
