//! Post-hoc sanity checks over a synthesis outcome.
//!
//! The validator flags suspicious results; it never blocks or rolls
//! back a correction. Callers decide whether a flagged document goes
//! to human review.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::CorrectionRecord;

/// Corrected text shorter than this is treated as over-deletion.
const MIN_CORRECTED_LEN: usize = 10;

/// Advisory outcome of validating one synthesis result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// False when any error was raised; warnings never fail a report
    pub passed: bool,

    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Stateless checker over (original, corrected, ledger).
pub struct CorrectionValidator;

impl CorrectionValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(
        &self,
        original: &str,
        corrected: &str,
        ledger: &[CorrectionRecord],
    ) -> ValidationReport {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        // The unchanged case is always structurally valid, whatever
        // the document looks like.
        if corrected != original {
            if corrected.trim().is_empty() {
                errors.push("Corrected text is empty".to_string());
            } else if corrected.len() < MIN_CORRECTED_LEN {
                errors.push(format!(
                    "Corrected text suspiciously short ({} chars)",
                    corrected.len()
                ));
            }

            if !original.is_empty() {
                let ratio = corrected.len() as f64 / original.len() as f64;
                if ratio < 0.5 {
                    warnings.push(format!(
                        "Corrected text shrank to {:.0}% of the original; possible over-deletion",
                        ratio * 100.0
                    ));
                } else if ratio > 2.0 {
                    warnings.push(format!(
                        "Corrected text grew to {:.0}% of the original; possible over-insertion",
                        ratio * 100.0
                    ));
                }
            }
        }

        let mut seen = HashSet::new();
        for (index, record) in ledger.iter().enumerate() {
            if record.rule_key.is_empty() {
                errors.push(format!("Ledger entry {} has no rule_key tag", index));
            }
            if record.metadata.rationale.is_empty() && record.metadata.change_count == 0 {
                errors.push(format!("Ledger entry {} has no audit metadata", index));
            }
            if !seen.insert((record.rule_key.clone(), record.strategy_kind)) {
                warnings.push(format!(
                    "({}, {}) applied more than once; possible corrective loop",
                    record.rule_key,
                    record.strategy_kind.as_str()
                ));
            }
        }

        for message in &errors {
            warn!(%message, "validation error");
        }
        for message in &warnings {
            warn!(%message, "validation warning");
        }

        ValidationReport {
            passed: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

impl Default for CorrectionValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CorrectionMetadata, Severity, StrategyKind};

    fn record(rule_key: &str, kind: StrategyKind) -> CorrectionRecord {
        CorrectionRecord {
            rule_key: rule_key.to_string(),
            violation_severity: Severity::High,
            strategy_kind: kind,
            metadata: CorrectionMetadata {
                change_count: 1,
                locations: vec![(0, 5)],
                rationale: "test".to_string(),
                samples: vec![],
            },
            length_delta: 5,
        }
    }

    #[test]
    fn test_clean_result_passes() {
        let v = CorrectionValidator::new();
        let report = v.validate(
            "Guaranteed returns!",
            "potential (not guaranteed) returns!",
            &[record("fair_clear", StrategyKind::FindReplace)],
        );
        assert!(report.passed);
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_unchanged_never_errors() {
        let v = CorrectionValidator::new();
        for text in ["", "x", "a perfectly ordinary document"] {
            let report = v.validate(text, text, &[]);
            assert!(report.passed, "unchanged text {:?} must pass", text);
        }
    }

    #[test]
    fn test_empty_corrected_is_an_error() {
        let v = CorrectionValidator::new();
        let report = v.validate("A reasonable document.", "", &[]);
        assert!(!report.passed);
        assert!(report.errors[0].contains("empty"));
    }

    #[test]
    fn test_runaway_shrinkage_warns() {
        let v = CorrectionValidator::new();
        let original = "word ".repeat(40);
        let report = v.validate(&original, "much shorter now", &[]);
        assert!(report.passed);
        assert!(report.warnings.iter().any(|w| w.contains("over-deletion")));
    }

    #[test]
    fn test_runaway_growth_warns() {
        let v = CorrectionValidator::new();
        let corrected = "inserted wording ".repeat(40);
        let report = v.validate("tiny original text", &corrected, &[]);
        assert!(report.passed);
        assert!(report.warnings.iter().any(|w| w.contains("over-insertion")));
    }

    #[test]
    fn test_missing_rule_key_is_an_error() {
        let v = CorrectionValidator::new();
        let report = v.validate(
            "before text here",
            "after text here!",
            &[record("", StrategyKind::FindReplace)],
        );
        assert!(!report.passed);
        assert!(report.errors.iter().any(|e| e.contains("rule_key")));
    }

    #[test]
    fn test_duplicate_pair_warns() {
        let v = CorrectionValidator::new();
        let ledger = vec![
            record("fair_clear", StrategyKind::FindReplace),
            record("fair_clear", StrategyKind::FindReplace),
        ];
        let report = v.validate("before text here", "after text here!", &ledger);
        assert!(report.passed);
        assert!(report
            .warnings
            .iter()
            .any(|w| w.contains("corrective loop")));
    }

    #[test]
    fn test_same_rule_different_strategies_is_fine() {
        let v = CorrectionValidator::new();
        let ledger = vec![
            record("risk_warning", StrategyKind::SuggestionExtraction),
            record("risk_warning", StrategyKind::TemplateInsertion),
        ];
        let report = v.validate("before text here", "after text here!", &ledger);
        assert!(report.passed);
        assert!(report.warnings.is_empty());
    }
}
