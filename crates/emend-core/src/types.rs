//! Core types for the correction synthesis engine.
//!
//! Violations come from external document checkers; everything else is
//! produced by the engine itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Verdict of a single regulatory gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GateStatus {
    Pass,
    Fail,
    Warning,
    NotApplicable,
}

impl GateStatus {
    /// Only failing and warning gates are candidates for correction.
    pub fn is_actionable(&self) -> bool {
        matches!(self, GateStatus::Fail | GateStatus::Warning)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GateStatus::Pass => "PASS",
            GateStatus::Fail => "FAIL",
            GateStatus::Warning => "WARNING",
            GateStatus::NotApplicable => "NOT_APPLICABLE",
        }
    }
}

/// Severity attached to a gate verdict.
///
/// Ordered so callers can compare (`severity >= Severity::High`).
/// `None` doubles as the "unknown" default for verdicts that omit it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::None => "none",
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

/// A gate verdict produced by an external checker.
///
/// Immutable once constructed; the engine never writes back into it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Gate outcome
    pub status: GateStatus,

    /// How serious the finding is
    #[serde(default)]
    pub severity: Severity,

    /// Human-readable description of the finding
    #[serde(default)]
    pub message: String,

    /// Optional free-text remediation hint, sometimes carrying a
    /// quoted literal to insert
    #[serde(default)]
    pub suggestion: Option<String>,

    /// Optional citation of the underlying legal source
    #[serde(default)]
    pub legal_source: Option<String>,
}

impl Violation {
    pub fn new(status: GateStatus, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            status,
            severity,
            message: message.into(),
            suggestion: None,
            legal_source: None,
        }
    }

    /// Shorthand for a failing verdict.
    pub fn fail(severity: Severity, message: impl Into<String>) -> Self {
        Self::new(GateStatus::Fail, severity, message)
    }

    /// Shorthand for a warning verdict.
    pub fn warning(severity: Severity, message: impl Into<String>) -> Self {
        Self::new(GateStatus::Warning, severity, message)
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_legal_source(mut self, source: impl Into<String>) -> Self {
        self.legal_source = Some(source.into());
        self
    }
}

/// The four correction strategy kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    SuggestionExtraction,
    FindReplace,
    TemplateInsertion,
    StructuralReorganization,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::SuggestionExtraction => "suggestion_extraction",
            StrategyKind::FindReplace => "find_replace",
            StrategyKind::TemplateInsertion => "template_insertion",
            StrategyKind::StructuralReorganization => "structural_reorganization",
        }
    }

    /// Fixed dispatch priority. Higher runs earlier.
    pub fn priority(&self) -> u8 {
        match self {
            StrategyKind::SuggestionExtraction => 20,
            StrategyKind::FindReplace => 30,
            StrategyKind::TemplateInsertion => 40,
            StrategyKind::StructuralReorganization => 60,
        }
    }

    /// Level order for multi-level synthesis: narrow fixes before
    /// broad structural moves.
    pub fn level_order() -> [StrategyKind; 4] {
        [
            StrategyKind::SuggestionExtraction,
            StrategyKind::FindReplace,
            StrategyKind::TemplateInsertion,
            StrategyKind::StructuralReorganization,
        ]
    }
}

/// What a strategy reports about one successful application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorrectionMetadata {
    /// Number of individual text changes made
    pub change_count: usize,

    /// Byte offsets (start, end) of the changed regions, measured in
    /// the text the strategy was applied to
    #[serde(default)]
    pub locations: Vec<(usize, usize)>,

    /// Why the change was made (rule rationale, concatenated when
    /// several rules of one family fired)
    #[serde(default)]
    pub rationale: String,

    /// Up to five example snippets of matched text
    #[serde(default)]
    pub samples: Vec<String>,
}

/// One logged, successfully applied text transformation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectionRecord {
    /// The gate this correction answers
    pub rule_key: String,

    /// Severity of the originating violation
    pub violation_severity: Severity,

    /// Which strategy produced the change
    pub strategy_kind: StrategyKind,

    /// Change details for the audit trail
    pub metadata: CorrectionMetadata,

    /// Signed length change (corrected - previous), in bytes
    pub length_delta: i64,
}

/// Reproducibility fingerprints for one synthesis run.
///
/// Diagnostic, not cryptographic: two runs over identical input must
/// report identical hashes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeterminismBlock {
    /// Stable hash over the original text and the sorted violation set
    pub input_hash: String,

    /// Stable hash over the final text, correction count, and the
    /// sorted distinct strategy kinds used
    pub output_hash: String,
}

/// Complete output of one correction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisResult {
    /// The document as received
    pub original_text: String,

    /// The document after all corrections
    pub corrected_text: String,

    /// Ledger of applied corrections, in application order
    pub corrections: Vec<CorrectionRecord>,

    /// True when no correction changed the text
    pub unchanged: bool,

    /// Number of ledger entries
    pub correction_count: usize,

    /// Sorted distinct strategy kind names that produced changes
    pub strategies_applied: Vec<String>,

    /// Reproducibility fingerprints
    pub determinism: DeterminismBlock,

    /// When this run completed (not part of the hashes)
    pub synthesized_at: DateTime<Utc>,
}

/// Document domain label used by context-aware synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    FinancialPromotion,
    PrivacyNotice,
    Contract,
    Generic,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::FinancialPromotion => "financial_promotion",
            DocumentType::PrivacyNotice => "privacy_notice",
            DocumentType::Contract => "contract",
            DocumentType::Generic => "generic",
        }
    }

    /// Rule-family keywords considered relevant for this document type.
    ///
    /// Warnings whose rule_key matches none of these (and not the
    /// caller's module identifier) are dropped by context-aware
    /// synthesis. Critical/high failures are always kept.
    pub fn relevance_keywords(&self) -> &'static [&'static str] {
        match self {
            DocumentType::FinancialPromotion => &[
                "fca",
                "fair_clear",
                "risk",
                "past_performance",
                "crypto",
                "promotion",
                "consumer_duty",
            ],
            DocumentType::PrivacyNotice => &["gdpr", "privacy", "consent", "data", "pecr"],
            DocumentType::Contract => &["contract", "term", "clause", "signature", "consumer"],
            DocumentType::Generic => &[],
        }
    }
}
