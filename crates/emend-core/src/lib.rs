//! # emend-core
//!
//! Deterministic correction synthesis engine for regulated documents.
//!
//! External checkers scan a document against a catalogue of regulatory
//! gates and hand this crate their verdicts; the engine rewrites the
//! offending text and returns the corrected document together with a
//! full, reproducible audit trail of what changed and why.
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: same text and violation set always produce
//!    the same corrected text and fingerprints, regardless of input
//!    ordering
//! 2. **At most one correction per violation** in a single pass
//! 3. **Idempotent**: re-running over already-corrected output leaves
//!    it unchanged
//! 4. **No panics on data**: malformed verdicts degrade to "no
//!    change", never to an error
//!
//! ## Example
//!
//! ```rust,ignore
//! use emend_core::{correct, DocumentType, Severity, Violation};
//!
//! let violations = vec![(
//!     "fair_clear".to_string(),
//!     Violation::fail(Severity::Critical, "Returns presented as guaranteed"),
//! )];
//! let result = correct("Guaranteed returns!", &violations, DocumentType::FinancialPromotion)?;
//!
//! assert!(!result.unchanged);
//! println!("{}", result.corrected_text);
//! for record in &result.corrections {
//!     println!("{} fixed by {}", record.rule_key, record.strategy_kind.as_str());
//! }
//! ```

pub mod catalog;
mod hashing;
pub mod strategies;
pub mod synthesizer;
pub mod types;
pub mod validator;

// Re-export main types at crate root
pub use catalog::{
    default_catalog, family_matches, CatalogError, FindReplaceRule, InsertPosition, InsertionRule,
    RuleCatalog, StructuralOp, StructuralRule,
};
pub use strategies::{
    Applied, CorrectionStrategy, FindReplaceStrategy, InsertionStrategy, StructuralStrategy,
    SuggestionStrategy, SynthesisContext,
};
pub use synthesizer::Synthesizer;
pub use types::{
    CorrectionMetadata, CorrectionRecord, DeterminismBlock, DocumentType, GateStatus, Severity,
    StrategyKind, SynthesisResult, Violation,
};
pub use validator::{CorrectionValidator, ValidationReport};

use thiserror::Error;

/// Errors surfaced by the engine's top-level entry points.
///
/// Only genuine configuration problems reach here; data-shaped issues
/// (unmatched violations, failed heuristics) degrade to "no change".
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Catalogue error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Correct a document against a batch of gate verdicts using the
/// built-in rule catalogue.
///
/// This is the main entry point. Callers with their own catalogues or
/// strategy sets should construct a [`Synthesizer`] directly.
pub fn correct(
    text: &str,
    violations: &[(String, Violation)],
    document_type: DocumentType,
) -> Result<SynthesisResult, EngineError> {
    let synthesizer = Synthesizer::with_default_rules(document_type);
    Ok(synthesizer.synthesize(text, violations))
}
