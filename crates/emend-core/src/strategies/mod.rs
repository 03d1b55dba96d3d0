//! Correction strategies: polymorphic transformers over a document and
//! one violation.
//!
//! Four kinds exist, each with a fixed dispatch priority. `can_handle`
//! is a cheap, pure pre-check; `apply` does the work and returns `None`
//! when no change turns out to be warranted. Neither is ever an error
//! path.

mod find_replace;
mod insertion;
mod structural;
mod suggestion;

pub use find_replace::FindReplaceStrategy;
pub use insertion::InsertionStrategy;
pub use structural::StructuralStrategy;
pub use suggestion::SuggestionStrategy;

use crate::types::{CorrectionMetadata, DocumentType, StrategyKind, Violation};

/// Call-scoped context handed to every `apply`.
#[derive(Debug, Clone, Copy)]
pub struct SynthesisContext {
    /// Domain label of the document being corrected
    pub document_type: DocumentType,
}

/// A successful strategy application: the new text plus audit details.
#[derive(Debug, Clone)]
pub struct Applied {
    pub text: String,
    pub metadata: CorrectionMetadata,
}

/// Common contract for the four correction strategies.
pub trait CorrectionStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// Dispatch priority; higher is tried first.
    fn priority(&self) -> u8 {
        self.kind().priority()
    }

    /// Cheap pre-check. Must not mutate state, and must be consistent
    /// with `apply`: a `true` here means `apply` is worth attempting.
    fn can_handle(&self, text: &str, rule_key: &str, violation: &Violation) -> bool;

    /// Attempt the transformation against the current document text.
    /// `None` means "no change warranted", not failure.
    fn apply(
        &self,
        text: &str,
        rule_key: &str,
        violation: &Violation,
        ctx: &SynthesisContext,
    ) -> Option<Applied>;
}

/// Truncate a snippet for audit previews, respecting char boundaries.
pub(crate) fn preview(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &text[..end])
}
