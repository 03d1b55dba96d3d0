//! Template insertion strategy: places mandated wording (risk
//! warnings, rights notices, governing-law clauses) at a position
//! keyword resolved against the current document.

use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::catalog::{family_matches, InsertPosition, RuleCatalog};
use crate::types::{CorrectionMetadata, StrategyKind, Violation};

use super::{preview, Applied, CorrectionStrategy, SynthesisContext};

lazy_static! {
    /// Lines that mark the signature/date block of a document.
    /// Indentation is `[ \t]*` rather than `\s*` so the match cannot
    /// swallow the newline before the line.
    static ref SIGNATURE_PATTERN: Regex = Regex::new(
        r"(?im)^[ \t]*(signed\b|signature\b|dated?\b[ \t]*[:.]?|yours (sincerely|faithfully)|sincerely,|_{3,})"
    )
    .unwrap();
}

pub struct InsertionStrategy {
    catalog: Arc<RuleCatalog>,
}

impl InsertionStrategy {
    pub fn new(catalog: Arc<RuleCatalog>) -> Self {
        Self { catalog }
    }

    /// Resolve a position keyword to a byte offset in `text`.
    fn resolve_offset(text: &str, position: InsertPosition) -> usize {
        match position {
            InsertPosition::Start => leading_heading_end(text).unwrap_or(0),
            InsertPosition::End => text.len(),
            InsertPosition::AfterHeader => match text.find("\n\n") {
                Some(idx) => idx + 2,
                None => floor_char_boundary(text, text.len() / 10),
            },
            InsertPosition::BeforeSignature => SIGNATURE_PATTERN
                .find(text)
                .map(|m| m.start())
                .unwrap_or(text.len()),
        }
    }
}

impl CorrectionStrategy for InsertionStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::TemplateInsertion
    }

    fn can_handle(&self, _text: &str, rule_key: &str, _violation: &Violation) -> bool {
        self.catalog
            .insertion_rules(None)
            .keys()
            .any(|family| family_matches(family, rule_key))
    }

    fn apply(
        &self,
        text: &str,
        rule_key: &str,
        _violation: &Violation,
        _ctx: &SynthesisContext,
    ) -> Option<Applied> {
        let mut current = text.to_string();
        let mut change_count = 0usize;
        let mut locations = Vec::new();
        let mut samples = Vec::new();
        let mut rationales = Vec::new();

        for (family, rules) in self.catalog.insertion_rules(None) {
            if !family_matches(family, rule_key) {
                continue;
            }

            for rule in rules {
                // Activation condition is evaluated against the current
                // (possibly already-modified) text; absent means always.
                if let Some(condition) = &rule.condition {
                    if !condition.is_match(&current) {
                        continue;
                    }
                }

                // Idempotence guard: never insert wording that is
                // already present verbatim.
                if current.contains(&rule.template) {
                    continue;
                }

                let offset = Self::resolve_offset(&current, rule.position);
                debug!(
                    family,
                    position = rule.position.as_str(),
                    offset,
                    "inserting template"
                );

                current = insert_block(&current, offset, &rule.template);
                change_count += 1;
                locations.push((offset, offset + rule.template.len()));
                samples.push(preview(&rule.template, 60));
                rationales.push(format!(
                    "Inserted required wording at {}",
                    rule.position.as_str()
                ));
            }
        }

        if change_count == 0 {
            return None;
        }

        Some(Applied {
            text: current,
            metadata: CorrectionMetadata {
                change_count,
                locations,
                rationale: rationales.join("; "),
                samples,
            },
        })
    }
}

/// End offset of a leading heading line, if the document has one.
///
/// A heading is either a `#`-prefixed line or a first line whose
/// letters are all uppercase.
fn leading_heading_end(text: &str) -> Option<usize> {
    let first_line = text.lines().next()?;
    let is_md_heading = first_line.trim_start().starts_with('#');
    let has_letters = first_line.chars().any(|c| c.is_alphabetic());
    let is_all_caps = has_letters && !first_line.chars().any(|c| c.is_lowercase());

    if is_md_heading || is_all_caps {
        Some(first_line.len())
    } else {
        None
    }
}

/// Insert `template` at `offset` with a blank line on each side,
/// normalizing the surrounding newlines.
fn insert_block(text: &str, offset: usize, template: &str) -> String {
    let before = text[..offset].trim_end_matches('\n');
    let after = text[offset..].trim_start_matches('\n');

    match (before.is_empty(), after.is_empty()) {
        (true, true) => template.to_string(),
        (true, false) => format!("{}\n\n{}", template, after),
        (false, true) => format!("{}\n\n{}", before, template),
        (false, false) => format!("{}\n\n{}\n\n{}", before, template, after),
    }
}

/// Largest char boundary at or below `index`.
fn floor_char_boundary(text: &str, index: usize) -> usize {
    let mut i = index.min(text.len());
    while !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_catalog;
    use crate::types::{DocumentType, Severity};

    fn strategy() -> InsertionStrategy {
        InsertionStrategy::new(Arc::new(default_catalog()))
    }

    fn ctx() -> SynthesisContext {
        SynthesisContext {
            document_type: DocumentType::FinancialPromotion,
        }
    }

    fn warning() -> Violation {
        Violation::warning(Severity::Medium, "required wording missing")
    }

    #[test]
    fn test_cooling_off_appended_when_condition_matches() {
        let s = strategy();
        let text = "Invest in crypto today and watch your money grow.";

        assert!(s.can_handle(text, "crypto_promotion.cooling_off", &warning()));
        let applied = s
            .apply(text, "crypto_promotion.cooling_off", &warning(), &ctx())
            .unwrap();

        assert!(applied.text.contains("cooling-off period"));
        assert!(applied.text.starts_with("Invest in crypto"));
        assert_eq!(applied.metadata.change_count, 1);
    }

    #[test]
    fn test_condition_not_satisfied_no_insertion() {
        let s = strategy();
        let text = "Invest in fine wine today.";

        // can_handle is true (the family matches) but apply declines
        assert!(s.can_handle(text, "crypto_promotion.cooling_off", &warning()));
        assert!(s
            .apply(text, "crypto_promotion.cooling_off", &warning(), &ctx())
            .is_none());
    }

    #[test]
    fn test_template_already_present_is_skipped() {
        let s = strategy();
        let first = s
            .apply(
                "A crypto product.",
                "crypto_promotion.cooling_off",
                &warning(),
                &ctx(),
            )
            .unwrap();

        // second pass over the corrected text inserts nothing
        assert!(s
            .apply(&first.text, "crypto_promotion.cooling_off", &warning(), &ctx())
            .is_none());
    }

    #[test]
    fn test_start_insertion_respects_heading() {
        let s = strategy();
        let text = "# Fund Brochure\n\nBuy our fund.";
        let applied = s.apply(text, "risk_warning", &warning(), &ctx()).unwrap();

        assert!(applied.text.starts_with("# Fund Brochure"));
        let heading_pos = applied.text.find("# Fund Brochure").unwrap();
        let warning_pos = applied.text.find("Capital at risk").unwrap();
        let body_pos = applied.text.find("Buy our fund").unwrap();
        assert!(heading_pos < warning_pos && warning_pos < body_pos);
    }

    #[test]
    fn test_start_insertion_without_heading_goes_first() {
        let s = strategy();
        let applied = s
            .apply("Buy our fund.", "risk_warning", &warning(), &ctx())
            .unwrap();
        assert!(applied.text.starts_with("Capital at risk"));
    }

    #[test]
    fn test_all_caps_first_line_treated_as_heading() {
        assert_eq!(leading_heading_end("FUND BROCHURE\nBody."), Some(13));
        assert_eq!(leading_heading_end("Fund brochure\nBody."), None);
    }

    #[test]
    fn test_before_signature_offset() {
        let text = "Terms of the agreement.\n\nSigned: ____________\nDate: 2026-01-01";
        let offset = InsertionStrategy::resolve_offset(text, InsertPosition::BeforeSignature);
        assert_eq!(offset, text.find("Signed").unwrap());
    }

    #[test]
    fn test_before_signature_falls_back_to_end() {
        let text = "No signature block here.";
        let offset = InsertionStrategy::resolve_offset(text, InsertPosition::BeforeSignature);
        assert_eq!(offset, text.len());
    }

    #[test]
    fn test_after_header_offset() {
        let text = "First block.\n\nSecond block.";
        assert_eq!(
            InsertionStrategy::resolve_offset(text, InsertPosition::AfterHeader),
            text.find("\n\n").unwrap() + 2
        );

        // no double newline: 10% of length
        let plain = "abcdefghij".repeat(3);
        assert_eq!(
            InsertionStrategy::resolve_offset(&plain, InsertPosition::AfterHeader),
            3
        );
    }

    #[test]
    fn test_governing_law_inserted_before_signature() {
        let s = strategy();
        let text = "The parties agree to these terms.\n\nSigned: ____________";
        let applied = s.apply(text, "contract.governing_law", &warning(), &ctx()).unwrap();

        let law_pos = applied.text.find("governed by the law").unwrap();
        let signed_pos = applied.text.find("Signed").unwrap();
        assert!(law_pos < signed_pos);
    }
}
