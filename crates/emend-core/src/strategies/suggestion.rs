//! Suggestion extraction strategy: the fallback for violations with no
//! codified rule but an actionable free-text hint.
//!
//! Looks for an embedded literal in the verdict's `suggestion` field
//! (patterns like `Add: "…"` or `Include: '…'`) and appends it
//! verbatim to the document.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::types::{CorrectionMetadata, StrategyKind, Violation};

use super::{preview, Applied, CorrectionStrategy, SynthesisContext};

lazy_static! {
    /// `Add: "…"`, `Include: "…"`, `Insert … : "…"` with double quotes
    static ref DIRECTIVE_DOUBLE_QUOTED: Regex = Regex::new(
        r#"(?i)\b(?:add|include|insert|append|state)\b[^:"']*:\s*"([^"]+)""#
    )
    .unwrap();

    /// Same, with single quotes
    static ref DIRECTIVE_SINGLE_QUOTED: Regex = Regex::new(
        r#"(?i)\b(?:add|include|insert|append|state)\b[^:"']*:\s*'([^']+)'"#
    )
    .unwrap();

    /// Any free-standing quoted literal long enough to be wording
    static ref BARE_QUOTED: Regex = Regex::new(r#""([^"]{10,})""#).unwrap();

    /// `Add … : rest-of-line`, unquoted
    static ref DIRECTIVE_COLON: Regex = Regex::new(
        r"(?i)\b(?:add|include|insert|append)\b[^:\n]*:\s*(\S[^\n]*)"
    )
    .unwrap();
}

pub struct SuggestionStrategy;

impl SuggestionStrategy {
    pub fn new() -> Self {
        Self
    }

    /// Pull an insertable literal out of a free-text suggestion.
    pub(crate) fn extract_literal(suggestion: &str) -> Option<String> {
        for pattern in [
            &*DIRECTIVE_DOUBLE_QUOTED,
            &*DIRECTIVE_SINGLE_QUOTED,
            &*BARE_QUOTED,
            &*DIRECTIVE_COLON,
        ] {
            if let Some(caps) = pattern.captures(suggestion) {
                let literal = caps.get(1).map(|m| m.as_str().trim().to_string());
                if let Some(literal) = literal {
                    if !literal.is_empty() {
                        return Some(literal);
                    }
                }
            }
        }
        None
    }
}

impl Default for SuggestionStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl CorrectionStrategy for SuggestionStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::SuggestionExtraction
    }

    fn can_handle(&self, _text: &str, _rule_key: &str, violation: &Violation) -> bool {
        violation
            .suggestion
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty())
    }

    fn apply(
        &self,
        text: &str,
        rule_key: &str,
        violation: &Violation,
        _ctx: &SynthesisContext,
    ) -> Option<Applied> {
        let suggestion = violation.suggestion.as_deref()?;
        let literal = Self::extract_literal(suggestion)?;

        // already present (case-insensitive) means nothing to do
        if text.to_lowercase().contains(&literal.to_lowercase()) {
            return None;
        }

        debug!(rule_key, literal = %preview(&literal, 60), "appending suggested wording");

        let appended = if text.is_empty() {
            literal.clone()
        } else {
            format!("{}\n\n{}", text.trim_end_matches('\n'), literal)
        };
        let location = (appended.len() - literal.len(), appended.len());

        Some(Applied {
            text: appended,
            metadata: CorrectionMetadata {
                change_count: 1,
                locations: vec![location],
                rationale: format!("Appended wording suggested by {}", rule_key),
                samples: vec![preview(&literal, 60)],
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DocumentType, Severity};

    fn ctx() -> SynthesisContext {
        SynthesisContext {
            document_type: DocumentType::Generic,
        }
    }

    #[test]
    fn test_extract_directive_double_quoted() {
        let literal =
            SuggestionStrategy::extract_literal(r#"Add a warning: "Capital at risk.""#).unwrap();
        assert_eq!(literal, "Capital at risk.");
    }

    #[test]
    fn test_extract_directive_single_quoted() {
        let literal =
            SuggestionStrategy::extract_literal("Include: 'Seek independent advice.'").unwrap();
        assert_eq!(literal, "Seek independent advice.");
    }

    #[test]
    fn test_extract_bare_quote() {
        let literal = SuggestionStrategy::extract_literal(
            r#"The document should say "Past performance is not a guide"."#,
        )
        .unwrap();
        assert_eq!(literal, "Past performance is not a guide");
    }

    #[test]
    fn test_extract_colon_delimited() {
        let literal =
            SuggestionStrategy::extract_literal("Add the following: Fees apply to all accounts")
                .unwrap();
        assert_eq!(literal, "Fees apply to all accounts");
    }

    #[test]
    fn test_no_extractable_literal() {
        assert!(SuggestionStrategy::extract_literal("Please review this section.").is_none());
    }

    #[test]
    fn test_apply_appends_literal() {
        let s = SuggestionStrategy::new();
        let v = Violation::warning(Severity::Low, "missing wording")
            .with_suggestion(r#"Add: "Seek independent financial advice.""#);

        assert!(s.can_handle("Some document.", "adhoc.gate", &v));
        let applied = s.apply("Some document.", "adhoc.gate", &v, &ctx()).unwrap();
        assert!(applied
            .text
            .ends_with("Seek independent financial advice."));
        assert_eq!(applied.metadata.change_count, 1);
    }

    #[test]
    fn test_apply_skips_when_already_present() {
        let s = SuggestionStrategy::new();
        let v = Violation::warning(Severity::Low, "missing wording")
            .with_suggestion(r#"Add: "seek independent financial advice.""#);

        // containment check is case-insensitive
        let text = "Always Seek Independent Financial Advice. Thanks.";
        assert!(s.apply(text, "adhoc.gate", &v, &ctx()).is_none());
    }

    #[test]
    fn test_no_suggestion_cannot_handle() {
        let s = SuggestionStrategy::new();
        let v = Violation::fail(Severity::High, "no hint here");
        assert!(!s.can_handle("text", "adhoc.gate", &v));
    }
}
