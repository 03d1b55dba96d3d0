//! Find/replace strategy: global pattern substitution driven by the
//! catalogue's find/replace table.

use std::sync::Arc;

use tracing::debug;

use crate::catalog::{family_matches, RuleCatalog};
use crate::types::{CorrectionMetadata, StrategyKind, Violation};

use super::{Applied, CorrectionStrategy, SynthesisContext};

/// Maximum number of example snippets kept per correction record.
const MAX_SAMPLES: usize = 5;

pub struct FindReplaceStrategy {
    catalog: Arc<RuleCatalog>,
}

impl FindReplaceStrategy {
    pub fn new(catalog: Arc<RuleCatalog>) -> Self {
        Self { catalog }
    }

    /// A family applies when it bidirectionally matches the rule key,
    /// or when it appears verbatim in the violation's message.
    fn family_applies(family: &str, rule_key: &str, violation: &Violation) -> bool {
        family_matches(family, rule_key)
            || violation.message.to_lowercase().contains(&family.to_lowercase())
    }
}

impl CorrectionStrategy for FindReplaceStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::FindReplace
    }

    fn can_handle(&self, _text: &str, rule_key: &str, violation: &Violation) -> bool {
        self.catalog
            .find_replace_rules(None)
            .keys()
            .any(|family| Self::family_applies(family, rule_key, violation))
    }

    fn apply(
        &self,
        text: &str,
        rule_key: &str,
        violation: &Violation,
        _ctx: &SynthesisContext,
    ) -> Option<Applied> {
        let mut current = text.to_string();
        let mut change_count = 0usize;
        let mut locations = Vec::new();
        let mut samples = Vec::new();
        let mut rationales = Vec::new();

        // All rules of every matching family fire within one call; the
        // aggregate becomes a single correction record.
        for (family, rules) in self.catalog.find_replace_rules(None) {
            if !Self::family_applies(family, rule_key, violation) {
                continue;
            }

            for rule in rules {
                let matches: Vec<(usize, usize, String)> = rule
                    .pattern
                    .find_iter(&current)
                    .map(|m| (m.start(), m.end(), m.as_str().to_string()))
                    .collect();
                if matches.is_empty() {
                    continue;
                }

                debug!(
                    family,
                    pattern = rule.pattern.as_str(),
                    count = matches.len(),
                    "find/replace rule fired"
                );

                change_count += matches.len();
                for (start, end, snippet) in matches {
                    locations.push((start, end));
                    if samples.len() < MAX_SAMPLES {
                        samples.push(snippet);
                    }
                }
                rationales.push(rule.rationale.clone());

                current = rule
                    .pattern
                    .replace_all(&current, rule.replacement.as_str())
                    .into_owned();
            }
        }

        if change_count == 0 || current == text {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_catalog;
    use crate::types::{DocumentType, Severity};

    fn strategy() -> FindReplaceStrategy {
        FindReplaceStrategy::new(Arc::new(default_catalog()))
    }

    fn ctx() -> SynthesisContext {
        SynthesisContext {
            document_type: DocumentType::FinancialPromotion,
        }
    }

    #[test]
    fn test_guaranteed_returns_rewritten() {
        let s = strategy();
        let v = Violation::fail(Severity::Critical, "Returns presented as guaranteed");

        assert!(s.can_handle("Guaranteed returns!", "fair_clear", &v));
        let applied = s.apply("Guaranteed returns!", "fair_clear", &v, &ctx()).unwrap();

        assert!(applied.text.contains("potential"));
        assert!(!applied.text.contains("Guaranteed"));
        assert_eq!(applied.metadata.change_count, 1);
        assert_eq!(applied.metadata.samples, vec!["Guaranteed"]);
    }

    #[test]
    fn test_no_match_returns_none() {
        let s = strategy();
        let v = Violation::fail(Severity::High, "something else");

        let applied = s.apply("A perfectly compliant sentence.", "fair_clear", &v, &ctx());
        assert!(applied.is_none());
    }

    #[test]
    fn test_multiple_rules_aggregate_into_one_application() {
        let s = strategy();
        let v = Violation::fail(Severity::High, "misleading claims");

        let applied = s
            .apply(
                "Guaranteed returns! This product is risk-free.",
                "fair_clear.misleading",
                &v,
                &ctx(),
            )
            .unwrap();

        assert_eq!(applied.metadata.change_count, 2);
        assert!(applied.metadata.rationale.contains("; "));
        assert!(applied.text.contains("subject to investment risk"));
    }

    #[test]
    fn test_family_matches_via_message_substring() {
        let s = strategy();
        // rule_key matches nothing, but the message names the family
        let v = Violation::fail(Severity::Medium, "breach of fair_clear principles");

        assert!(s.can_handle("Guaranteed returns!", "unrelated.gate", &v));
        let applied = s.apply("Guaranteed returns!", "unrelated.gate", &v, &ctx());
        assert!(applied.is_some());
    }

    #[test]
    fn test_unmatched_rule_key_cannot_handle() {
        let s = strategy();
        let v = Violation::fail(Severity::Low, "unrelated finding");
        assert!(!s.can_handle("text", "totally.unknown", &v));
    }
}
