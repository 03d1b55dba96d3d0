//! Correction synthesizer: deterministically applies strategies to
//! resolve a batch of violations against one document.
//!
//! Guarantees:
//! 1. **Deterministic**: violations are sorted by rule_key and
//!    strategies by declared priority, so output never depends on
//!    caller-side ordering.
//! 2. **At most one correction per violation** in a single pass: the
//!    first strategy that changes the text wins, so independently
//!    authored rules cannot compound on one violation.
//! 3. **Sequential composition**: each correction is applied to the
//!    accumulated text, not the original.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::catalog::{default_catalog, family_matches, RuleCatalog};
use crate::hashing;
use crate::strategies::{
    CorrectionStrategy, FindReplaceStrategy, InsertionStrategy, StructuralStrategy,
    SuggestionStrategy, SynthesisContext,
};
use crate::types::{
    CorrectionRecord, DeterminismBlock, DocumentType, GateStatus, Severity, StrategyKind,
    SynthesisResult, Violation,
};

/// Orchestrates correction strategies over one document.
pub struct Synthesizer {
    strategies: Vec<Box<dyn CorrectionStrategy>>,
    context: SynthesisContext,
}

impl Synthesizer {
    /// Build from an explicit strategy set.
    ///
    /// Strategies are sorted once, here, by (priority descending, kind
    /// name ascending) so registration order never matters.
    pub fn new(mut strategies: Vec<Box<dyn CorrectionStrategy>>, document_type: DocumentType) -> Self {
        strategies.sort_by(|a, b| {
            b.priority()
                .cmp(&a.priority())
                .then_with(|| a.kind().as_str().cmp(b.kind().as_str()))
        });
        Self {
            strategies,
            context: SynthesisContext { document_type },
        }
    }

    /// All four strategies over a shared catalogue.
    pub fn with_catalog(catalog: Arc<RuleCatalog>, document_type: DocumentType) -> Self {
        let strategies: Vec<Box<dyn CorrectionStrategy>> = vec![
            Box::new(FindReplaceStrategy::new(catalog.clone())),
            Box::new(InsertionStrategy::new(catalog.clone())),
            Box::new(StructuralStrategy::new(catalog)),
            Box::new(SuggestionStrategy::new()),
        ];
        Self::new(strategies, document_type)
    }

    /// All four strategies over the built-in rule set.
    pub fn with_default_rules(document_type: DocumentType) -> Self {
        Self::with_catalog(Arc::new(default_catalog()), document_type)
    }

    /// Apply corrections for a batch of violations.
    ///
    /// Violations whose status is PASS or NOT_APPLICABLE are skipped;
    /// a violation no strategy can fix is a normal outcome, not an
    /// error, and simply produces no ledger entry.
    pub fn synthesize(
        &self,
        text: &str,
        violations: &[(String, Violation)],
    ) -> SynthesisResult {
        let (corrected, records) = self.run(text, violations, None);
        self.build_result(text, corrected, records, violations)
    }

    /// Context-aware synthesis: prefilter the violation set before the
    /// primary pass.
    ///
    /// Critical/high-severity failures are always kept. Everything
    /// else actionable is kept only when its rule_key matches the
    /// document type's relevance keywords or the caller's module
    /// identifier.
    pub fn synthesize_in_context(
        &self,
        text: &str,
        violations: &[(String, Violation)],
        module: &str,
    ) -> SynthesisResult {
        let filtered: Vec<(String, Violation)> = violations
            .iter()
            .filter(|(rule_key, v)| self.retained_in_context(rule_key, v, module))
            .cloned()
            .collect();

        debug!(
            kept = filtered.len(),
            dropped = violations.len() - filtered.len(),
            module,
            "context filter applied"
        );

        self.synthesize(text, &filtered)
    }

    /// Multi-level synthesis: one primary pass per strategy kind, in
    /// fixed level order, each level's output feeding the next.
    ///
    /// Used when maximum coverage matters more than minimum edit
    /// distance; a single violation may collect one correction per
    /// level here.
    pub fn synthesize_multi_level(
        &self,
        text: &str,
        violations: &[(String, Violation)],
    ) -> SynthesisResult {
        let mut current = text.to_string();
        let mut records = Vec::new();

        for kind in StrategyKind::level_order() {
            let (next, mut level_records) = self.run(&current, violations, Some(kind));
            current = next;
            records.append(&mut level_records);
        }

        self.build_result(text, current, records, violations)
    }

    /// The primary loop: sorted violations, priority-ordered
    /// strategies, first text-changing strategy wins per violation.
    fn run(
        &self,
        text: &str,
        violations: &[(String, Violation)],
        only_kind: Option<StrategyKind>,
    ) -> (String, Vec<CorrectionRecord>) {
        // Sort a working copy by rule_key (with full tie-breaking) to
        // remove any dependency on checker execution order.
        let mut pairs: Vec<&(String, Violation)> = violations.iter().collect();
        pairs.sort_by(|a, b| {
            a.0.cmp(&b.0)
                .then_with(|| a.1.message.cmp(&b.1.message))
                .then_with(|| a.1.severity.cmp(&b.1.severity))
                .then_with(|| a.1.status.as_str().cmp(b.1.status.as_str()))
        });

        let mut current = text.to_string();
        let mut records = Vec::new();

        for (rule_key, violation) in pairs {
            if !violation.status.is_actionable() {
                continue;
            }

            for strategy in &self.strategies {
                if let Some(kind) = only_kind {
                    if strategy.kind() != kind {
                        continue;
                    }
                }
                if !strategy.can_handle(&current, rule_key, violation) {
                    continue;
                }

                let Some(applied) = strategy.apply(&current, rule_key, violation, &self.context)
                else {
                    continue;
                };
                if applied.text == current {
                    continue;
                }

                let length_delta = applied.text.len() as i64 - current.len() as i64;
                debug!(
                    rule_key = %rule_key,
                    strategy = strategy.kind().as_str(),
                    length_delta,
                    "correction applied"
                );

                records.push(CorrectionRecord {
                    rule_key: rule_key.clone(),
                    violation_severity: violation.severity,
                    strategy_kind: strategy.kind(),
                    metadata: applied.metadata,
                    length_delta,
                });
                current = applied.text;

                // first successful strategy wins for this violation
                break;
            }
        }

        (current, records)
    }

    fn retained_in_context(&self, rule_key: &str, violation: &Violation, module: &str) -> bool {
        if !violation.status.is_actionable() {
            return false;
        }
        if violation.status == GateStatus::Fail && violation.severity >= Severity::High {
            return true;
        }
        self.context
            .document_type
            .relevance_keywords()
            .iter()
            .any(|kw| rule_key.contains(kw))
            || family_matches(module, rule_key)
    }

    fn build_result(
        &self,
        original: &str,
        corrected: String,
        records: Vec<CorrectionRecord>,
        violations: &[(String, Violation)],
    ) -> SynthesisResult {
        let strategies_applied: Vec<String> = records
            .iter()
            .map(|r| r.strategy_kind.as_str().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let determinism = DeterminismBlock {
            input_hash: hashing::input_hash(original, violations),
            output_hash: hashing::output_hash(&corrected, records.len(), &strategies_applied),
        };

        info!(
            corrections = records.len(),
            unchanged = corrected == original,
            document_type = self.context.document_type.as_str(),
            "synthesis complete"
        );

        SynthesisResult {
            unchanged: corrected == original,
            correction_count: records.len(),
            original_text: original.to_string(),
            corrected_text: corrected,
            corrections: records,
            strategies_applied,
            determinism,
            synthesized_at: Utc::now(),
        }
    }
}
