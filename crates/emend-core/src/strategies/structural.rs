//! Structural reorganization strategy: named document-level operations
//! over whole paragraphs rather than line-level edits.
//!
//! Every location lookup is heuristic; a failed lookup is a silent
//! no-op, never an error.

use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::catalog::{RuleCatalog, StructuralOp};
use crate::types::{CorrectionMetadata, StrategyKind, Violation};

use super::{Applied, CorrectionStrategy, SynthesisContext};

lazy_static! {
    static ref RISK_MARKER: Regex = Regex::new(
        r"(?i)(capital at risk|risk warning|you may lose|can go down|high.risk investment)"
    )
    .unwrap();
    static ref BENEFIT_MARKER: Regex = Regex::new(
        r"(?i)(benefit|returns?\b|growth|profits?\b|earn\b|grow your|reward)"
    )
    .unwrap();
}

pub struct StructuralStrategy {
    catalog: Arc<RuleCatalog>,
}

impl StructuralStrategy {
    pub fn new(catalog: Arc<RuleCatalog>) -> Self {
        Self { catalog }
    }

    /// Apply one operation. Returns the new text only when it changed.
    fn apply_op(text: &str, op: &StructuralOp) -> Option<String> {
        match op {
            StructuralOp::MoveSectionToStart { section_pattern } => {
                move_section(text, section_pattern, true)
            }
            StructuralOp::MoveSectionToEnd { section_pattern } => {
                move_section(text, section_pattern, false)
            }
            StructuralOp::InsertHeadingAfter { anchor, heading } => {
                insert_heading_after(text, anchor, heading)
            }
            StructuralOp::RiskBeforeBenefit => risk_before_benefit(text),
        }
    }
}

impl CorrectionStrategy for StructuralStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::StructuralReorganization
    }

    fn can_handle(&self, _text: &str, rule_key: &str, _violation: &Violation) -> bool {
        // one-way containment only, unlike the other strategies
        self.catalog
            .structural_rules(None)
            .keys()
            .any(|family| rule_key.contains(family))
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
        let mut samples = Vec::new();
        let mut rationales = Vec::new();

        for (family, rules) in self.catalog.structural_rules(None) {
            if !rule_key.contains(family) {
                continue;
            }

            for rule in rules {
                if let Some(reorganized) = Self::apply_op(&current, &rule.operation) {
                    debug!(family, op = rule.operation.name(), "structural operation applied");
                    current = reorganized;
                    change_count += 1;
                    samples.push(rule.operation.name().to_string());
                    rationales.push(rule.rationale.clone());
                }
            }
        }

        if change_count == 0 {
            return None;
        }

        Some(Applied {
            text: current,
            metadata: CorrectionMetadata {
                change_count,
                locations: Vec::new(),
                rationale: rationales.join("; "),
                samples,
            },
        })
    }
}

/// Move the first paragraph matching `pattern` to the start or end.
fn move_section(text: &str, pattern: &Regex, to_start: bool) -> Option<String> {
    let paragraphs: Vec<&str> = text.split("\n\n").collect();
    if paragraphs.len() < 2 {
        return None;
    }

    let index = paragraphs.iter().position(|p| pattern.is_match(p))?;
    let already_placed = if to_start {
        index == 0
    } else {
        index == paragraphs.len() - 1
    };
    if already_placed {
        return None;
    }

    let mut rest: Vec<&str> = paragraphs.clone();
    let section = rest.remove(index);
    let reordered: Vec<&str> = if to_start {
        std::iter::once(section).chain(rest).collect()
    } else {
        rest.into_iter().chain(std::iter::once(section)).collect()
    };

    Some(reordered.join("\n\n"))
}

/// Insert a heading line after the line containing the first anchor
/// match. Skipped when the heading already exists.
fn insert_heading_after(text: &str, anchor: &Regex, heading: &str) -> Option<String> {
    if text.contains(heading) {
        return None;
    }
    let m = anchor.find(text)?;
    let line_end = text[m.end()..]
        .find('\n')
        .map(|i| m.end() + i)
        .unwrap_or(text.len());

    let mut result = String::with_capacity(text.len() + heading.len() + 2);
    result.push_str(&text[..line_end]);
    result.push_str("\n\n");
    result.push_str(heading);
    result.push_str(&text[line_end..]);
    Some(result)
}

/// Reorder paragraphs so risk warnings precede benefit statements when
/// the reverse order is detected.
fn risk_before_benefit(text: &str) -> Option<String> {
    let paragraphs: Vec<&str> = text.split("\n\n").collect();
    if paragraphs.len() < 2 {
        return None;
    }

    let is_risk = |p: &str| RISK_MARKER.is_match(p);
    let is_benefit = |p: &str| !is_risk(p) && BENEFIT_MARKER.is_match(p);

    let first_risk = paragraphs.iter().position(|p| is_risk(p))?;
    let first_benefit = paragraphs.iter().position(|p| is_benefit(p))?;
    if first_risk < first_benefit {
        return None;
    }

    // lift all risk paragraphs to just before the first benefit one
    let risk_paragraphs: Vec<&str> = paragraphs.iter().copied().filter(|p| is_risk(p)).collect();
    let mut reordered: Vec<&str> = Vec::with_capacity(paragraphs.len());
    for (i, p) in paragraphs.iter().enumerate() {
        if is_risk(p) {
            continue;
        }
        if i == first_benefit {
            reordered.extend(risk_paragraphs.iter().copied());
        }
        reordered.push(p);
    }

    Some(reordered.join("\n\n"))
}
