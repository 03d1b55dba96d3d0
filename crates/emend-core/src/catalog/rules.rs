//! Correction rule shapes.
//!
//! Three kinds of rules share a purpose (transform text so a rule
//! family is satisfied) but differ in mechanism: find/replace,
//! template insertion, and structural reorganization.

use regex::Regex;

/// A pattern-driven find/replace correction.
#[derive(Debug, Clone)]
pub struct FindReplaceRule {
    /// Compiled match pattern. Case-insensitive rules are compiled
    /// with the `(?i)` flag at registration time.
    pub pattern: Regex,

    /// Replacement text (regex replacement syntax, `$1` etc. allowed)
    pub replacement: String,

    /// Why this replacement satisfies the rule family
    pub rationale: String,

    /// Whether the pattern was registered case-sensitively
    pub case_sensitive: bool,
}

/// Where an insertion rule places its template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    /// After a leading heading line if one exists, else offset 0
    Start,
    /// End of the document
    End,
    /// End of the first double-newline-delimited block, else 10% in
    AfterHeader,
    /// Start of the first signature/date marker line, else end
    BeforeSignature,
}

impl InsertPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsertPosition::Start => "start",
            InsertPosition::End => "end",
            InsertPosition::AfterHeader => "after_header",
            InsertPosition::BeforeSignature => "before_signature",
        }
    }
}

/// A template-insertion correction.
#[derive(Debug, Clone)]
pub struct InsertionRule {
    /// Literal text to insert
    pub template: String,

    /// Target position keyword
    pub position: InsertPosition,

    /// Optional activation condition; the template applies only when
    /// this pattern matches the current document. Absent means always.
    pub condition: Option<Regex>,
}

/// Named document-level reorganization operations.
///
/// All location lookups are heuristic; a failed lookup is a no-op.
#[derive(Debug, Clone)]
pub enum StructuralOp {
    /// Move the paragraph containing `section_pattern` to the start
    MoveSectionToStart { section_pattern: Regex },

    /// Move the paragraph containing `section_pattern` to the end
    MoveSectionToEnd { section_pattern: Regex },

    /// Insert a heading line after the first match of `anchor`
    InsertHeadingAfter { anchor: Regex, heading: String },

    /// Reorder risk-warning and benefit-statement paragraphs so risk
    /// warnings precede benefits when the reverse order is detected
    RiskBeforeBenefit,
}

impl StructuralOp {
    pub fn name(&self) -> &'static str {
        match self {
            StructuralOp::MoveSectionToStart { .. } => "move_section_to_start",
            StructuralOp::MoveSectionToEnd { .. } => "move_section_to_end",
            StructuralOp::InsertHeadingAfter { .. } => "insert_heading_after",
            StructuralOp::RiskBeforeBenefit => "risk_before_benefit",
        }
    }
}

/// A structural correction: one named operation plus its rationale.
#[derive(Debug, Clone)]
pub struct StructuralRule {
    pub operation: StructuralOp,
    pub rationale: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_names() {
        assert_eq!(InsertPosition::Start.as_str(), "start");
        assert_eq!(InsertPosition::AfterHeader.as_str(), "after_header");
        assert_eq!(InsertPosition::BeforeSignature.as_str(), "before_signature");
    }

    #[test]
    fn test_structural_op_names() {
        assert_eq!(StructuralOp::RiskBeforeBenefit.name(), "risk_before_benefit");
        let op = StructuralOp::InsertHeadingAfter {
            anchor: Regex::new("Fees").unwrap(),
            heading: "## Charges".to_string(),
        };
        assert_eq!(op.name(), "insert_heading_after");
    }
}
