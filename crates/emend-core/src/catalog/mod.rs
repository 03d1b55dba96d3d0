//! The rule catalogue: an immutable table of correction rules grouped
//! by rule-family key.
//!
//! Built once at start-up, read-only thereafter. Shared by reference
//! across concurrent synthesis calls; no locking is needed because the
//! catalogue is never mutated after construction.

mod defaults;
mod rules;

pub use defaults::default_catalog;
pub use rules::{FindReplaceRule, InsertPosition, InsertionRule, StructuralOp, StructuralRule};

use std::collections::BTreeMap;

use regex::RegexBuilder;
use thiserror::Error;

/// Errors raised while registering rules.
///
/// These are construction-time programming errors; there is no runtime
/// recovery path.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Rule family key must not be empty")]
    EmptyFamily,

    #[error("Find/replace pattern must not be empty (family {family})")]
    EmptyPattern { family: String },

    #[error("Insertion template must not be empty (family {family})")]
    EmptyTemplate { family: String },

    #[error("Invalid pattern in family {family}: {source}")]
    InvalidPattern {
        family: String,
        #[source]
        source: regex::Error,
    },
}

/// Bidirectional substring containment between a rule-family key and a
/// gate's rule_key.
///
/// A coarse family like `crypto_promotion` covers every gate whose key
/// contains it, and a broad gate key covers narrow families the same
/// way. Deliberately loose; see DESIGN.md before tightening.
pub fn family_matches(family: &str, rule_key: &str) -> bool {
    family.contains(rule_key) || rule_key.contains(family)
}

/// The rule catalogue: three lookup tables keyed by rule-family string.
///
/// `BTreeMap` keeps family iteration order deterministic, which the
/// synthesizer's reproducibility guarantee relies on.
#[derive(Debug, Default)]
pub struct RuleCatalog {
    find_replace: BTreeMap<String, Vec<FindReplaceRule>>,
    insertions: BTreeMap<String, Vec<InsertionRule>>,
    structural: BTreeMap<String, Vec<StructuralRule>>,
}

impl RuleCatalog {
    /// An empty catalogue; populate with the `add_*` methods.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a find/replace rule under a family key.
    pub fn add_find_replace(
        &mut self,
        family: impl Into<String>,
        pattern: &str,
        replacement: impl Into<String>,
        rationale: impl Into<String>,
        case_sensitive: bool,
    ) -> Result<(), CatalogError> {
        let family = family.into();
        if family.is_empty() {
            return Err(CatalogError::EmptyFamily);
        }
        if pattern.is_empty() {
            return Err(CatalogError::EmptyPattern { family });
        }

        let compiled = RegexBuilder::new(pattern)
            .case_insensitive(!case_sensitive)
            .build()
            .map_err(|source| CatalogError::InvalidPattern {
                family: family.clone(),
                source,
            })?;

        self.find_replace.entry(family).or_default().push(FindReplaceRule {
            pattern: compiled,
            replacement: replacement.into(),
            rationale: rationale.into(),
            case_sensitive,
        });
        Ok(())
    }

    /// Register a template-insertion rule under a family key.
    ///
    /// `condition` is an optional activation pattern; the template is
    /// inserted only when it matches the document.
    pub fn add_insertion(
        &mut self,
        family: impl Into<String>,
        template: impl Into<String>,
        position: InsertPosition,
        condition: Option<&str>,
    ) -> Result<(), CatalogError> {
        let family = family.into();
        if family.is_empty() {
            return Err(CatalogError::EmptyFamily);
        }
        let template = template.into();
        if template.is_empty() {
            return Err(CatalogError::EmptyTemplate { family });
        }

        let condition = match condition {
            Some(pattern) => Some(
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| CatalogError::InvalidPattern {
                        family: family.clone(),
                        source,
                    })?,
            ),
            None => None,
        };

        self.insertions.entry(family).or_default().push(InsertionRule {
            template,
            position,
            condition,
        });
        Ok(())
    }

    /// Register a structural-reorganization rule under a family key.
    pub fn add_structural(
        &mut self,
        family: impl Into<String>,
        operation: StructuralOp,
        rationale: impl Into<String>,
    ) -> Result<(), CatalogError> {
        let family = family.into();
        if family.is_empty() {
            return Err(CatalogError::EmptyFamily);
        }

        self.structural.entry(family).or_default().push(StructuralRule {
            operation,
            rationale: rationale.into(),
        });
        Ok(())
    }

    /// Find/replace rules, optionally restricted to families matching
    /// the given filter (bidirectional containment).
    pub fn find_replace_rules(
        &self,
        family_filter: Option<&str>,
    ) -> BTreeMap<&str, &[FindReplaceRule]> {
        Self::filtered(&self.find_replace, family_filter)
    }

    /// Insertion rules, optionally restricted by family filter.
    pub fn insertion_rules(&self, family_filter: Option<&str>) -> BTreeMap<&str, &[InsertionRule]> {
        Self::filtered(&self.insertions, family_filter)
    }

    /// Structural rules, optionally restricted by family filter.
    pub fn structural_rules(
        &self,
        family_filter: Option<&str>,
    ) -> BTreeMap<&str, &[StructuralRule]> {
        Self::filtered(&self.structural, family_filter)
    }

    /// Total number of registered rules across all three tables.
    pub fn len(&self) -> usize {
        self.find_replace.values().map(Vec::len).sum::<usize>()
            + self.insertions.values().map(Vec::len).sum::<usize>()
            + self.structural.values().map(Vec::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn filtered<'a, T>(
        table: &'a BTreeMap<String, Vec<T>>,
        family_filter: Option<&str>,
    ) -> BTreeMap<&'a str, &'a [T]> {
        table
            .iter()
            .filter(|(family, _)| match family_filter {
                Some(filter) => family_matches(family, filter),
                None => true,
            })
            .map(|(family, rules)| (family.as_str(), rules.as_slice()))
            .collect()
    }
}
