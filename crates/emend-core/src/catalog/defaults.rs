//! Built-in UK-regulation correction rules.
//!
//! These cover the common financial-promotion, privacy-notice, and
//! contract families. Callers with bespoke rule sets can start from
//! `RuleCatalog::new()` instead.

use super::{InsertPosition, RuleCatalog, StructuralOp};
use regex::Regex;

/// Build the default catalogue.
///
/// Every entry here is statically known to be well-formed, so failures
/// are programming errors, not runtime conditions.
pub fn default_catalog() -> RuleCatalog {
    let mut catalog = RuleCatalog::new();

    // Fair, clear and not misleading (COBS 4.2) ------------------------

    catalog
        .add_find_replace(
            "fair_clear",
            "Guaranteed",
            "potential (not guaranteed)",
            "Promotions must not present returns as guaranteed",
            true,
        )
        .expect("default fair_clear rule");
    catalog
        .add_find_replace(
            "fair_clear",
            r"risk[- ]?free",
            "subject to investment risk",
            "No investment may be described as risk-free",
            false,
        )
        .expect("default fair_clear rule");
    catalog
        .add_find_replace(
            "fair_clear",
            r"\bno risk\b",
            "a risk of loss",
            "No investment may be described as carrying no risk",
            false,
        )
        .expect("default fair_clear rule");

    // Risk warnings ----------------------------------------------------

    catalog
        .add_insertion(
            "risk_warning",
            "Capital at risk. The value of investments can go down as well as up \
             and you may get back less than you invest.",
            InsertPosition::Start,
            None,
        )
        .expect("default risk_warning rule");

    catalog
        .add_insertion(
            "past_performance",
            "Past performance is not a reliable indicator of future results.",
            InsertPosition::End,
            Some("past performance|historic returns|track record"),
        )
        .expect("default past_performance rule");

    // Cryptoasset promotions (PS23/6) ----------------------------------

    catalog
        .add_insertion(
            "crypto_promotion",
            "A 24-hour cooling-off period applies before your first investment \
             with this firm.",
            InsertPosition::End,
            Some("crypto"),
        )
        .expect("default crypto_promotion rule");

    // UK GDPR ----------------------------------------------------------

    catalog
        .add_insertion(
            "gdpr_uk",
            "You have the right to access, rectify, and erase your personal data, \
             and to lodge a complaint with the Information Commissioner's Office. \
             To exercise these rights, contact our Data Protection Officer.",
            InsertPosition::End,
            Some("personal (data|information)"),
        )
        .expect("default gdpr_uk rule");
    catalog
        .add_find_replace(
            "gdpr_uk",
            "implied consent",
            "explicit consent",
            "UK GDPR requires consent to be explicit, not implied",
            false,
        )
        .expect("default gdpr_uk rule");

    // Consumer Duty ----------------------------------------------------

    catalog
        .add_find_replace(
            "consumer_duty",
            "fees may apply",
            "fees apply as set out in our fee schedule",
            "Charges must be stated, not hinted at",
            false,
        )
        .expect("default consumer_duty rule");

    // Contracts --------------------------------------------------------

    catalog
        .add_insertion(
            "contract",
            "This agreement is governed by the law of England and Wales.",
            InsertPosition::BeforeSignature,
            None,
        )
        .expect("default contract rule");

    // Document structure -----------------------------------------------

    catalog
        .add_structural(
            "document_structure",
            StructuralOp::RiskBeforeBenefit,
            "Risk warnings must precede benefit statements",
        )
        .expect("default document_structure rule");
    catalog
        .add_structural(
            "risk_prominence",
            StructuralOp::MoveSectionToStart {
                section_pattern: Regex::new("(?i)capital at risk|risk warning")
                    .expect("default risk_prominence pattern"),
            },
            "Risk warnings must be prominent",
        )
        .expect("default risk_prominence rule");

    catalog
}
