//! Determinism fingerprints.
//!
//! Diagnostic hashes used to confirm that repeated synthesis runs over
//! identical input reproduce identical output. Not a security control.
//!
//! All collections are sorted before hashing so the fingerprint is
//! independent of caller-side ordering, and every field is written
//! with a length prefix so adjacent fields cannot alias.

use sha2::{Digest, Sha256};

use crate::types::Violation;

/// Hex SHA-256 of a text.
pub fn hash_text(text: &str) -> String {
    hex(Sha256::digest(text.as_bytes()).as_slice())
}

/// Stable hash over the original text and the violation set.
///
/// Covers (rule_key, status, severity) per violation, sorted, so the
/// fingerprint does not depend on checker execution order.
pub fn input_hash(text: &str, violations: &[(String, Violation)]) -> String {
    let mut tuples: Vec<String> = violations
        .iter()
        .map(|(rule_key, v)| {
            format!("{}|{}|{}", rule_key, v.status.as_str(), v.severity.as_str())
        })
        .collect();
    tuples.sort();

    let mut hasher = Sha256::new();
    write_field(&mut hasher, &hash_text(text));
    for tuple in &tuples {
        write_field(&mut hasher, tuple);
    }
    hex(hasher.finalize().as_slice())
}

/// Stable hash over the final text, the correction count, and the
/// sorted distinct strategy kinds used.
pub fn output_hash(final_text: &str, correction_count: usize, strategy_kinds: &[String]) -> String {
    let mut kinds = strategy_kinds.to_vec();
    kinds.sort();
    kinds.dedup();

    let mut hasher = Sha256::new();
    write_field(&mut hasher, &hash_text(final_text));
    write_field(&mut hasher, &correction_count.to_string());
    for kind in &kinds {
        write_field(&mut hasher, kind);
    }
    hex(hasher.finalize().as_slice())
}

fn write_field(hasher: &mut Sha256, field: &str) {
    hasher.update(field.len().to_le_bytes());
    hasher.update(field.as_bytes());
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut acc, b| {
        use std::fmt::Write;
        let _ = write!(acc, "{:02x}", b);
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Severity, Violation};

    fn pair(key: &str, severity: Severity) -> (String, Violation) {
        (key.to_string(), Violation::fail(severity, "msg"))
    }

    #[test]
    fn test_hash_text_is_stable_hex() {
        let h = hash_text("hello");
        assert_eq!(h.len(), 64);
        assert_eq!(h, hash_text("hello"));
        assert_ne!(h, hash_text("hello!"));
    }

    #[test]
    fn test_input_hash_order_independent() {
        let a = vec![pair("b.gate", Severity::High), pair("a.gate", Severity::Low)];
        let b = vec![pair("a.gate", Severity::Low), pair("b.gate", Severity::High)];
        assert_eq!(input_hash("text", &a), input_hash("text", &b));
    }

    #[test]
    fn test_input_hash_sees_severity() {
        let a = vec![pair("a.gate", Severity::Low)];
        let b = vec![pair("a.gate", Severity::High)];
        assert_ne!(input_hash("text", &a), input_hash("text", &b));
    }

    #[test]
    fn test_output_hash_kind_order_independent() {
        let a = vec!["find_replace".to_string(), "template_insertion".to_string()];
        let b = vec!["template_insertion".to_string(), "find_replace".to_string()];
        assert_eq!(output_hash("text", 2, &a), output_hash("text", 2, &b));
    }

    #[test]
    fn test_field_boundaries_do_not_alias() {
        // ["ab", "c"] must not hash equal to ["a", "bc"]
        let a = vec!["ab".to_string(), "c".to_string()];
        let b = vec!["a".to_string(), "bc".to_string()];
        assert_ne!(output_hash("t", 1, &a), output_hash("t", 1, &b));
    }
}
