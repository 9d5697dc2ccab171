//! Primitives shared by name-resolution helpers that sit above this crate.
//!
//! Full object names are resolved against an object database and a ref
//! store, neither of which this crate depends on; what lives here is the
//! hex-id recognition logic any such resolver needs.

use git_hash::ObjectId;

use crate::ObjectError;

/// Resolve a full hex string to an ObjectId.
pub fn resolve_hex(hex: &str) -> Result<ObjectId, ObjectError> {
    ObjectId::from_hex(hex).map_err(ObjectError::from)
}

/// Check if a string looks like a hex OID prefix (at least 4 hex chars).
pub fn is_hex_prefix(s: &str) -> bool {
    s.len() >= 4 && s.len() <= 40 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_full_hex() {
        let oid = resolve_hex("da39a3ee5e6b4b0d3255bfef95601890afd80709").unwrap();
        assert_eq!(oid.to_hex(), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
    }

    #[test]
    fn resolve_hex_rejects_garbage() {
        assert!(resolve_hex("not-a-hash").is_err());
    }

    #[test]
    fn is_hex_prefix_checks() {
        assert!(is_hex_prefix("abcd1234"));
        assert!(is_hex_prefix("ABCD"));
        assert!(!is_hex_prefix("abc")); // too short
        assert!(!is_hex_prefix("HEAD")); // not hex
        assert!(!is_hex_prefix(&"a".repeat(41))); // too long
    }
}
