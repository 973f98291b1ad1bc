use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Lower-case hex SHA-256 of the password's UTF-8 bytes.
///
/// Single unsalted pass. Good enough for the low-value admin gate this guards,
/// not for general credential storage.
pub fn hash_password(password: &str) -> String {
    let mut h = Sha256::new();
    h.update(password.as_bytes());
    hex::encode(h.finalize())
}

/// Compare two digests without short-circuiting on the first differing byte.
pub fn digest_matches(stored: &str, candidate: &str) -> bool {
    bool::from(stored.as_bytes().ct_eq(candidate.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vectors() {
        assert_eq!(
            hash_password("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(
            hash_password("secret"),
            "2bb80d537b1da3e38bd30361aa855686bde0eacd7162fef6a25fe97bf527a25b"
        );
    }

    #[test]
    fn deterministic_and_fixed_length() {
        let a = hash_password("hunter2");
        assert_eq!(a, hash_password("hunter2"));
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(hash_password("").len(), 64);
    }

    #[test]
    fn single_character_change_alters_digest() {
        assert_ne!(hash_password("abc"), hash_password("abd"));
    }

    #[test]
    fn digest_matches_is_plain_equality() {
        let d = hash_password("secret");
        assert!(digest_matches(&d, &hash_password("secret")));
        assert!(!digest_matches(&d, &hash_password("wrong")));
        assert!(!digest_matches(&d, &d[..63]));
    }
}
