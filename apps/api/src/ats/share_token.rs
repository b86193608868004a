//! Share tokens: opaque, unguessable handles for public read access.
//!
//! 16 bytes from the OS CSPRNG (128 bits), hex-encoded to a fixed 32 chars.
//! Uniqueness is enforced by the store; callers regenerate once on conflict.

use rand::rngs::OsRng;
use rand::RngCore;

pub const TOKEN_BYTES: usize = 16;
pub const TOKEN_LEN: usize = TOKEN_BYTES * 2;

pub fn generate_share_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Cheap shape check so malformed tokens skip the store lookup.
pub fn is_well_formed(token: &str) -> bool {
    token.len() == TOKEN_LEN && token.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_token_is_fixed_length_hex() {
        let token = generate_share_token();
        assert_eq!(token.len(), TOKEN_LEN);
        assert!(is_well_formed(&token));
    }

    #[test]
    fn test_tokens_are_distinct() {
        let tokens: HashSet<String> = (0..1000).map(|_| generate_share_token()).collect();
        assert_eq!(tokens.len(), 1000);
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        assert!(!is_well_formed(""));
        assert!(!is_well_formed("abc"));
        assert!(!is_well_formed(&"z".repeat(TOKEN_LEN)));
        assert!(!is_well_formed(&"a".repeat(TOKEN_LEN + 1)));
    }
}
