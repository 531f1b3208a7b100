//! Opaque token key generation.

use rand::{RngCore, rngs::OsRng};

/// Number of random bytes behind every token key.
pub const TOKEN_KEY_BYTES: usize = 20;

/// Generates a new opaque token key.
///
/// The key is `TOKEN_KEY_BYTES` bytes from the operating system's CSPRNG,
/// hex encoded, so it is always 40 lowercase hexadecimal characters.
pub fn generate_token_key() -> String {
    let mut bytes = [0u8; TOKEN_KEY_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn key_is_forty_hex_chars() {
        let key = generate_token_key();
        assert_eq!(key.len(), TOKEN_KEY_BYTES * 2);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn keys_do_not_repeat() {
        let keys: HashSet<String> = (0..256).map(|_| generate_token_key()).collect();
        assert_eq!(keys.len(), 256);
    }
}
