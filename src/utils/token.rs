use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;

/// Random URL-safe token built from `nbytes` bytes of OS-seeded randomness.
/// The encoded string is `ceil(nbytes * 4 / 3)` characters of `[A-Za-z0-9_-]`.
pub fn token_urlsafe(nbytes: usize) -> String {
    let mut bytes = vec![0u8; nbytes];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_length_and_charset() {
        for (nbytes, expected_len) in [(12, 16), (16, 22), (1, 2), (32, 43)] {
            let token = token_urlsafe(nbytes);
            assert_eq!(token.len(), expected_len);
            assert!(
                token
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            );
        }
    }

    #[test]
    fn test_tokens_differ() {
        assert_ne!(token_urlsafe(12), token_urlsafe(12));
    }
}
