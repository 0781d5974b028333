use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

fn keyed_mac(secret: &str, filename: &str) -> Result<HmacSha256, InvalidLength> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())?;
    mac.update(filename.as_bytes());
    Ok(mac)
}

/// Delete key handed out with every upload: hex HMAC-SHA256 of the stored
/// filename, keyed with the server secret.
pub fn delete_key(secret: &str, filename: &str) -> Result<String, InvalidLength> {
    let mac = keyed_mac(secret, filename)?;
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Checks a client supplied key in constant time. Anything that is not a
/// hex encoded tag for `filename` is rejected.
pub fn verify_delete_key(secret: &str, filename: &str, key: &str) -> bool {
    let Ok(tag) = hex::decode(key) else {
        return false;
    };

    keyed_mac(secret, filename).is_ok_and(|mac| mac.verify_slice(&tag).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_key() {
        let key = delete_key("secret", "file.txt").unwrap();
        assert_eq!(key.len(), 64);
        assert_eq!(key, delete_key("secret", "file.txt").unwrap());
        assert_ne!(key, delete_key("secret", "file_0.txt").unwrap());
        assert_ne!(key, delete_key("other", "file.txt").unwrap());
    }

    #[test]
    fn test_delete_key_known_answer() {
        // RFC 4231 test case 2
        let key = delete_key("Jefe", "what do ya want for nothing?").unwrap();
        assert_eq!(
            key,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_verify_delete_key() {
        let key = delete_key("secret", "file.txt").unwrap();
        assert!(verify_delete_key("secret", "file.txt", &key));
        assert!(verify_delete_key("secret", "file.txt", &key.to_uppercase()));
        assert!(!verify_delete_key("secret", "file_0.txt", &key));
        assert!(!verify_delete_key("other", "file.txt", &key));
        assert!(!verify_delete_key("secret", "file.txt", "deadbeef"));
        assert!(!verify_delete_key("secret", "file.txt", ""));
    }

    #[test]
    fn test_verify_rejects_malformed_keys() {
        let key = delete_key("secret", "file.txt").unwrap();
        // Odd length
        assert!(!verify_delete_key("secret", "file.txt", &key[1..]));
        // Not hex
        assert!(!verify_delete_key("secret", "file.txt", &key.replace(|c: char| c.is_ascii_digit(), "z")));
        assert!(!verify_delete_key("secret", "file.txt", "../../etc/passwd"));
    }

    #[test]
    fn test_extended_filename_does_not_verify() {
        let key = delete_key("secret", "a.txt").unwrap();
        assert!(!verify_delete_key("secret", "a.txt.bak", &key));
        assert!(!verify_delete_key("secret", "a.txt\u{80}\0\0suffix", &key));
    }
}
