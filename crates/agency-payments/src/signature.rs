//! Notification Signatures
//!
//! The canonical string is every field except `signature`, sorted by key
//! (byte order), rendered as `key=value` with URI-component percent-encoding
//! of the value, joined with `&`, followed by `&passphrase={passphrase}`.
//! The signature is the lowercase hex MD5 of that string.

use md5::{Digest, Md5};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use subtle::ConstantTimeEq;

/// Characters left unescaped by URI-component encoding
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Name of the detached signature field
pub const SIGNATURE_FIELD: &str = "signature";

/// Build the canonical string that gets hashed
pub fn canonical_string<I, K, V>(fields: I, passphrase: &str) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut pairs: Vec<(K, V)> = fields
        .into_iter()
        .filter(|(key, _)| key.as_ref() != SIGNATURE_FIELD)
        .collect();
    pairs.sort_by(|(a, _), (b, _)| a.as_ref().cmp(b.as_ref()));

    let mut canonical = pairs
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                key.as_ref(),
                utf8_percent_encode(value.as_ref(), URI_COMPONENT)
            )
        })
        .collect::<Vec<_>>()
        .join("&");

    canonical.push_str("&passphrase=");
    canonical.push_str(passphrase);
    canonical
}

/// Compute the signature for a field set
pub fn sign<I, K, V>(fields: I, passphrase: &str) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    hex::encode(Md5::digest(canonical_string(fields, passphrase).as_bytes()))
}

/// Recompute the signature and compare it with the supplied one
pub fn verify<I, K, V>(fields: I, passphrase: &str, supplied: &str) -> bool
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let expected = sign(fields, passphrase);
    expected.as_bytes().ct_eq(supplied.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PASSPHRASE: &str = "secret";

    fn fields() -> Vec<(&'static str, &'static str)> {
        vec![
            ("merchant_id", "10000100"),
            ("amount", "99.00"),
            ("item_name", "Basic Plan Subscription"),
            ("m_payment_id", "agencyA-basic"),
            ("email_address", "o'neil+test@example.com"),
        ]
    }

    #[test]
    fn test_canonical_string() {
        assert_eq!(
            canonical_string(fields(), PASSPHRASE),
            "amount=99.00&email_address=o'neil%2Btest%40example.com\
             &item_name=Basic%20Plan%20Subscription&m_payment_id=agencyA-basic\
             &merchant_id=10000100&passphrase=secret"
        );
    }

    #[test]
    fn test_known_signature() {
        assert_eq!(sign(fields(), PASSPHRASE), "ab469d8fa714739d1969ea8de2bf2df8");
    }

    #[test]
    fn test_signature_is_deterministic() {
        assert_eq!(sign(fields(), PASSPHRASE), sign(fields(), PASSPHRASE));
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let mut reversed = fields();
        reversed.reverse();
        assert_eq!(sign(reversed, PASSPHRASE), sign(fields(), PASSPHRASE));
    }

    #[test]
    fn test_single_character_change_alters_signature() {
        let original = sign(fields(), PASSPHRASE);

        for index in 0..fields().len() {
            let mut tampered: Vec<(String, String)> = fields()
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            tampered[index].1.push('x');
            assert_ne!(sign(tampered, PASSPHRASE), original, "field {index}");
        }
    }

    #[test]
    fn test_passphrase_participates() {
        assert_ne!(sign(fields(), "secret"), sign(fields(), "other"));
    }

    #[test]
    fn test_signature_field_is_excluded() {
        let mut with_signature = fields();
        with_signature.push((SIGNATURE_FIELD, "deadbeef"));
        assert_eq!(sign(with_signature, PASSPHRASE), sign(fields(), PASSPHRASE));
    }

    #[test]
    fn test_verify() {
        let signature = sign(fields(), PASSPHRASE);
        assert!(verify(fields(), PASSPHRASE, &signature));
        assert!(!verify(fields(), PASSPHRASE, &signature.to_uppercase()));
        assert!(!verify(fields(), PASSPHRASE, ""));
        assert!(!verify(fields(), "wrong", &signature));
    }
}
