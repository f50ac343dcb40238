//! Contains tools related to Discord's Interactions Endpoint URL feature.
//!
//! "You can optionally configure an interactions endpoint to receive interactions via HTTP POSTs
//! rather than over Gateway with a bot user."
//!
//! <https://discord.com/developers/docs/tutorials/upgrading-to-application-commands#adding-an-interactions-endpoint-url>
//!
//! Every request must be checked with [`verify_request`] (or a [`Verifier`]) against the exact
//! bytes received, before the body is parsed.

use std::sync::OnceLock;

use dashmap::DashMap;
use tracing::{debug, warn};

/// Parses a hex string into an array of `[u8]`
fn parse_hex<const N: usize>(s: &str) -> Option<[u8; N]> {
    if s.len() != N * 2 {
        return None;
    }

    let mut res = [0; N];
    for (i, byte) in res.iter_mut().enumerate() {
        *byte = u8::from_str_radix(s.get(2 * i..2 * (i + 1))?, 16).ok()?;
    }
    Some(res)
}

/// The public key couldn't be turned into a valid cryptographic public key.
#[derive(Debug)]
#[non_exhaustive]
pub enum InvalidKey {
    /// The key is not a 64 digit hex string.
    Hex,
    /// The bytes are not a valid Ed25519 point.
    Key(ed25519_dalek::SignatureError),
}

impl std::fmt::Display for InvalidKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hex => f.write_str("invalid bot public key: expected 64 hex digits"),
            Self::Key(inner) => write!(f, "invalid bot public key: {inner}"),
        }
    }
}

impl std::error::Error for InvalidKey {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Hex => None,
            Self::Key(inner) => Some(inner),
        }
    }
}

/// Used to cryptographically verify incoming interactions HTTP request for authenticity.
///
/// If incoming requests are not verified, Discord will reject the URL for security reasons.
///
/// ```rust
/// use gembot::interactions_endpoint::Verifier;
///
/// let verifier =
///     Verifier::from_hex("67c6bd767ca099e79efac9fcce4d2022a63bf7dea780e7f3d813f694c1597089")
///         .unwrap();
///
/// // When receiving an HTTP request:
/// # let http_headers = std::collections::HashMap::from([("X-Signature-Ed25519", ""), ("X-Signature-Timestamp", "")]);
/// # let request_body = &[];
/// let signature = http_headers["X-Signature-Ed25519"];
/// let timestamp = http_headers["X-Signature-Timestamp"];
/// if verifier.verify(signature, timestamp, request_body).is_err() {
///     // Send HTTP 401 Unauthorized response
/// }
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Verifier {
    public_key: ed25519_dalek::VerifyingKey,
}

impl Verifier {
    /// Creates a new [`Verifier`] from the given public key hex string.
    ///
    /// # Errors
    ///
    /// [`InvalidKey`] if the string isn't 64 hex digits or the key isn't cryptographically valid.
    pub fn from_hex(public_key: &str) -> Result<Self, InvalidKey> {
        Self::try_new(parse_hex(public_key).ok_or(InvalidKey::Hex)?)
    }

    /// Creates a new [`Verifier`] from the public key bytes.
    ///
    /// # Errors
    ///
    /// [`InvalidKey`] if the key isn't cryptographically valid.
    pub fn try_new(public_key: [u8; 32]) -> Result<Self, InvalidKey> {
        Ok(Self {
            public_key: ed25519_dalek::VerifyingKey::from_bytes(&public_key)
                .map_err(InvalidKey::Key)?,
        })
    }

    /// Verifies a Discord request for authenticity, given the `X-Signature-Ed25519` HTTP header,
    /// `X-Signature-Timestamp` HTTP headers and request body.
    // We just need to differentiate "pass" and "failure". There's deliberately no data besides ().
    #[allow(clippy::result_unit_err, clippy::missing_errors_doc)]
    pub fn verify(&self, signature: &str, timestamp: &str, body: &[u8]) -> Result<(), ()> {
        use ed25519_dalek::Verifier as _;

        // Extract and parse signature
        let signature_bytes = parse_hex(signature).ok_or(())?;
        let signature = ed25519_dalek::Signature::from_bytes(&signature_bytes);

        // Verify
        let message_to_verify = [timestamp.as_bytes(), body].concat();
        self.public_key.verify(&message_to_verify, &signature).map_err(|_| ())
    }
}

/// Imported keys, by their hex representation. Importing the same key twice yields the same
/// verifier, so a lost race between two inserts is harmless.
static VERIFIERS: OnceLock<DashMap<String, Verifier>> = OnceLock::new();

fn cached_verifier(public_key: &str) -> Result<Verifier, InvalidKey> {
    let cache = VERIFIERS.get_or_init(DashMap::new);

    if let Some(verifier) = cache.get(public_key) {
        return Ok(*verifier);
    }

    let verifier = Verifier::from_hex(public_key)?;
    cache.insert(public_key.to_owned(), verifier);
    debug!("imported interactions public key");
    Ok(verifier)
}

/// Checks one incoming request. Never errors: a missing header, a malformed signature, an
/// unusable public key, an empty body and a bad signature all yield `false`, and the reason is
/// only logged.
#[must_use]
pub fn verify_request(
    public_key: &str,
    signature: Option<&str>,
    timestamp: Option<&str>,
    body: &[u8],
) -> bool {
    let (Some(signature), Some(timestamp)) = (signature, timestamp) else {
        warn!("interaction request without signature headers");
        return false;
    };

    if body.is_empty() {
        warn!("interaction request with empty body");
        return false;
    }

    let verifier = match cached_verifier(public_key) {
        Ok(verifier) => verifier,
        Err(why) => {
            warn!("cannot verify interaction request: {why}");
            return false;
        },
    };

    let verified = verifier.verify(signature, timestamp, body).is_ok();
    if !verified {
        warn!("interaction request signature mismatch");
    }
    verified
}

#[cfg(test)]
mod tests {
    use ed25519_dalek::{Signer as _, SigningKey};

    use super::*;

    fn hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    fn keypair(seed: u8) -> (SigningKey, String) {
        let signing_key = SigningKey::from_bytes(&[seed; 32]);
        let public = hex(signing_key.verifying_key().as_bytes());
        (signing_key, public)
    }

    fn sign(key: &SigningKey, timestamp: &str, body: &[u8]) -> String {
        hex(&key.sign(&[timestamp.as_bytes(), body].concat()).to_bytes())
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex::<4>("bf7dea78"), Some([0xBF, 0x7D, 0xEA, 0x78]));
        assert_eq!(parse_hex::<4>("bf7dea7"), None);
        assert_eq!(parse_hex::<4>("bf7dea789"), None);
        assert_eq!(parse_hex::<4>("bf7dea7x"), None);
        assert_eq!(parse_hex(""), Some([]));
        assert_eq!(
            parse_hex("67c6bd767ca099e79efac9fcce4d2022a63bf7dea780e7f3d813f694c1597089"),
            Some([
                0x67, 0xC6, 0xBD, 0x76, 0x7C, 0xA0, 0x99, 0xE7, 0x9E, 0xFA, 0xC9, 0xFC, 0xCE, 0x4D,
                0x20, 0x22, 0xA6, 0x3B, 0xF7, 0xDE, 0xA7, 0x80, 0xE7, 0xF3, 0xD8, 0x13, 0xF6, 0x94,
                0xC1, 0x59, 0x70, 0x89
            ])
        );
    }

    #[test]
    fn accepts_valid_signature() {
        let (key, public) = keypair(1);
        let body = br#"{"type":1}"#;
        let signature = sign(&key, "1700000000", body);

        assert!(verify_request(&public, Some(&signature), Some("1700000000"), body));
        // A second check goes through the cached key and agrees.
        assert!(verify_request(&public, Some(&signature), Some("1700000000"), body));
    }

    #[test]
    fn rejects_tampering() {
        let (key, public) = keypair(2);
        let body = br#"{"type":1}"#;
        let signature = sign(&key, "1700000000", body);

        assert!(!verify_request(&public, Some(&signature), Some("1700000001"), body));
        assert!(!verify_request(&public, Some(&signature), Some("1700000000"), br#"{"type":2}"#));

        let (_, other_public) = keypair(3);
        assert!(!verify_request(&other_public, Some(&signature), Some("1700000000"), body));
    }

    #[test]
    fn rejects_missing_or_malformed_input() {
        let (key, public) = keypair(4);
        let body = br#"{"type":1}"#;
        let signature = sign(&key, "1", body);

        assert!(!verify_request(&public, None, Some("1"), body));
        assert!(!verify_request(&public, Some(&signature), None, body));
        assert!(!verify_request(&public, Some(&signature), Some("1"), b""));
        assert!(!verify_request(&public, Some("zz"), Some("1"), body));
        assert!(!verify_request("not hex", Some(&signature), Some("1"), body));
        assert!(!verify_request("", Some(&signature), Some("1"), body));
    }
}
