//! Signing session ids so visitors can't pick someone else's session.
//!
//! A cookie value is `<session id>.<signature>`, the signature being the unpadded
//! url-safe base64 of HMAC-SHA256 over the session id.

use super::SessionId;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;
use std::fmt;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug)]
pub struct BadKey;

impl fmt::Display for BadKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "session signing keys can't be empty")
    }
}

impl std::error::Error for BadKey {}

#[derive(Clone)]
pub struct SigningKey {
    mac: HmacSha256,
}

impl SigningKey {
    pub fn new(secret: &[u8]) -> Result<Self, BadKey> {
        if secret.is_empty() {
            return Err(BadKey);
        }
        let mac = HmacSha256::new_from_slice(secret).map_err(|_| BadKey)?;

        Ok(Self { mac })
    }

    /// A random key, good until the process exits.
    pub fn generate() -> Self {
        let mut secret = [0u8; 64];
        rand::thread_rng().fill(&mut secret[..]);

        Self {
            mac: HmacSha256::new_from_slice(&secret).unwrap_or_else(|_| unreachable!()),
        }
    }

    pub fn sign(&self, id: SessionId) -> String {
        let id = id.to_string();
        let mut mac = self.mac.clone();
        mac.update(id.as_bytes());

        format!("{}.{}", id, URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes()))
    }

    /// The session id in `value`, if we're the ones who signed it.
    pub fn verify(&self, value: &str) -> Option<SessionId> {
        let (id, sig) = value.split_once('.')?;
        let sig = URL_SAFE_NO_PAD.decode(sig).ok()?;

        let mut mac = self.mac.clone();
        mac.update(id.as_bytes());
        mac.verify_slice(&sig).ok()?;

        id.parse().ok()
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("SigningKey(..)")
    }
}
