//! URL signatures.
//!
//! Signature = base64url(HMAC-SHA256(key, salt || path)), truncated to the
//! configured number of bytes. `path` is everything after the signature segment,
//! including its leading slash.

use anyhow::anyhow;
use base64::Engine;
use hmac::{Hmac, Mac};
use imgrelay_core::Config;
use imgrelay_processing::PathValidator;
use sha2::Sha256;

pub struct HmacPathValidator {
    key: Vec<u8>,
    salt: Vec<u8>,
    signature_size: usize,
}

impl HmacPathValidator {
    pub fn new(key: Vec<u8>, salt: Vec<u8>, signature_size: usize) -> Self {
        Self {
            key,
            salt,
            signature_size,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.key.clone(),
            config.salt.clone(),
            config.signature_size,
        )
    }

    /// Signature segment for `path`.
    pub fn sign_path(&self, path: &str) -> String {
        let tag = self.mac(path).finalize().into_bytes();
        let size = self.signature_size.min(tag.len());
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(&tag[..size])
    }

    fn mac(&self, path: &str) -> Hmac<Sha256> {
        let mut mac = Hmac::<Sha256>::new_from_slice(&self.key).expect("HMAC accepts any key size");
        mac.update(&self.salt);
        mac.update(path.as_bytes());
        mac
    }
}

impl PathValidator for HmacPathValidator {
    fn validate_path(&self, signature: &str, path: &str) -> Result<(), anyhow::Error> {
        let decoded = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| anyhow!("Invalid signature encoding"))?;

        if decoded.len() != self.signature_size {
            return Err(anyhow!("Invalid signature size"));
        }

        self.mac(path)
            .verify_truncated_left(&decoded)
            .map_err(|_| anyhow!("Invalid signature"))
    }
}
