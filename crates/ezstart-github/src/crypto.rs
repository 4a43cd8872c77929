//! Secret value encryption
//!
//! The repository public key is delivered base64-encoded. It is imported as
//! an RSA public key (SubjectPublicKeyInfo DER, or PKCS#1 DER as a fallback)
//! and the value is encrypted with RSA-OAEP / SHA-256.

use crate::error::{GithubError, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs8::DecodePublicKey;
use rsa::{Oaep, RsaPublicKey};
use sha2::Sha256;

/// Decode the base64 public key returned by the `public-key` endpoint
pub fn decode_public_key(key_b64: &str) -> Result<RsaPublicKey> {
    let der = STANDARD
        .decode(key_b64.trim())
        .map_err(|e| GithubError::InvalidPublicKey(format!("not base64: {}", e)))?;

    RsaPublicKey::from_public_key_der(&der)
        .or_else(|_| RsaPublicKey::from_pkcs1_der(&der))
        .map_err(|e| GithubError::InvalidPublicKey(e.to_string()))
}

/// Encrypt `value` and return the base64 ciphertext expected as `encrypted_value`
pub fn encrypt_secret(key_b64: &str, value: &str) -> Result<String> {
    let key = decode_public_key(key_b64)?;
    let mut rng = rand::thread_rng();
    let ciphertext = key
        .encrypt(&mut rng, Oaep::new::<Sha256>(), value.as_bytes())
        .map_err(|e| GithubError::Encryption(e.to_string()))?;
    Ok(STANDARD.encode(ciphertext))
}
