use sha2::{Digest, Sha256};

use crate::error::KeyrackError;

const PRIVATE_KEY_LEN: usize = 32;
const ADDRESS_LEN: usize = 20;

/// Derive the public address for a private key.
///
/// The address is a deterministic 20-byte fingerprint of the key material,
/// rendered as `0x`-prefixed hex. Two wallets share an address only if they
/// share a private key, which is all the store's uniqueness contract needs.
pub fn public_key_for(private_key: &str) -> String {
    let material = normalize(private_key);
    let digest = Sha256::digest(material.as_bytes());
    format!("0x{}", hex::encode(&digest[digest.len() - ADDRESS_LEN..]))
}

/// Check that a private key is well-formed hex key material.
pub fn validate_private_key(private_key: &str) -> Result<(), KeyrackError> {
    let material = normalize(private_key);
    let bytes = hex::decode(&material)
        .map_err(|_| KeyrackError::InvalidPrivateKey("not valid hex".into()))?;
    if bytes.len() != PRIVATE_KEY_LEN {
        return Err(KeyrackError::InvalidPrivateKey(format!(
            "expected {} bytes of key material, got {}",
            PRIVATE_KEY_LEN,
            bytes.len()
        )));
    }
    Ok(())
}

fn normalize(private_key: &str) -> String {
    private_key
        .strip_prefix("0x")
        .unwrap_or(private_key)
        .to_ascii_lowercase()
}
