use sha2::{Digest, Sha256};

/// Hex characters kept from the SHA-256 digest
pub const FINGERPRINT_LEN: usize = 12;

/// Short, stable digest of file bytes for change tracking across runs.
/// Not an integrity guarantee.
pub fn fingerprint(bytes: &[u8]) -> String {
    let digest = hex::encode(Sha256::digest(bytes));
    digest[..FINGERPRINT_LEN].to_string()
}
