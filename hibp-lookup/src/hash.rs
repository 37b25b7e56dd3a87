use sha1::{Digest, Sha1};

use crate::error::Error;

/// Hex lookup table for uppercase digest formatting.
pub const HEX_CHARS: &[u8; 16] = b"0123456789ABCDEF";

/// Length of the hash prefix used when a hash shows up in logs or error messages.
pub const PREFIX_LEN: usize = 5;

/// Normalizes a caller-supplied hash to its canonical uppercase form.
///
/// The lookup service treats hex digests case-insensitively, but requests are
/// always built from the uppercase form so two probes for the same digest are
/// indistinguishable on the wire.
pub fn normalize_hash(hash: &str) -> Result<String, Error> {
    if hash.is_empty() {
        return Err(Error::InvalidHash { reason: "hash is empty".to_string() });
    }

    if let Some(pos) = hash.bytes().position(|b| !b.is_ascii_hexdigit()) {
        return Err(Error::InvalidHash {
            reason: format!("non-hex character at offset {}", pos),
        });
    }

    Ok(hash.to_ascii_uppercase())
}

/// Computes the SHA-1 of `password` as 40 uppercase hex characters.
pub fn sha1_hex(password: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(password.as_bytes());
    let hash: [u8; 20] = hasher.finalize().into();

    let mut out = String::with_capacity(40);
    for byte in hash {
        out.push(HEX_CHARS[(byte >> 4) as usize] as char);
        out.push(HEX_CHARS[(byte & 0x0f) as usize] as char);
    }
    out
}

/// The loggable part of a hash (first 5 chars, or all of it when shorter).
#[inline]
pub fn hash_prefix(hash: &str) -> &str {
    match hash.char_indices().nth(PREFIX_LEN) {
        Some((idx, _)) => &hash[..idx],
        None => hash,
    }
}
