//! Six-digit password reset codes.
//!
//! Codes are short enough to type from an email, so they expire quickly and
//! only their SHA-256 digest is stored.

use rand::Rng;
use sha2::{Digest, Sha256};

/// How long a freshly issued code stays valid.
pub const RESET_CODE_TTL_MINS: i64 = 15;

/// Verification attempts allowed per code, right or wrong. After this the
/// code is dead and a new one must be requested.
pub const MAX_CODE_ATTEMPTS: i32 = 5;

/// Returns `(plaintext, sha256_hex)`. The plaintext is always six digits,
/// zero-padded.
pub fn generate_reset_code() -> (String, String) {
    let n: u32 = rand::rng().random_range(0..1_000_000);
    let code = format!("{n:06}");
    let hash = hash_reset_code(&code);
    (code, hash)
}

/// Hash a code as typed by the user. Surrounding whitespace is ignored.
pub fn hash_reset_code(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.trim().as_bytes());
    format!("{:x}", hasher.finalize())
}
