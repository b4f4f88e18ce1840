//! API token generation and hashing.
//!
//! Tokens look like `bk_<64 hex chars>`. Only the SHA-256 digest of a token is stored.

use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};

/// API token prefix.
pub const API_TOKEN_PREFIX: &str = "bk";

/// Number of random bytes encoded in a token.
pub const API_TOKEN_SECRET_BYTES: usize = 32;

const API_TOKEN_SECRET_HEX_CHARS: usize = API_TOKEN_SECRET_BYTES * 2;

/// Generate a fresh random API token. Shown to the operator once.
#[must_use]
pub fn generate_api_token() -> String {
    let mut secret = [0_u8; API_TOKEN_SECRET_BYTES];

    OsRng.fill_bytes(&mut secret);

    format!("{API_TOKEN_PREFIX}_{}", encode_hex(&secret))
}

/// Digest stored in place of the token.
#[must_use]
pub fn hash_api_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

/// Cheap shape check so malformed bearer values never reach storage.
#[must_use]
pub fn is_well_formed_api_token(token: &str) -> bool {
    token
        .strip_prefix(API_TOKEN_PREFIX)
        .and_then(|rest| rest.strip_prefix('_'))
        .is_some_and(|secret| {
            secret.len() == API_TOKEN_SECRET_HEX_CHARS
                && secret.bytes().all(|byte| byte.is_ascii_hexdigit())
        })
}

fn encode_hex(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";

    let mut encoded = String::with_capacity(bytes.len() * 2);

    for byte in bytes {
        encoded.push(HEX[(byte >> 4) as usize] as char);
        encoded.push(HEX[(byte & 0x0f) as usize] as char);
    }

    encoded
}
