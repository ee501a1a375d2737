//! Lenient notification filter.
//!
//! Used to pick a matching reply out of an interleaved notification
//! stream. Frames that do not decrypt to a well-formed header are
//! reported as non-matches rather than errors: unrelated BLE noise is
//! expected at this boundary. Everywhere else (command building, the
//! handshake steps, the resolver) a decrypt failure stays a hard error.

use tracing::trace;

use crate::cipher;
use crate::constants::ADMIN_CODE_NOT_SET;
use crate::error::LockError;
use crate::function::FunctionCode;

/// Does `ciphertext` carry the function `expected`?
///
/// Returns `Err(AdminCodeNotSet)` whenever the decrypted function byte is
/// the 0xEF sentinel, even if 0xEF was the expected code; the dedicated
/// admin-code-query path goes through the resolver, not this filter.
pub fn is_valid(
    key: &[u8; 16],
    ciphertext: &[u8],
    expected: FunctionCode,
) -> Result<bool, LockError> {
    let plaintext = match cipher::decrypt(key, ciphertext) {
        Ok(plaintext) => plaintext,
        Err(_) => {
            trace!(len = ciphertext.len(), "undecryptable notification skipped");
            return Ok(false);
        }
    };
    let Some(&function) = plaintext.get(2) else {
        return Ok(false);
    };
    if function == ADMIN_CODE_NOT_SET {
        return Err(LockError::AdminCodeNotSet);
    }
    Ok(function == u8::from(expected))
}
