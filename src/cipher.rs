//! AES-128-ECB frame encryption.
//!
//! The lock protocol encrypts whole frames with no cipher-level padding;
//! callers pre-pad to the 16-byte block boundary with [`pad`]. Command
//! frames use random fill so identical commands never produce identical
//! trailing blocks; zero fill is reserved for QR-code provisioning blobs.
//!
//! Note that ECB decryption with a wrong key cannot fail here - it yields
//! garbage plaintext that downstream function-byte checks reject. An `Err`
//! from [`decrypt`] always means structurally invalid input.

use aes::Aes128;
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};

use crate::constants::BLOCK_SIZE;
use crate::error::LockError;

pub fn encrypt(key: &[u8; 16], plaintext: &[u8]) -> Result<Vec<u8>, LockError> {
    if plaintext.is_empty() || !plaintext.len().is_multiple_of(BLOCK_SIZE) {
        return Err(LockError::InvalidInput(format!(
            "plaintext length {} is not a positive multiple of {BLOCK_SIZE}",
            plaintext.len()
        )));
    }
    let cipher = Aes128::new(key.into());
    let mut output = plaintext.to_vec();
    for chunk in output.chunks_mut(BLOCK_SIZE) {
        cipher.encrypt_block(chunk.into());
    }
    Ok(output)
}

pub fn decrypt(key: &[u8; 16], ciphertext: &[u8]) -> Result<Vec<u8>, LockError> {
    if ciphertext.is_empty() || !ciphertext.len().is_multiple_of(BLOCK_SIZE) {
        return Err(LockError::Decrypt);
    }
    let cipher = Aes128::new(key.into());
    let mut output = ciphertext.to_vec();
    for chunk in output.chunks_mut(BLOCK_SIZE) {
        cipher.decrypt_block(chunk.into());
    }
    Ok(output)
}

/// Pad `data` to the next 16-byte boundary. Already-aligned input is
/// returned unchanged; empty input is an error.
pub fn pad(data: &[u8], zero_fill: bool) -> Result<Vec<u8>, LockError> {
    if data.is_empty() {
        return Err(LockError::InvalidInput("cannot pad an empty buffer".to_string()));
    }
    let remainder = data.len() % BLOCK_SIZE;
    let mut output = data.to_vec();
    if remainder != 0 {
        let fill = BLOCK_SIZE - remainder;
        if zero_fill {
            output.resize(data.len() + fill, 0);
        } else {
            for _ in 0..fill {
                output.push(rand::random());
            }
        }
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; 16] = *b"0123456789abcdef";

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let plaintext = [0x42u8; 32];
        let ciphertext = encrypt(&KEY, &plaintext).unwrap();
        assert_ne!(ciphertext.as_slice(), plaintext.as_slice());
        assert_eq!(decrypt(&KEY, &ciphertext).unwrap(), plaintext);
    }

    #[test]
    fn test_misaligned_input_rejected() {
        assert!(matches!(decrypt(&KEY, &[0u8; 17]), Err(LockError::Decrypt)));
        assert!(matches!(decrypt(&KEY, &[]), Err(LockError::Decrypt)));
        assert!(encrypt(&KEY, &[0u8; 15]).is_err());
        assert!(encrypt(&KEY, &[]).is_err());
    }

    #[test]
    fn test_pad_aligns_and_is_idempotent_on_aligned_input() {
        for len in 1..=48 {
            let data = vec![0xABu8; len];
            let padded = pad(&data, true).unwrap();
            assert_eq!(padded.len() % BLOCK_SIZE, 0, "len {len}");
            assert_eq!(&padded[..len], data.as_slice());
        }
        let aligned = vec![0xCDu8; 32];
        assert_eq!(pad(&aligned, false).unwrap(), aligned);
    }

    #[test]
    fn test_zero_fill_pads_with_zeros() {
        let padded = pad(&[0xFFu8; 5], true).unwrap();
        assert_eq!(&padded[5..], &[0u8; 11]);
    }

    #[test]
    fn test_pad_empty_rejected() {
        assert!(pad(&[], true).is_err());
    }
}
