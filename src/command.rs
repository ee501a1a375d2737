//! Outgoing command construction.
//!
//! `CommandBuilder` owns the per-session serial counter; there is no
//! process-wide serial state. Serials are allocated increment-then-read
//! and wrap at u16. A nonce exchange (0xC0) restarts the session: it is
//! defined to use serial 0 and resets the counter.

use bytes::Bytes;
use tracing::debug;

use crate::cipher;
use crate::constants::{KEY_SIZE, MAX_PAYLOAD};
use crate::error::LockError;
use crate::frame::Frame;
use crate::function::{DeclaredLength, FunctionCode};

#[derive(Debug, Default)]
pub struct CommandBuilder {
    serial: u16,
}

impl CommandBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next serial (increment-then-read, wrapping).
    pub fn next_serial(&mut self) -> u16 {
        self.serial = self.serial.wrapping_add(1);
        self.serial
    }

    pub fn reset(&mut self) {
        self.serial = 0;
    }

    /// Encode and encrypt one command frame. The declared length byte
    /// follows the per-function table; 0xC0 ignores the payload content
    /// and sends `payload.len()` fresh random bytes instead.
    pub fn build(
        &mut self,
        function: FunctionCode,
        key: &[u8; 16],
        payload: &[u8],
    ) -> Result<Vec<u8>, LockError> {
        if payload.len() > MAX_PAYLOAD {
            return Err(LockError::InvalidInput(format!(
                "payload of {} bytes exceeds the one-byte length field",
                payload.len()
            )));
        }
        let declared = match function.declared_length() {
            None => return Err(LockError::UnsupportedFunction(function.into())),
            Some(DeclaredLength::Nonce) => {
                return self.build_nonce_sized(key, payload.len()).map(|(c, _)| c);
            }
            Some(DeclaredLength::Fixed(n)) => n,
            Some(DeclaredLength::Payload) => payload.len() as u8,
        };
        let serial = self.next_serial();
        debug!(%function, serial, declared, "building command");
        let frame = Frame::new(serial, function, Bytes::copy_from_slice(payload));
        let plaintext = frame.to_plaintext(declared)?;
        let padded = cipher::pad(&plaintext, false)?;
        cipher::encrypt(key, &padded)
    }

    /// Build the C0 session-restart command with a full-size nonce and
    /// return both the ciphertext and the nonce it carries (the handshake
    /// derives the session key from it).
    pub fn build_nonce_exchange(
        &mut self,
        key: &[u8; 16],
    ) -> Result<(Vec<u8>, [u8; KEY_SIZE]), LockError> {
        let (ciphertext, nonce) = self.build_nonce_sized(key, KEY_SIZE)?;
        Ok((ciphertext, nonce.as_slice().try_into()?))
    }

    fn build_nonce_sized(
        &mut self,
        key: &[u8; 16],
        size: usize,
    ) -> Result<(Vec<u8>, Vec<u8>), LockError> {
        if size == 0 || size > MAX_PAYLOAD {
            return Err(LockError::InvalidInput(format!(
                "nonce size {size} out of range"
            )));
        }
        // session restart
        self.reset();
        let nonce: Vec<u8> = (0..size).map(|_| rand::random()).collect();
        debug!(size, "building nonce exchange, serial counter reset");
        let frame = Frame::new(
            0,
            FunctionCode::NonceExchange,
            Bytes::copy_from_slice(&nonce),
        );
        let plaintext = frame.to_plaintext(size as u8)?;
        let padded = cipher::pad(&plaintext, false)?;
        Ok((cipher::encrypt(key, &padded)?, nonce))
    }
}

/// OTA begin payload (0x87): total image size and chunk count.
pub fn ota_begin_payload(image_size: u32, chunk_count: u16) -> Vec<u8> {
    let mut out = Vec::with_capacity(6);
    out.extend_from_slice(&image_size.to_le_bytes());
    out.extend_from_slice(&chunk_count.to_le_bytes());
    out
}

/// OTA data payload (0x88): chunk index followed by the chunk bytes.
/// The file-transfer loop itself lives outside this crate.
pub fn ota_data_payload(chunk_index: u16, chunk: &[u8]) -> Result<Vec<u8>, LockError> {
    if chunk.is_empty() || chunk.len() > MAX_PAYLOAD - 2 {
        return Err(LockError::InvalidArgument(format!(
            "OTA chunk of {} bytes does not fit one frame",
            chunk.len()
        )));
    }
    let mut out = Vec::with_capacity(2 + chunk.len());
    out.extend_from_slice(&chunk_index.to_le_bytes());
    out.extend_from_slice(chunk);
    Ok(out)
}
