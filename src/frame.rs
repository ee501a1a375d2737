//! The wire unit: `[serial:2 LE][function:1][length:1][payload][pad]`,
//! AES-128-ECB encrypted as a whole.

use bytes::Bytes;

use crate::cipher;
use crate::codec;
use crate::constants::{HEADER_SIZE, MAX_PAYLOAD};
use crate::error::LockError;
use crate::function::FunctionCode;

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub serial: u16,
    pub function: FunctionCode,
    pub payload: Bytes,
}

impl Frame {
    pub fn new(serial: u16, function: FunctionCode, payload: Bytes) -> Self {
        Self {
            serial,
            function,
            payload,
        }
    }

    /// Serialize header + payload, writing `declared_len` into the length
    /// byte. Most frames declare the actual payload length; V2 set-config
    /// declares its fixed record size instead.
    pub fn to_plaintext(&self, declared_len: u8) -> Result<Vec<u8>, LockError> {
        if self.payload.len() > MAX_PAYLOAD {
            return Err(LockError::InvalidInput(format!(
                "payload of {} bytes exceeds the one-byte length field",
                self.payload.len()
            )));
        }
        let mut buf = Vec::with_capacity(HEADER_SIZE + self.payload.len());
        buf.extend_from_slice(&codec::u16_to_le(self.serial));
        buf.push(self.function.into());
        buf.push(declared_len);
        buf.extend_from_slice(&self.payload);
        Ok(buf)
    }

    /// Pad (random fill) and encrypt this frame.
    pub fn encode(&self, key: &[u8; 16]) -> Result<Vec<u8>, LockError> {
        let plaintext = self.to_plaintext(self.payload.len() as u8)?;
        let padded = cipher::pad(&plaintext, false)?;
        cipher::encrypt(key, &padded)
    }

    /// Decrypt and parse an incoming frame.
    pub fn decode(key: &[u8; 16], ciphertext: &[u8]) -> Result<Self, LockError> {
        let plaintext = cipher::decrypt(key, ciphertext)?;
        Self::from_plaintext(&plaintext)
    }

    /// Parse an already-decrypted buffer. The declared length byte bounds
    /// the payload; a declaration past the buffer end is a truncated frame.
    pub fn from_plaintext(plaintext: &[u8]) -> Result<Self, LockError> {
        if plaintext.len() < HEADER_SIZE {
            return Err(LockError::TruncatedRecord {
                expected: HEADER_SIZE,
                actual: plaintext.len(),
            });
        }
        let serial = codec::u16_from_le(&plaintext[0..2]);
        let function = FunctionCode::from(plaintext[2]);
        let length = plaintext[3] as usize;
        if HEADER_SIZE + length > plaintext.len() {
            return Err(LockError::TruncatedRecord {
                expected: HEADER_SIZE + length,
                actual: plaintext.len(),
            });
        }
        Ok(Self {
            serial,
            function,
            payload: Bytes::copy_from_slice(&plaintext[HEADER_SIZE..HEADER_SIZE + length]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; 16] = *b"lockproto-key-01";

    #[test]
    fn test_encode_decode_roundtrip() {
        let frame = Frame::new(
            7,
            FunctionCode::GetDeviceStatus,
            Bytes::from_static(&[0x01, 0x02, 0x03]),
        );
        let ciphertext = frame.encode(&KEY).unwrap();
        assert_eq!(ciphertext.len() % 16, 0);
        assert_eq!(Frame::decode(&KEY, &ciphertext).unwrap(), frame);
    }

    #[test]
    fn test_plaintext_layout() {
        let frame = Frame::new(
            0x0102,
            FunctionCode::Lock,
            Bytes::from_static(&[0xAA, 0xBB]),
        );
        let plaintext = frame.to_plaintext(2).unwrap();
        assert_eq!(plaintext, vec![0x02, 0x01, 0xD1, 0x02, 0xAA, 0xBB]);
    }

    #[test]
    fn test_declared_length_past_buffer_is_truncated() {
        // length byte says 30, only 12 payload bytes present
        let mut plaintext = vec![0x00, 0x00, 0xD6, 30];
        plaintext.extend_from_slice(&[0u8; 12]);
        assert!(matches!(
            Frame::from_plaintext(&plaintext),
            Err(LockError::TruncatedRecord { .. })
        ));
    }

    #[test]
    fn test_header_shorter_than_four_bytes() {
        assert!(matches!(
            Frame::from_plaintext(&[0x00, 0x00]),
            Err(LockError::TruncatedRecord { .. })
        ));
    }
}
