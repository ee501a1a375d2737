//! Connection tokens and their trust classification.
//!
//! A phone connects with either a one-time token (single use, must be
//! upgraded via the 0xE5 push) or a permanent token. The lock classifies
//! whichever token the C1 step presents; the classification byte drives
//! the handshake state machine.

use serde::{Deserialize, Serialize};

use crate::codec::{self, take, take_prefixed};
use crate::constants::TOKEN_SIZE;
use crate::error::LockError;
use crate::fields::Permission;

/// The credential a caller holds before the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionToken {
    OneTime([u8; TOKEN_SIZE]),
    Permanent([u8; TOKEN_SIZE]),
}

impl ConnectionToken {
    pub fn bytes(&self) -> &[u8; TOKEN_SIZE] {
        match self {
            ConnectionToken::OneTime(bytes) | ConnectionToken::Permanent(bytes) => bytes,
        }
    }

    pub fn is_one_time(&self) -> bool {
        matches!(self, ConnectionToken::OneTime(_))
    }
}

/// Device-side token classification (C1 reply byte 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenState {
    Illegal,
    Valid,
    /// The device already swapped this one-time token
    Refused,
    OneTime,
}

impl TokenState {
    pub fn classify(byte: u8) -> Result<Self, LockError> {
        match byte {
            0 => Ok(TokenState::Illegal),
            1 => Ok(TokenState::Valid),
            2 => Ok(TokenState::Refused),
            3 => Ok(TokenState::OneTime),
            other => Err(LockError::IllegalTokenState(other)),
        }
    }
}

/// Decoded C1 reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenValidation {
    pub state: TokenState,
    pub permission: Permission,
    /// Valid replies may echo the accepted token
    pub token_echo: Option<[u8; TOKEN_SIZE]>,
}

impl TokenValidation {
    pub fn decode(payload: &[u8]) -> Result<Self, LockError> {
        let (head, rest) = take(payload, 2)?;
        let token_echo = if rest.len() >= TOKEN_SIZE {
            Some(rest[..TOKEN_SIZE].try_into()?)
        } else {
            None
        };
        Ok(Self {
            state: TokenState::classify(head[0])?,
            permission: Permission::from_wire(head[1]),
            token_echo,
        })
    }
}

/// Durable credential delivered by the 0xE5 push (or already held).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermanentToken {
    pub is_valid: bool,
    pub is_permanent: bool,
    pub is_owner: bool,
    pub permission: Permission,
    pub token: [u8; TOKEN_SIZE],
    pub name: String,
}

impl PermanentToken {
    /// Decode an 0xE5 payload. A leading zero byte means the device
    /// refused the upgrade outright.
    pub fn decode(payload: &[u8]) -> Result<Self, LockError> {
        let (head, rest) = take(payload, 4 + TOKEN_SIZE)?;
        if head[0] == 0 {
            return Err(LockError::IllegalToken);
        }
        let (name, _) = take_prefixed(rest)?;
        Ok(Self {
            is_valid: true,
            is_permanent: head[1] == 1,
            is_owner: head[2] == 1,
            permission: Permission::from_wire(head[3]),
            token: head[4..4 + TOKEN_SIZE].try_into()?,
            name: String::from_utf8_lossy(name).into_owned(),
        })
    }

    pub fn hex(&self) -> String {
        codec::bytes_to_hex(&self.token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_bytes() {
        assert_eq!(TokenState::classify(0).unwrap(), TokenState::Illegal);
        assert_eq!(TokenState::classify(1).unwrap(), TokenState::Valid);
        assert_eq!(TokenState::classify(2).unwrap(), TokenState::Refused);
        assert_eq!(TokenState::classify(3).unwrap(), TokenState::OneTime);
        for byte in 4..=255u8 {
            assert!(matches!(
                TokenState::classify(byte),
                Err(LockError::IllegalTokenState(b)) if b == byte
            ));
        }
    }

    #[test]
    fn test_validation_decode_with_echo() {
        let mut payload = vec![1, b'M'];
        payload.extend_from_slice(&[0x5A; 8]);
        let validation = TokenValidation::decode(&payload).unwrap();
        assert_eq!(validation.state, TokenState::Valid);
        assert_eq!(validation.permission, Permission::Manager);
        assert_eq!(validation.token_echo, Some([0x5A; 8]));
    }

    #[test]
    fn test_validation_decode_without_echo() {
        let validation = TokenValidation::decode(&[3, b'A']).unwrap();
        assert_eq!(validation.state, TokenState::OneTime);
        assert_eq!(validation.token_echo, None);
    }

    #[test]
    fn test_e5_decode() {
        let mut payload = vec![1, 1, 1, b'O'];
        payload.extend_from_slice(&[0xC3; 8]);
        payload.push(4);
        payload.extend_from_slice(b"mine");
        let token = PermanentToken::decode(&payload).unwrap();
        assert!(token.is_valid && token.is_permanent && token.is_owner);
        assert_eq!(token.permission, Permission::Owner);
        assert_eq!(token.token, [0xC3; 8]);
        assert_eq!(token.name, "mine");
        assert_eq!(token.hex(), "c3c3c3c3c3c3c3c3");
    }

    #[test]
    fn test_e5_leading_zero_is_illegal() {
        let mut payload = vec![0, 1, 1, b'O'];
        payload.extend_from_slice(&[0u8; 9]);
        assert!(matches!(
            PermanentToken::decode(&payload),
            Err(LockError::IllegalToken)
        ));
    }
}
