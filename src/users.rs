//! User and credential records.
//!
//! The 0x8A-0x8E range manages paired BLE devices ("BLE users"); the V3
//! 0x90-0x99 range manages lock users and their credentials (PINs,
//! fingerprints, cards, faces). All list replies are length-prefixed
//! record sequences.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::access::validate_name;
use crate::codec::{self, take, take_prefixed};
use crate::error::LockError;
use crate::fields::{CredentialKind, UserRole, UserStatus};

/// A paired BLE device (functions 0x8A-0x8E).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BleUser {
    pub slot: u8,
    pub role: UserRole,
    pub device_id: [u8; 8],
    pub name: String,
}

impl BleUser {
    const HEAD_LEN: usize = 10;

    pub fn decode(payload: &[u8]) -> Result<Self, LockError> {
        Ok(Self::decode_partial(payload)?.0)
    }

    fn decode_partial(bytes: &[u8]) -> Result<(Self, &[u8]), LockError> {
        let (head, rest) = take(bytes, Self::HEAD_LEN)?;
        let (name, rest) = take_prefixed(rest)?;
        Ok((
            Self {
                slot: head[0],
                role: UserRole::from(head[1]),
                device_id: head[2..10].try_into()?,
                name: String::from_utf8_lossy(name).into_owned(),
            },
            rest,
        ))
    }

    pub fn encode(&self) -> Result<Vec<u8>, LockError> {
        validate_name(&self.name)?;
        let mut out = Vec::with_capacity(Self::HEAD_LEN + 1 + self.name.len());
        out.push(self.slot);
        out.push(self.role.into());
        out.extend_from_slice(&self.device_id);
        out.push(self.name.len() as u8);
        out.extend_from_slice(self.name.as_bytes());
        Ok(out)
    }
}

/// Reply to 0x8E: `[count:1]` then `count` records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BleUserList {
    pub users: Vec<BleUser>,
}

impl BleUserList {
    pub fn decode(payload: &[u8]) -> Result<Self, LockError> {
        let (head, mut rest) = take(payload, 1)?;
        let mut users = Vec::with_capacity(head[0] as usize);
        for _ in 0..head[0] {
            let (user, remainder) = BleUser::decode_partial(rest)?;
            users.push(user);
            rest = remainder;
        }
        Ok(Self { users })
    }
}

/// A lock user (functions 0x90-0x94).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: u16,
    pub role: UserRole,
    pub status: UserStatus,
    pub credential_count: u8,
    pub name: String,
}

impl UserRecord {
    const HEAD_LEN: usize = 5;

    pub fn decode(payload: &[u8]) -> Result<Self, LockError> {
        Ok(Self::decode_partial(payload)?.0)
    }

    fn decode_partial(bytes: &[u8]) -> Result<(Self, &[u8]), LockError> {
        let (head, rest) = take(bytes, Self::HEAD_LEN)?;
        let (name, rest) = take_prefixed(rest)?;
        Ok((
            Self {
                user_id: codec::u16_from_le(&head[0..2]),
                role: UserRole::from(head[2]),
                status: UserStatus::from(head[3]),
                credential_count: head[4],
                name: String::from_utf8_lossy(name).into_owned(),
            },
            rest,
        ))
    }

    pub fn encode(&self) -> Result<Vec<u8>, LockError> {
        validate_name(&self.name)?;
        let mut out = Vec::with_capacity(Self::HEAD_LEN + 1 + self.name.len());
        out.extend_from_slice(&codec::u16_to_le(self.user_id));
        out.push(self.role.into());
        out.push(self.status.into());
        out.push(self.credential_count);
        out.push(self.name.len() as u8);
        out.extend_from_slice(self.name.as_bytes());
        Ok(out)
    }
}

/// Reply to 0x94: `[total:1][count:1]` then `count` records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPage {
    pub total: u8,
    pub users: Vec<UserRecord>,
}

impl UserPage {
    pub fn decode(payload: &[u8]) -> Result<Self, LockError> {
        let (head, mut rest) = take(payload, 2)?;
        let mut users = Vec::with_capacity(head[1] as usize);
        for _ in 0..head[1] {
            let (user, remainder) = UserRecord::decode_partial(rest)?;
            users.push(user);
            rest = remainder;
        }
        Ok(Self {
            total: head[0],
            users,
        })
    }
}

/// A stored credential (functions 0x95-0x99). The data field is the
/// credential template: PIN digits, fingerprint template id, card UID...
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub user_id: u16,
    pub kind: CredentialKind,
    pub slot: u8,
    /// Unix seconds; 0 means unbounded
    pub valid_from: u32,
    pub valid_until: u32,
    pub data: Bytes,
}

impl CredentialRecord {
    const HEAD_LEN: usize = 12;

    pub fn decode(payload: &[u8]) -> Result<Self, LockError> {
        Ok(Self::decode_partial(payload)?.0)
    }

    fn decode_partial(bytes: &[u8]) -> Result<(Self, &[u8]), LockError> {
        let (head, rest) = take(bytes, Self::HEAD_LEN)?;
        let (data, rest) = take_prefixed(rest)?;
        Ok((
            Self {
                user_id: codec::u16_from_le(&head[0..2]),
                kind: CredentialKind::from(head[2]),
                slot: head[3],
                valid_from: codec::u32_from_le(&head[4..8]),
                valid_until: codec::u32_from_le(&head[8..12]),
                data: Bytes::copy_from_slice(data),
            },
            rest,
        ))
    }

    pub fn encode(&self) -> Result<Vec<u8>, LockError> {
        if self.data.len() > u8::MAX as usize {
            return Err(LockError::InvalidArgument(format!(
                "credential data of {} bytes exceeds the length prefix",
                self.data.len()
            )));
        }
        let mut out = Vec::with_capacity(Self::HEAD_LEN + 1 + self.data.len());
        out.extend_from_slice(&codec::u16_to_le(self.user_id));
        out.push(self.kind.into());
        out.push(self.slot);
        out.extend_from_slice(&codec::u32_to_le(self.valid_from));
        out.extend_from_slice(&codec::u32_to_le(self.valid_until));
        out.push(self.data.len() as u8);
        out.extend_from_slice(&self.data);
        Ok(out)
    }
}

/// Reply to 0x99: `[total:1][count:1]` then `count` records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialPage {
    pub total: u8,
    pub credentials: Vec<CredentialRecord>,
}

impl CredentialPage {
    pub fn decode(payload: &[u8]) -> Result<Self, LockError> {
        let (head, mut rest) = take(payload, 2)?;
        let mut credentials = Vec::with_capacity(head[1] as usize);
        for _ in 0..head[1] {
            let (credential, remainder) = CredentialRecord::decode_partial(rest)?;
            credentials.push(credential);
            rest = remainder;
        }
        Ok(Self {
            total: head[0],
            credentials,
        })
    }
}
