//! Offline access codes (keypad PINs), functions 0xEA-0xEE.
//!
//! Records are variable length: a fixed 11-byte head followed by the
//! length-prefixed code digits and name. Pages carry several records
//! back-to-back; each length prefix bounds the next read.

use serde::{Deserialize, Serialize};

use crate::codec::{self, take, take_prefixed};
use crate::constants::MAX_NAME_LEN;
use crate::error::LockError;
use crate::fields::Toggle;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessCode {
    pub slot: u8,
    pub active: Toggle,
    /// Repeat schedule, LSB = Monday; bit 7 reserved
    pub weekdays: [bool; 8],
    /// Unix seconds; 0 means unbounded
    pub valid_from: u32,
    pub valid_until: u32,
    pub code: String,
    pub name: String,
}

impl AccessCode {
    const HEAD_LEN: usize = 11;

    pub fn decode(payload: &[u8]) -> Result<Self, LockError> {
        let (record, rest) = Self::decode_partial(payload)?;
        if !rest.is_empty() {
            tracing::trace!(trailing = rest.len(), "ignoring trailing bytes after access code");
        }
        Ok(record)
    }

    /// Decode one record, returning the unread remainder for page walks.
    fn decode_partial(bytes: &[u8]) -> Result<(Self, &[u8]), LockError> {
        let (head, rest) = take(bytes, Self::HEAD_LEN)?;
        let (code, rest) = take_prefixed(rest)?;
        let (name, rest) = take_prefixed(rest)?;
        Ok((
            Self {
                slot: head[0],
                active: Toggle::from(head[1]),
                weekdays: codec::bitmask_to_bool_list(head[2]),
                valid_from: codec::u32_from_le(&head[3..7]),
                valid_until: codec::u32_from_le(&head[7..11]),
                code: String::from_utf8_lossy(code).into_owned(),
                name: String::from_utf8_lossy(name).into_owned(),
            },
            rest,
        ))
    }

    /// Encode for add/edit (0xEC/0xED). Validates caller input up front.
    pub fn encode(&self) -> Result<Vec<u8>, LockError> {
        validate_access_code(&self.code)?;
        validate_name(&self.name)?;
        let mut out = Vec::with_capacity(Self::HEAD_LEN + 2 + self.code.len() + self.name.len());
        out.push(self.slot);
        out.push(self.active.into());
        let mut mask = 0u8;
        for (i, on) in self.weekdays.iter().enumerate() {
            if *on {
                mask |= 1 << i;
            }
        }
        out.push(mask);
        out.extend_from_slice(&codec::u32_to_le(self.valid_from));
        out.extend_from_slice(&codec::u32_to_le(self.valid_until));
        out.push(self.code.len() as u8);
        out.extend_from_slice(self.code.as_bytes());
        out.push(self.name.len() as u8);
        out.extend_from_slice(self.name.as_bytes());
        Ok(out)
    }
}

/// One page of the access-code array (function 0xEA reply):
/// `[total:1][count:1]` then `count` records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessCodePage {
    /// Codes stored on the device in total
    pub total: u8,
    pub codes: Vec<AccessCode>,
}

impl AccessCodePage {
    pub fn decode(payload: &[u8]) -> Result<Self, LockError> {
        let (head, mut rest) = take(payload, 2)?;
        let count = head[1] as usize;
        let mut codes = Vec::with_capacity(count);
        for _ in 0..count {
            let (record, remainder) = AccessCode::decode_partial(rest)?;
            codes.push(record);
            rest = remainder;
        }
        Ok(Self {
            total: head[0],
            codes,
        })
    }
}

/// Keypad codes are 4-10 ASCII digits.
pub fn validate_access_code(code: &str) -> Result<(), LockError> {
    if code.len() < 4 || code.len() > 10 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LockError::InvalidArgument(
            "access code must be 4-10 ASCII digits".to_string(),
        ));
    }
    Ok(())
}

/// Admin codes are 4-8 ASCII digits.
pub fn validate_admin_code(code: &str) -> Result<(), LockError> {
    if code.len() < 4 || code.len() > 8 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LockError::InvalidArgument(
            "admin code must be 4-8 ASCII digits".to_string(),
        ));
    }
    Ok(())
}

/// Names travel length-prefixed and max out at 20 bytes.
pub fn validate_name(name: &str) -> Result<(), LockError> {
    if name.len() > MAX_NAME_LEN {
        return Err(LockError::InvalidArgument(format!(
            "name of {} bytes exceeds the {MAX_NAME_LEN}-byte limit",
            name.len()
        )));
    }
    Ok(())
}
