//! Event log records (0xE0-0xE2, 0xE8) and issued-token bookkeeping
//! (0xE3-0xE7).

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::codec::{self, take, take_prefixed};
use crate::constants::EVENT_NOT_FOUND;
use crate::error::LockError;
use crate::fields::{CredentialKind, EventKind, Permission};

/// One audit-log entry (0xE1 reply, 0xE8 push).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub index: u32,
    pub timestamp: u32,
    pub kind: EventKind,
    /// What produced the event: keypad PIN, fingerprint, card...
    pub source: CredentialKind,
    pub user_id: u16,
    pub detail: Bytes,
}

impl EventRecord {
    const HEAD_LEN: usize = 12;

    pub fn decode(payload: &[u8]) -> Result<Self, LockError> {
        let (head, rest) = take(payload, Self::HEAD_LEN)?;
        let (detail, _) = take_prefixed(rest)?;
        Ok(Self {
            index: codec::u32_from_le(&head[0..4]),
            timestamp: codec::u32_from_le(&head[4..8]),
            kind: EventKind::from(head[8]),
            source: CredentialKind::from(head[9]),
            user_id: codec::u16_from_le(&head[10..12]),
            detail: Bytes::copy_from_slice(detail),
        })
    }

    /// Index sentinel the device echoes when the requested record
    /// does not exist.
    pub fn is_not_found(&self) -> bool {
        self.index == EVENT_NOT_FOUND
    }
}

/// One entry of the issued-token list (0xE3 reply element).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenSummary {
    pub token: [u8; 8],
    pub permission: Permission,
    pub name: String,
}

impl TokenSummary {
    fn decode_partial(bytes: &[u8]) -> Result<(Self, &[u8]), LockError> {
        let (head, rest) = take(bytes, 9)?;
        let (name, rest) = take_prefixed(rest)?;
        Ok((
            Self {
                token: head[0..8].try_into()?,
                permission: Permission::from_wire(head[8]),
                name: String::from_utf8_lossy(name).into_owned(),
            },
            rest,
        ))
    }
}

/// Reply to 0xE3: `[count:1]` then `count` summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenList {
    pub tokens: Vec<TokenSummary>,
}

impl TokenList {
    pub fn decode(payload: &[u8]) -> Result<Self, LockError> {
        let (head, mut rest) = take(payload, 1)?;
        let mut tokens = Vec::with_capacity(head[0] as usize);
        for _ in 0..head[0] {
            let (token, remainder) = TokenSummary::decode_partial(rest)?;
            tokens.push(token);
            rest = remainder;
        }
        Ok(Self { tokens })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_decode() {
        let mut payload = Vec::new();
        payload.extend_from_slice(&41u32.to_le_bytes());
        payload.extend_from_slice(&1_750_000_000u32.to_le_bytes());
        payload.push(0x02); // unlock
        payload.push(0x01); // pin
        payload.extend_from_slice(&7u16.to_le_bytes());
        payload.push(2);
        payload.extend_from_slice(&[0xAA, 0xBB]);

        let event = EventRecord::decode(&payload).unwrap();
        assert_eq!(event.index, 41);
        assert_eq!(event.kind, EventKind::UnlockOp);
        assert_eq!(event.source, CredentialKind::Pin);
        assert_eq!(event.user_id, 7);
        assert_eq!(event.detail.as_ref(), &[0xAA, 0xBB]);
        assert!(!event.is_not_found());
    }

    #[test]
    fn test_not_found_sentinel() {
        let mut payload = vec![0xFF, 0xFF, 0xFF, 0xFF];
        payload.extend_from_slice(&[0u8; 8]);
        payload.push(0);
        let event = EventRecord::decode(&payload).unwrap();
        assert!(event.is_not_found());
    }

    #[test]
    fn test_token_list_decode() {
        let mut payload = vec![2];
        payload.extend_from_slice(&[0x11; 8]);
        payload.push(b'O');
        payload.push(5);
        payload.extend_from_slice(b"owner");
        payload.extend_from_slice(&[0x22; 8]);
        payload.push(b'L');
        payload.push(0);

        let list = TokenList::decode(&payload).unwrap();
        assert_eq!(list.tokens.len(), 2);
        assert_eq!(list.tokens[0].permission, Permission::Owner);
        assert_eq!(list.tokens[0].name, "owner");
        assert_eq!(list.tokens[1].token, [0x22; 8]);
        assert_eq!(list.tokens[1].permission, Permission::Limited);
    }

    #[test]
    fn test_truncated_event() {
        assert!(matches!(
            EventRecord::decode(&[0u8; 12]),
            Err(LockError::TruncatedRecord { .. })
        ));
    }
}
